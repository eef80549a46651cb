//! Stage sequence of the greeting
//!
//! The games report completion; the journey moves the host to whatever comes next.

use serde::{Deserialize, Serialize};

/// Screens of the experience, in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Landing,
    Proposal,
    Game,
    Gallery,
    Notes,
    Dashboard,
}

impl Stage {
    pub const SEQUENCE: [Stage; 6] = [
        Stage::Landing,
        Stage::Proposal,
        Stage::Game,
        Stage::Gallery,
        Stage::Notes,
        Stage::Dashboard,
    ];

    /// Following stage, `None` on the last one
    pub fn next(self) -> Option<Stage> {
        let i = Self::SEQUENCE.iter().position(|&s| s == self)?;
        Self::SEQUENCE.get(i + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Landing => "landing",
            Stage::Proposal => "proposal",
            Stage::Game => "game",
            Stage::Gallery => "gallery",
            Stage::Notes => "notes",
            Stage::Dashboard => "dashboard",
        }
    }
}

/// Where the visitor currently is
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journey {
    stage: Stage,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move to the next stage; stays put on the last one
    pub fn advance(&mut self) -> Stage {
        if let Some(next) = self.stage.next() {
            log::info!("Stage {} -> {}", self.stage.as_str(), next.as_str());
            self.stage = next;
        }
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage.next().is_none()
    }
}
