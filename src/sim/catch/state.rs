//! Catch game state and core simulation types
//!
//! Everything the host needs to draw a frame lives here and is serializable.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Status of a catch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchStatus {
    /// Objects are falling and input is accepted
    Active,
    /// Target score reached
    Won,
    /// Out of lives
    Lost,
}

/// What kind of object is falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallingKind {
    /// Heart: adds to the score when caught
    Beneficial,
    /// Bomb: costs a life when caught
    Hazardous,
}

/// A falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// x: percent of field width (0-100), y: percent of field height
    pub pos: Vec2,
    pub kind: FallingKind,
    /// Percent of field height per tick
    pub speed: f32,
    /// Display size in pixels
    pub size: f32,
    pub opacity: f32,
}

impl FallingObject {
    /// Horizontal position in pixels for a field of the given width
    #[inline]
    pub fn pixel_x(&self, field_width: f32) -> f32 {
        self.pos.x / 100.0 * field_width
    }

    /// Inside the vertical catch band
    #[inline]
    pub fn in_catch_band(&self) -> bool {
        self.pos.y > CATCH_BAND_TOP && self.pos.y < CATCH_BAND_BOTTOM
    }

    /// Fell out of the bottom of the field
    #[inline]
    pub fn is_missed(&self) -> bool {
        self.pos.y >= CATCH_MISS_Y
    }
}

/// The basket the player slides along the bottom of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catcher {
    /// Current position (pixels from the left edge)
    pub x: f32,
    /// Where the pointer wants the catcher to be
    pub target_x: f32,
    /// Spring velocity (pixels/s)
    pub vel: f32,
}

impl Catcher {
    pub fn centered(field_width: f32) -> Self {
        let x = field_width / 2.0;
        Self {
            x,
            target_x: x,
            vel: 0.0,
        }
    }

    /// Point the catcher at a pointer coordinate, kept inside the field margins
    pub fn aim(&mut self, pointer_x: f32, field_width: f32) {
        let max = (field_width - CATCHER_MARGIN).max(CATCHER_MARGIN);
        self.target_x = pointer_x.clamp(CATCHER_MARGIN, max);
    }

    /// Advance the spring toward the target by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let accel = -CATCHER_STIFFNESS * (self.x - self.target_x) - CATCHER_DAMPING * self.vel;
        self.vel += accel * dt;
        self.x += self.vel * dt;

        // Settle exactly on the target once at rest
        if (self.x - self.target_x).abs() < 0.01 && self.vel.abs() < 0.01 {
            self.x = self.target_x;
            self.vel = 0.0;
        }
    }
}

/// Discrete things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchEvent {
    Caught { id: u32, kind: FallingKind },
    Missed { id: u32, kind: FallingKind },
    Won,
    Lost,
}

/// Complete catch game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u32,
    pub target_score: u32,
    pub lives: u8,
    /// Lives restored on restart
    pub max_lives: u8,
    pub status: CatchStatus,
    /// Play-field width in pixels (reported by the host)
    pub field_width: f32,
    pub catcher: Catcher,
    /// Live objects (sorted by id for determinism)
    pub objects: Vec<FallingObject>,
    /// Ids already counted as caught
    #[serde(default)]
    pub processed: BTreeSet<u32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<CatchEvent>,
    /// Next entity ID
    next_id: u32,
}

impl CatchState {
    /// Create a new run with the default rules
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, CATCH_TARGET_SCORE, CATCH_LIVES)
    }

    /// Custom target and starting lives; lives are kept within 1..=`CATCH_LIVES`
    pub fn with_rules(seed: u64, target_score: u32, lives: u8) -> Self {
        let lives = lives.clamp(1, CATCH_LIVES);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            target_score: target_score.max(1),
            lives,
            max_lives: lives,
            status: CatchStatus::Active,
            field_width: CATCH_FIELD_WIDTH,
            catcher: Catcher::centered(CATCH_FIELD_WIDTH),
            objects: Vec::new(),
            processed: BTreeSet::new(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_active(&self) -> bool {
        self.status == CatchStatus::Active
    }

    /// Host resized the play field
    pub fn set_field_width(&mut self, width: f32) {
        if width > 0.0 {
            self.field_width = width;
        }
    }

    /// Start a fresh run; the RNG keeps streaming so runs differ
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = self.max_lives;
        self.status = CatchStatus::Active;
        self.objects.clear();
        self.processed.clear();
        self.events.clear();
        log::info!("Catch game restarted");
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<CatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catcher_aim_clamps_to_margins() {
        let mut catcher = Catcher::centered(400.0);
        catcher.aim(-50.0, 400.0);
        assert_eq!(catcher.target_x, CATCHER_MARGIN);
        catcher.aim(1000.0, 400.0);
        assert_eq!(catcher.target_x, 400.0 - CATCHER_MARGIN);
    }

    #[test]
    fn test_catcher_aim_on_tiny_field() {
        let mut catcher = Catcher::centered(50.0);
        catcher.aim(25.0, 50.0);
        assert_eq!(catcher.target_x, CATCHER_MARGIN);
    }

    #[test]
    fn test_catcher_spring_settles_on_target() {
        let mut catcher = Catcher::centered(720.0);
        catcher.aim(100.0, 720.0);
        for _ in 0..300 {
            catcher.step(0.016);
        }
        assert!((catcher.x - 100.0).abs() < 0.5);
        // Never wildly overshoots past the left margin
        assert!(catcher.x > 0.0);
    }

    #[test]
    fn test_catcher_at_rest_stays_put() {
        let mut catcher = Catcher::centered(720.0);
        catcher.step(0.016);
        assert_eq!(catcher.x, 360.0);
        assert_eq!(catcher.vel, 0.0);
    }

    #[test]
    fn test_restart_restores_run() {
        let mut state = CatchState::new(7);
        state.score = 4;
        state.lives = 0;
        state.status = CatchStatus::Lost;
        state.processed.insert(3);
        let id = state.next_entity_id();
        state.objects.push(FallingObject {
            id,
            pos: Vec2::new(50.0, 10.0),
            kind: FallingKind::Beneficial,
            speed: 1.0,
            size: 24.0,
            opacity: 1.0,
        });

        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.status, CatchStatus::Active);
        assert!(state.objects.is_empty());
        assert!(state.processed.is_empty());
    }

    #[test]
    fn test_starting_lives_clamped() {
        let state = CatchState::with_rules(7, 10, 200);
        assert_eq!(state.lives, 3);
        assert_eq!(state.max_lives, 3);
        assert_eq!(CatchState::with_rules(7, 10, 0).lives, 1);
        assert_eq!(CatchState::with_rules(7, 10, 2).lives, 2);
    }

    #[test]
    fn test_object_band_and_miss() {
        let mut obj = FallingObject {
            id: 1,
            pos: Vec2::new(50.0, 82.0),
            kind: FallingKind::Hazardous,
            speed: 1.0,
            size: 24.0,
            opacity: 1.0,
        };
        assert!(!obj.in_catch_band());
        obj.pos.y = 85.0;
        assert!(obj.in_catch_band());
        obj.pos.y = 92.0;
        assert!(!obj.in_catch_band());
        assert!(!obj.is_missed());
        obj.pos.y = 100.0;
        assert!(obj.is_missed());
        assert_eq!(obj.pixel_x(720.0), 360.0);
    }
}
