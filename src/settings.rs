//! Game settings and tuning
//!
//! Plain data handed to the sessions and the sound sink at construction.
//! Every field has a default, so a settings file only needs the values it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Sound effect preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxSettings {
    pub enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Cues closer together than this are dropped
    pub min_gap_ms: f64,
}

impl Default for SfxSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 1.0,
            min_gap_ms: 40.0,
        }
    }
}

/// Catch game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchTuning {
    pub target_score: u32,
    /// Starting lives (1 to 3)
    pub lives: u8,
    /// Play-field width until the host reports the real one (pixels)
    pub field_width: f32,
    pub spawn_interval_ms: f64,
    pub tick_interval_ms: f64,
}

impl Default for CatchTuning {
    fn default() -> Self {
        Self {
            target_score: CATCH_TARGET_SCORE,
            lives: CATCH_LIVES,
            field_width: CATCH_FIELD_WIDTH,
            spawn_interval_ms: CATCH_SPAWN_MS,
            tick_interval_ms: CATCH_TICK_MS,
        }
    }
}

/// Maze game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTuning {
    pub patrol_interval_ms: f64,
    /// Custom layout rows (`#` wall, `S` start, `G` goal); built-in maze when absent
    pub layout: Option<Vec<String>>,
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            patrol_interval_ms: PATROL_STEP_MS,
            layout: None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sfx: SfxSettings,
    pub catch: CatchTuning,
    pub maze: MazeTuning,
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Settings {
    /// Environment variable naming a JSON settings file (native only)
    pub const ENV_VAR: &'static str = "HEART_ARCADE_SETTINGS";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from the file named by `HEART_ARCADE_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {path}: {e}; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {path}: {e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load settings handed over by the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load_from(json: Option<String>) -> Self {
        match json.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from page");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid settings from page: {e}; using defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }
}
