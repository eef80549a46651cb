//! Heart Arcade - the two mini-games of an interactive greeting
//!
//! Core modules:
//! - `sim`: Deterministic simulations (falling-catch, maze-patrol)
//! - `clock`: Tick sources that turn host time into timer firings
//! - `session`: Hosts that wire a simulation to its timers, feedback and completion
//! - `audio`: Feedback cues and tone synthesis
//! - `journey`: Stage sequence of the surrounding experience
//! - `settings`: Data-driven tuning and preferences

pub mod audio;
pub mod clock;
pub mod journey;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use journey::{Journey, Stage};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Catch game timer periods (milliseconds)
    pub const CATCH_TICK_MS: f64 = 16.0;
    pub const CATCH_SPAWN_MS: f64 = 700.0;
    /// Maximum timer firings processed per host update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hearts needed to win
    pub const CATCH_TARGET_SCORE: u32 = 10;
    /// Lives at the start of a run
    pub const CATCH_LIVES: u8 = 3;
    /// Play-field width in pixels when the host never reports one
    pub const CATCH_FIELD_WIDTH: f32 = 720.0;

    /// Horizontal catch radius around the catcher (pixels)
    pub const CATCH_RADIUS_PX: f32 = 60.0;
    /// Vertical catch band (percent of field height, exclusive)
    pub const CATCH_BAND_TOP: f32 = 82.0;
    pub const CATCH_BAND_BOTTOM: f32 = 92.0;
    /// Objects at or past this height are missed
    pub const CATCH_MISS_Y: f32 = 100.0;
    /// Objects enter the field here
    pub const CATCH_SPAWN_Y: f32 = -10.0;

    /// Catcher is kept this far from the field edges (pixels)
    pub const CATCHER_MARGIN: f32 = 40.0;
    /// Catcher spring
    pub const CATCHER_STIFFNESS: f32 = 400.0;
    pub const CATCHER_DAMPING: f32 = 40.0;

    /// Maze patrol step period (milliseconds)
    pub const PATROL_STEP_MS: f64 = 650.0;
}

/// Manhattan distance between two grid cells
#[inline]
pub fn manhattan(a: glam::IVec2, b: glam::IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}
