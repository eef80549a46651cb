//! Falling-catch game
//!
//! Hearts and bombs fall in pairs; the catcher collects hearts and must dodge
//! bombs. Ten hearts win, three bombs lose.

pub mod state;
pub mod tick;

pub use state::{CatchEvent, CatchState, CatchStatus, Catcher, FallingKind, FallingObject};
pub use tick::{CatchInput, spawn_pair, tick};
