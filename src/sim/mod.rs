//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation time advances only through explicit ticks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod catch;
pub mod maze;

pub use catch::{
    CatchEvent, CatchInput, CatchState, CatchStatus, Catcher, FallingKind, FallingObject,
    spawn_pair, tick,
};
pub use maze::{
    Cell, DEFAULT_LAYOUT, Direction, Grid, MazeEvent, MazeState, MazeView, MoveOutcome,
    patrol_path, shortest_route,
};
