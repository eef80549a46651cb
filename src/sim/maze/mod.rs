//! Maze-patrol game
//!
//! Walk from the start to the goal with the arrow keys while a patrol steps
//! through a fixed loop of cells near the goal.

pub mod grid;
pub mod state;

pub use grid::{Cell, DEFAULT_LAYOUT, Direction, Grid, patrol_path, shortest_route};
pub use state::{MazeEvent, MazeState, MazeView, MoveOutcome};
