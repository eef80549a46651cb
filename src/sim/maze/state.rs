//! Maze game state: player, patrol and win bookkeeping

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, patrol_path};

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Maze already won; waiting for reset or dismiss
    Ignored,
    /// Wall or edge of the grid
    Blocked,
    Moved,
    /// Walked into the patrol and got sent back to the start
    Caught,
    /// Stepped onto the goal
    Reached,
}

/// Discrete things that happened, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeEvent {
    CaughtByPatrol,
    ReachedGoal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeState {
    pub grid: Grid,
    /// Precomputed patrol loop (never empty)
    pub patrol: Vec<IVec2>,
    pub patrol_index: usize,
    pub player: IVec2,
    pub won: bool,
    /// Last move ran into the patrol
    pub hit_patrol: bool,
    #[serde(skip)]
    pub events: Vec<MazeEvent>,
}

/// What the host draws each frame
#[derive(Debug, Clone, Serialize)]
pub struct MazeView<'a> {
    pub grid: &'a Grid,
    pub player: IVec2,
    pub patrol: IVec2,
    pub won: bool,
    pub hit_patrol: bool,
}

impl Default for MazeState {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

impl MazeState {
    pub fn new(grid: Grid) -> Self {
        let patrol = patrol_path(&grid);
        log::debug!("Maze patrol loop has {} cells", patrol.len());
        Self {
            player: grid.start(),
            grid,
            patrol,
            patrol_index: 0,
            won: false,
            hit_patrol: false,
            events: Vec::new(),
        }
    }

    /// Cell the patrol currently stands on
    pub fn patrol_cell(&self) -> IVec2 {
        self.patrol[self.patrol_index % self.patrol.len()]
    }

    /// Step the patrol to the next cell of its loop
    pub fn advance_patrol(&mut self) {
        self.patrol_index = (self.patrol_index + 1) % self.patrol.len().max(1);
    }

    /// Try to move the player one cell
    pub fn try_move(&mut self, dir: Direction) -> MoveOutcome {
        if self.won {
            return MoveOutcome::Ignored;
        }

        let next = self.player + dir.delta();
        if !self.grid.is_open(next) {
            return MoveOutcome::Blocked;
        }

        if next == self.patrol_cell() {
            self.player = self.grid.start();
            self.won = false;
            self.hit_patrol = true;
            self.events.push(MazeEvent::CaughtByPatrol);
            log::debug!("Ran into the patrol at {next}, back to start");
            return MoveOutcome::Caught;
        }

        self.hit_patrol = false;
        self.player = next;

        if self.player == self.grid.goal() {
            self.won = true;
            self.events.push(MazeEvent::ReachedGoal);
            log::info!("Maze goal reached");
            return MoveOutcome::Reached;
        }
        MoveOutcome::Moved
    }

    /// Play again from the start
    pub fn reset(&mut self) {
        self.player = self.grid.start();
        self.won = false;
        self.hit_patrol = false;
        self.patrol_index = 0;
        self.events.clear();
    }

    /// Close the win screen without moving the player
    pub fn dismiss(&mut self) {
        self.won = false;
    }

    pub fn drain_events(&mut self) -> Vec<MazeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> MazeView<'_> {
        MazeView {
            grid: &self.grid,
            player: self.player,
            patrol: self.patrol_cell(),
            won: self.won,
            hit_patrol: self.hit_patrol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// An open neighbour of `cell` (other than `avoid`) and the direction from it into `cell`
    fn approach(grid: &Grid, cell: IVec2, avoid: IVec2) -> Option<(IVec2, Direction)> {
        Direction::ALL.iter().find_map(|&dir| {
            let from = cell - dir.delta();
            (grid.is_open(from) && from != avoid).then_some((from, dir))
        })
    }

    #[test]
    fn test_three_steps_right_from_start() {
        let mut state = MazeState::default();
        let start = state.grid.start();
        for _ in 0..3 {
            assert_eq!(state.try_move(Direction::Right), MoveOutcome::Moved);
        }
        assert_eq!(state.player, start + IVec2::new(3, 0));
        assert!(!state.won);
    }

    #[test]
    fn test_wall_blocks_move() {
        let mut state = MazeState::default();
        let start = state.player;
        assert_eq!(state.try_move(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(state.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(state.player, start);
    }

    #[test]
    fn test_grid_edge_blocks_move() {
        let mut state = MazeState::new(Grid::parse(&["S.G"]));
        assert_eq!(state.try_move(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(state.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(state.player, IVec2::ZERO);
    }

    #[test]
    fn test_patrol_sends_player_back() {
        let mut state = MazeState::default();
        let patrol = state.patrol_cell();
        let (from, dir) = approach(&state.grid, patrol, state.grid.goal()).unwrap();
        state.player = from;

        assert_eq!(state.try_move(dir), MoveOutcome::Caught);
        assert_eq!(state.player, state.grid.start());
        assert!(state.hit_patrol);
        assert!(!state.won);
        assert_eq!(state.drain_events(), vec![MazeEvent::CaughtByPatrol]);

        // Next good step clears the flag
        assert_eq!(state.try_move(Direction::Right), MoveOutcome::Moved);
        assert!(!state.hit_patrol);
    }

    #[test]
    fn test_reaching_goal_wins_until_dismissed() {
        let mut state = MazeState::default();
        let goal = state.grid.goal();
        let (from, dir) = approach(&state.grid, goal, state.patrol_cell()).unwrap();
        state.player = from;

        assert_eq!(state.try_move(dir), MoveOutcome::Reached);
        assert!(state.won);
        assert_eq!(state.drain_events(), vec![MazeEvent::ReachedGoal]);

        // Moves are ignored while the win stands
        for dir in Direction::ALL {
            assert_eq!(state.try_move(dir), MoveOutcome::Ignored);
        }
        assert!(state.won);
        assert_eq!(state.player, goal);

        state.dismiss();
        assert!(!state.won);
        assert_eq!(state.player, goal);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = MazeState::default();
        state.try_move(Direction::Right);
        state.advance_patrol();
        state.won = true;
        state.hit_patrol = true;

        state.reset();
        assert_eq!(state.player, state.grid.start());
        assert_eq!(state.patrol_index, 0);
        assert!(!state.won);
        assert!(!state.hit_patrol);
    }

    #[test]
    fn test_patrol_wraps() {
        let mut state = MazeState::default();
        let len = state.patrol.len();
        let first = state.patrol_cell();
        for _ in 0..len {
            state.advance_patrol();
            assert!(state.patrol_index < len);
        }
        assert_eq!(state.patrol_index, 0);
        assert_eq!(state.patrol_cell(), first);
    }

    #[test]
    fn test_view_serializes() {
        let state = MazeState::default();
        let json = serde_json::to_value(state.view()).unwrap();
        assert_eq!(json["won"], false);
        assert_eq!(json["player"], serde_json::json!([1, 1]));
    }

    proptest! {
        #[test]
        fn prop_player_always_on_open_cell(
            moves in prop::collection::vec(0usize..4, 1..300),
            patrol_steps in prop::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut state = MazeState::default();
            for (i, m) in moves.iter().enumerate() {
                if patrol_steps.get(i).copied().unwrap_or(false) {
                    state.advance_patrol();
                }
                let dir = Direction::ALL[*m];
                let before = state.player;
                let target = before + dir.delta();
                let outcome = state.try_move(dir);

                prop_assert!(state.grid.is_open(state.player));
                prop_assert!(state.patrol_index < state.patrol.len());
                if !state.grid.is_open(target) {
                    prop_assert_eq!(state.player, before);
                }
                if outcome == MoveOutcome::Caught {
                    prop_assert_eq!(state.player, state.grid.start());
                    prop_assert!(!state.won);
                }
                if state.won {
                    state.dismiss();
                }
            }
        }
    }
}
