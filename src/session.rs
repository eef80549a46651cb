//! Game sessions
//!
//! A session owns one simulation plus the timers that drive it, forwards its
//! events to a feedback sink, and tells the host (once per run) when the game
//! has been won. Hosts feed it elapsed time and raw input; nothing here knows
//! about rendering.

use crate::audio::{Cue, FeedbackSink};
use crate::clock::{Interval, TickSource};
use crate::settings::Settings;
use crate::sim::catch::{CatchEvent, CatchInput, CatchState, FallingKind, spawn_pair, tick};
use crate::sim::maze::{Direction, Grid, MazeEvent, MazeState, MoveOutcome};

/// Called when a game is won
pub type CompletionCallback = Box<dyn FnMut()>;

/// Falling-catch game with its spawn and frame timers
pub struct CatchSession<S> {
    state: CatchState,
    input: CatchInput,
    spawner: Interval,
    frame: Interval,
    sink: S,
    on_won: Option<CompletionCallback>,
    won_reported: bool,
    clock_ms: f64,
}

impl<S: FeedbackSink> CatchSession<S> {
    pub fn new(settings: &Settings, seed: u64, sink: S) -> Self {
        let tuning = &settings.catch;
        let mut state = CatchState::with_rules(seed, tuning.target_score, tuning.lives);
        state.set_field_width(tuning.field_width);
        state.catcher = crate::sim::catch::Catcher::centered(state.field_width);
        log::info!(
            "Catch game started (seed {seed}, target {}, lives {})",
            state.target_score,
            state.lives
        );

        Self {
            state,
            input: CatchInput::default(),
            spawner: Interval::new(tuning.spawn_interval_ms),
            frame: Interval::new(tuning.tick_interval_ms),
            sink,
            on_won: None,
            won_reported: false,
            clock_ms: 0.0,
        }
    }

    /// Register the completion callback
    pub fn on_won(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_won = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &CatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CatchState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Pointer/touch moved (pixels from the left edge of the field)
    pub fn pointer_moved(&mut self, x: f32) {
        if self.state.is_active() {
            self.input.pointer_x = Some(x);
        }
    }

    /// Idle/demo mode
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Host resized the play field
    pub fn resize(&mut self, width: f32) {
        self.state.set_field_width(width);
    }

    /// Advance by `elapsed_ms` of host time
    pub fn update(&mut self, elapsed_ms: f64) {
        let elapsed_ms = elapsed_ms.max(0.0);
        self.clock_ms += elapsed_ms;
        if !self.state.is_active() {
            return;
        }

        let spawns = self.spawner.advance(elapsed_ms);
        let ticks = self.frame.advance(elapsed_ms);

        for _ in 0..spawns {
            spawn_pair(&mut self.state);
        }
        let dt = (self.frame.period_ms() / 1000.0) as f32;
        for _ in 0..ticks {
            tick(&mut self.state, &self.input, dt);
            if !self.state.is_active() {
                break;
            }
        }

        self.dispatch_events();

        if !self.state.is_active() {
            self.spawner.stop();
            self.frame.stop();
        }
    }

    /// UI button pressed
    pub fn click(&mut self) {
        self.sink.cue(Cue::Click, self.clock_ms);
    }

    /// Play again after a win or loss
    pub fn restart(&mut self) {
        self.state.restart();
        for timer in [&mut self.spawner, &mut self.frame] {
            timer.reset();
            timer.resume();
        }
        self.won_reported = false;
    }

    fn dispatch_events(&mut self) {
        let events = self.state.drain_events();
        let now = self.clock_ms;

        if events.contains(&CatchEvent::Won) {
            self.sink.cue(Cue::Success, now);
            if !self.won_reported {
                self.won_reported = true;
                if let Some(callback) = self.on_won.as_mut() {
                    callback();
                }
            }
            return;
        }
        if events.contains(&CatchEvent::Lost) {
            self.sink.cue(Cue::Failure, now);
            return;
        }

        for event in events {
            match event {
                CatchEvent::Caught {
                    kind: FallingKind::Beneficial,
                    ..
                } => self.sink.cue(Cue::Pop, now),
                CatchEvent::Caught {
                    kind: FallingKind::Hazardous,
                    ..
                } => self.sink.cue(Cue::Hazard, now),
                _ => {}
            }
        }
    }
}

/// Maze-patrol game with its patrol timer
pub struct MazeSession<S> {
    state: MazeState,
    patrol_timer: Interval,
    sink: S,
    on_won: Option<CompletionCallback>,
    won_reported: bool,
    clock_ms: f64,
}

impl<S: FeedbackSink> MazeSession<S> {
    pub fn new(settings: &Settings, sink: S) -> Self {
        let grid = settings
            .maze
            .layout
            .as_deref()
            .map(Grid::parse)
            .unwrap_or_default();
        log::info!(
            "Maze started ({}x{}, start {}, goal {})",
            grid.cols(),
            grid.rows(),
            grid.start(),
            grid.goal()
        );

        Self {
            state: MazeState::new(grid),
            patrol_timer: Interval::new(settings.maze.patrol_interval_ms),
            sink,
            on_won: None,
            won_reported: false,
            clock_ms: 0.0,
        }
    }

    /// Register the completion callback
    pub fn on_won(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_won = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &MazeState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MazeState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Advance the patrol by `elapsed_ms` of host time
    pub fn update(&mut self, elapsed_ms: f64) {
        self.clock_ms += elapsed_ms.max(0.0);
        // Patrol rests while the win screen is up
        if self.state.won {
            self.patrol_timer.stop();
            return;
        }
        for _ in 0..self.patrol_timer.advance(elapsed_ms) {
            self.state.advance_patrol();
        }
    }

    pub fn press(&mut self, dir: Direction) -> MoveOutcome {
        let outcome = self.state.try_move(dir);
        self.dispatch_events();
        outcome
    }

    /// Keyboard `key` value; `None` for keys the maze does not use
    pub fn press_key(&mut self, key: &str) -> Option<MoveOutcome> {
        Direction::from_key(key).map(|dir| self.press(dir))
    }

    pub fn click(&mut self) {
        self.sink.cue(Cue::Click, self.clock_ms);
    }

    /// Play again from the start
    pub fn reset(&mut self) {
        self.state.reset();
        self.patrol_timer.reset();
        self.patrol_timer.resume();
        self.won_reported = false;
    }

    /// Close the win screen and keep wandering
    pub fn dismiss(&mut self) {
        self.state.dismiss();
        self.patrol_timer.resume();
    }

    fn dispatch_events(&mut self) {
        let now = self.clock_ms;
        for event in self.state.drain_events() {
            match event {
                MazeEvent::CaughtByPatrol => self.sink.cue(Cue::Hazard, now),
                MazeEvent::ReachedGoal => {
                    self.sink.cue(Cue::Success, now);
                    if !self.won_reported {
                        self.won_reported = true;
                        if let Some(callback) = self.on_won.as_mut() {
                            callback();
                        }
                    }
                }
            }
        }
    }
}
