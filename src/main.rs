//! Heart Arcade entry point
//!
//! Native builds run a headless demo: the catch game plays itself, then the
//! maze is walked along its shortest route, dodging the patrol. The web build
//! is driven from JavaScript through `heart_arcade::web`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use heart_arcade::audio::{LogBackend, Sfx};
    use heart_arcade::consts::CATCH_TICK_MS;
    use heart_arcade::session::{CatchSession, MazeSession};
    use heart_arcade::sim::catch::CatchStatus;
    use heart_arcade::sim::maze::{MoveOutcome, shortest_route};
    use heart_arcade::{Journey, Settings, Stage};

    /// Simulated time budget per catch attempt (ms)
    const CATCH_ATTEMPT_MS: f64 = 5.0 * 60.0 * 1000.0;
    const CATCH_MAX_ATTEMPTS: u32 = 5;
    /// Simulated time between maze key presses (ms)
    const MAZE_STEP_MS: f64 = 150.0;
    const MAZE_MAX_STEPS: u32 = 2_000;

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Heart Arcade (native) starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(rand::random);
        let journey = Rc::new(RefCell::new(Journey::new()));

        // Landing -> proposal -> game
        while journey.borrow().stage() != Stage::Game {
            journey.borrow_mut().advance();
        }

        if play_catch(&settings, seed, journey.clone()) {
            // Gallery and notes are read, not played
            while !journey.borrow().is_finished() {
                journey.borrow_mut().advance();
            }
            play_maze(&settings);
        }

        log::info!("Finished on stage: {}", journey.borrow().stage().as_str());
    }

    fn play_catch(settings: &Settings, seed: u64, journey: Rc<RefCell<Journey>>) -> bool {
        let sfx = Sfx::new(LogBackend::new(), &settings.sfx);
        let mut session = CatchSession::new(settings, seed, sfx).on_won(move || {
            journey.borrow_mut().advance();
        });
        session.set_autopilot(true);

        for attempt in 1..=CATCH_MAX_ATTEMPTS {
            let mut elapsed = 0.0;
            while session.state().is_active() && elapsed < CATCH_ATTEMPT_MS {
                session.update(CATCH_TICK_MS);
                elapsed += CATCH_TICK_MS;
            }

            let state = session.state();
            match state.status {
                CatchStatus::Won => {
                    log::info!(
                        "Caught {} hearts on attempt {attempt} ({} tones played)",
                        state.score,
                        session.sink().backend().played()
                    );
                    return true;
                }
                CatchStatus::Lost => {
                    log::info!("Attempt {attempt} lost at {} hearts, retrying", state.score);
                }
                CatchStatus::Active => {
                    log::warn!("Attempt {attempt} ran out of time, retrying");
                }
            }
            session.restart();
        }

        log::warn!("Autopilot never won the catch game");
        false
    }

    fn play_maze(settings: &Settings) {
        let sfx = Sfx::new(LogBackend::new(), &settings.sfx);
        let mut session =
            MazeSession::new(settings, sfx).on_won(|| log::info!("Maze cleared, see you at the goal"));

        for _ in 0..MAZE_MAX_STEPS {
            session.update(MAZE_STEP_MS);

            let state = session.state();
            let Some(route) = shortest_route(&state.grid, state.player, state.grid.goal()) else {
                log::warn!("Goal is unreachable from {}", state.player);
                return;
            };
            let Some(&dir) = route.first() else {
                return;
            };

            // Wait for the patrol to step aside
            if state.player + dir.delta() == state.patrol_cell() {
                continue;
            }

            match session.press(dir) {
                MoveOutcome::Reached => return,
                MoveOutcome::Caught => log::info!("Bumped the patrol, starting over"),
                _ => {}
            }
        }
        log::warn!("Maze walk gave up after {MAZE_MAX_STEPS} steps");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is heart_arcade::web, this is just to satisfy the compiler
}
