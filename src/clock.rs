//! Tick sources
//!
//! The host reports wall-clock time as it passes (animation frames, a test
//! loop, a native sleep loop); a tick source turns that into a whole number of
//! timer firings. Simulations never read a clock themselves.

use crate::consts::MAX_SUBSTEPS;

/// Something a simulation subscribes to for periodic work
pub trait TickSource {
    /// Feed elapsed host time (milliseconds); returns how many times the timer fired
    fn advance(&mut self, elapsed_ms: f64) -> u32;

    /// Forget any partially elapsed period
    fn reset(&mut self);

    /// Stop firing until resumed
    fn stop(&mut self);

    fn resume(&mut self);

    fn is_running(&self) -> bool;
}

/// Fixed-period timer with an accumulator
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    accumulator: f64,
    /// Firings allowed per `advance` (prevents spiral of death after a stall)
    max_firings: u32,
    running: bool,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
            max_firings: MAX_SUBSTEPS,
            running: true,
        }
    }

    /// Allow more (or fewer) catch-up firings per advance
    pub fn with_max_firings(mut self, max_firings: u32) -> Self {
        self.max_firings = max_firings.max(1);
        self
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

impl TickSource for Interval {
    fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += elapsed_ms.max(0.0);

        let mut fired = 0;
        while self.accumulator >= self.period_ms && fired < self.max_firings {
            self.accumulator -= self.period_ms;
            fired += 1;
        }
        // Drop time we could not catch up on
        if fired == self.max_firings && self.accumulator >= self.period_ms {
            log::debug!(
                "Timer ({} ms) dropped {:.1} ms of backlog",
                self.period_ms,
                self.accumulator
            );
            self.accumulator %= self.period_ms;
        }
        fired
    }

    fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    fn resume(&mut self) {
        self.running = true;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
