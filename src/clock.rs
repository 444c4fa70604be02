use std::time::{Duration, Instant};

/// Monotonic time source for the frame loop.
///
/// The host samples `now()` exactly once per frame and threads that one
/// `Instant` through listener handling, the action manager and rendering.
/// Actions never sample time themselves; siblings ticked in the same frame
/// always see the same instant.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        Instant::now()
    }

    /// Time since construction or the last `restart()`.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    pub fn restart(&mut self) {
        self.origin = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
