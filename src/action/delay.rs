use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Does nothing for a fixed duration. A zero duration is done on its
/// first tick.
#[derive(Clone, Debug)]
pub struct Delay {
    duration: Duration,
    elapsed: Duration,
}

impl Delay {
    /// Negative `secs` clamps to zero.
    pub fn new(secs: f32) -> Self {
        Self {
            duration: Duration::from_secs_f32(secs.max(0.0)),
            elapsed: Duration::from_secs(0),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, _target: scene::Handle,
        _scene: &mut Scene) -> Status
    {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            Status::Done
        } else {
            Status::Running
        }
    }

    pub(in crate::action) fn reset(&mut self) {
        self.elapsed = Duration::from_secs(0);
    }

    /// Waiting is its own inverse.
    pub(in crate::action) fn reversed(&self) -> Option<Delay> {
        Some(Delay::new(self.duration.as_secs_f32()))
    }
}
