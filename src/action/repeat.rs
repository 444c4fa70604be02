use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Repeats one child a fixed number of times, or forever. Each time the
/// child completes it is reset, so its init runs again before its next
/// update; once the run count is reached the child is never ticked again.
#[derive(Clone, Debug)]
pub struct Repeat {
    child: Box<Action>,
    times: Option<u32>,
    done_runs: u32,
}

impl Repeat {
    pub fn times(child: impl Into<Action>, times: u32) -> Self {
        Self {
            child: Box::new(child.into()),
            times: Some(times),
            done_runs: 0,
        }
    }

    pub fn forever(child: impl Into<Action>) -> Self {
        Self {
            child: Box::new(child.into()),
            times: None,
            done_runs: 0,
        }
    }

    pub fn done_runs(&self) -> u32 {
        self.done_runs
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        if self.times == Some(self.done_runs) {
            return Status::Done;
        }
        start_child(&mut self.child, target);
        self.child.advance(dt, scene);
        if self.child.is_ending() {
            self.done_runs += 1;
            if self.times == Some(self.done_runs) {
                return Status::Done;
            }
            // Fresh state; the next tick re-initializes the child.
            self.child.reset();
        }
        Status::Running
    }

    pub(in crate::action) fn reset(&mut self) {
        self.done_runs = 0;
        self.child.reset();
    }

    pub(in crate::action) fn reversed(&self) -> Option<Repeat> {
        let child = self.child.reversed()?;
        Some(Repeat {
            child: Box::new(child),
            times: self.times,
            done_runs: 0,
        })
    }
}
