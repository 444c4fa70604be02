use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Runs two children concurrently against the same target. Both are bound
/// on the first tick; every tick each not-yet-finished child advances, the
/// first child before the second (so on conflicting property writes the
/// second child's write wins). Ends only once both children ended.
#[derive(Clone, Debug)]
pub struct Spawn {
    first: Box<Action>,
    second: Box<Action>,
}

impl Spawn {
    pub fn new(first: impl Into<Action>, second: impl Into<Action>) -> Self {
        Self {
            first: Box::new(first.into()),
            second: Box::new(second.into()),
        }
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        if !self.first.is_ending() {
            start_child(&mut self.first, target);
            self.first.advance(dt, scene);
        }
        if !self.second.is_ending() {
            start_child(&mut self.second, target);
            self.second.advance(dt, scene);
        }
        if self.first.is_ending() && self.second.is_ending() {
            Status::Done
        } else {
            Status::Running
        }
    }

    pub(in crate::action) fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    /// Both children reversed, in swapped order.
    pub(in crate::action) fn reversed(&self) -> Option<Spawn> {
        let first = self.second.reversed()?;
        let second = self.first.reversed()?;
        Some(Spawn {
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}
