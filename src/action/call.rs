use std::rc::Rc;
use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Invokes a callback exactly once and ends in the same tick. Clones
/// share the callback.
#[derive(Clone)]
pub struct Call {
    f: Rc<dyn Fn()>,
    fired: bool,
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call").field("fired", &self.fired).finish_non_exhaustive()
    }
}

impl Call {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self {
            f: Rc::new(f),
            fired: false,
        }
    }

    pub(in crate::action) fn update(&mut self, _dt: Duration, _target: scene::Handle,
        _scene: &mut Scene) -> Status
    {
        if !self.fired {
            (self.f)();
            self.fired = true;
        }
        Status::Done
    }

    pub(in crate::action) fn reset(&mut self) {
        self.fired = false;
    }

    /// Side effects have no defined inverse.
    pub(in crate::action) fn reversed(&self) -> Option<Call> {
        None
    }
}
