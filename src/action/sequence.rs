use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Runs children strictly one after another. Only the child at the current
/// index is ticked; the tick a child ends, the next child is bound and
/// initialized in the same chain (with a zero time slice, so no frame time
/// is counted twice). Ends once past the last child.
#[derive(Clone, Debug)]
pub struct Sequence {
    children: Vec<Action>,
    index: usize,
}

impl Sequence {
    pub fn new(children: Vec<Action>) -> Self {
        Self {
            children,
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        let mut dt = dt;
        loop {
            let child = match self.children.get_mut(self.index) {
                Some(c) => c,
                None => return Status::Done,
            };
            start_child(child, target);
            child.advance(dt, scene);
            if !child.is_ending() {
                return Status::Running;
            }
            self.index += 1;
            dt = Duration::from_secs(0);
        }
    }

    pub(in crate::action) fn reset(&mut self) {
        self.index = 0;
        for child in &mut self.children {
            child.reset();
        }
    }

    /// Undo semantics: every child reversed, in reversed order. `None` if
    /// any child has no inverse.
    pub(in crate::action) fn reversed(&self) -> Option<Sequence> {
        let children = self.children.iter().rev()
            .map(Action::reversed)
            .collect::<Option<Vec<_>>>()?;
        Some(Sequence::new(children))
    }
}
