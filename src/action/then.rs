use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

/// Two-phase handoff: ticks only the first child until it ends, then
/// initializes the second in that same tick and from then on ticks only
/// the second. A lighter pairing than a 2-element `Sequence`, kept as its
/// own combinator because call sites chain pairs directly.
#[derive(Clone, Debug)]
pub struct Then {
    first: Box<Action>,
    second: Box<Action>,
}

impl Then {
    pub fn new(first: impl Into<Action>, second: impl Into<Action>) -> Self {
        Self {
            first: Box::new(first.into()),
            second: Box::new(second.into()),
        }
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        let mut dt = dt;
        if !self.first.is_ending() {
            start_child(&mut self.first, target);
            self.first.advance(dt, scene);
            if !self.first.is_ending() {
                return Status::Running;
            }
            // Handoff: the second initializes now, with a zero time slice.
            dt = Duration::from_secs(0);
        }
        start_child(&mut self.second, target);
        self.second.advance(dt, scene);
        if self.second.is_ending() {
            Status::Done
        } else {
            Status::Running
        }
    }

    pub(in crate::action) fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    pub(in crate::action) fn reversed(&self) -> Option<Then> {
        let first = self.second.reversed()?;
        let second = self.first.reversed()?;
        Some(Then {
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scene_with_node, tick_at};
    use super::*;
    use crate::graphics::Point;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Instant;

    #[test]
    fn second_starts_the_tick_the_first_ends() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let fired = Rc::new(Cell::new(false));
        let h = {
            let fired = fired.clone();
            mgr.start(node, Then::new(
                Tween::move_by(1.0, (10.0, 0.0)),
                Call::new(move || fired.set(true)),
            ))
        };
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 0.5);
        assert!(!fired.get());
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        // Move finished and the callback ran in the same tick.
        assert_eq!(scene.node(node).unwrap().pos, Point::new(10.0, 0.0));
        assert!(fired.get());
        assert!(!mgr.is_registered(h));
    }

    #[test]
    fn first_is_never_ticked_after_handoff() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, Then::new(
            Tween::move_by(1.0, (10.0, 0.0)),
            Tween::move_by(1.0, (0.0, 10.0)),
        ));
        for secs in [0.0, 0.5, 1.0, 1.5, 2.0] {
            tick_at(&mut mgr, &mut scene, t0, secs);
        }
        // If the first kept running past the handoff, x would exceed 10.
        assert_eq!(scene.node(node).unwrap().pos, Point::new(10.0, 10.0));
        assert!(!mgr.is_registered(h));
    }

    #[test]
    fn chains_nest() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, Then::new(
            Delay::new(1.0),
            Then::new(Delay::new(1.0), Tween::move_by(1.0, (3.0, 0.0))),
        ));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        tick_at(&mut mgr, &mut scene, t0, 2.0);
        // Both delays are spent; the move initialized this tick.
        assert_eq!(scene.node(node).unwrap().pos, Point::new(0.0, 0.0));
        assert!(mgr.is_registered(h));
        tick_at(&mut mgr, &mut scene, t0, 3.0);
        assert_eq!(scene.node(node).unwrap().pos, Point::new(3.0, 0.0));
        assert!(!mgr.is_registered(h));
    }

    #[test]
    fn reversed_swaps_phases() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let forward = Action::from(Then::new(
            Tween::move_by(1.0, (10.0, 0.0)),
            Tween::move_by(1.0, (0.0, 10.0)),
        ));
        let back = forward.reversed().unwrap();
        mgr.start(node, forward);
        for secs in [0.0, 1.0, 2.0] {
            tick_at(&mut mgr, &mut scene, t0, secs);
        }
        assert_eq!(scene.node(node).unwrap().pos, Point::new(10.0, 10.0));
        mgr.start(node, back);
        for secs in [3.0, 4.0, 5.0] {
            tick_at(&mut mgr, &mut scene, t0, secs);
        }
        assert_eq!(scene.node(node).unwrap().pos, Point::new(0.0, 0.0));
    }
}
