use std::time::Duration;

use crate::graphics::{lerp, Point};
use crate::scene::{self, Scene};

use super::*;

/// Destination strategy of a tween. `By` is a relative delta known at
/// construction; `To` is an absolute end value resolved against the
/// baseline captured on init. Both share the same interpolation path, so
/// `move_to(d, p)` on a node at `p0` is indistinguishable from
/// `move_by(d, p - p0)` started at the same moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoint<T> {
    By(T),
    To(T),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prop {
    Position(Endpoint<Point>),
    Scale(Endpoint<Point>),
    Rotation(Endpoint<f32>),
    Opacity(Endpoint<f32>),
}

#[derive(Clone, Copy, Debug)]
enum Resolved {
    Vector { baseline: Point, delta: Point },
    Scalar { baseline: f32, delta: f32 },
}

/// Interpolates one node property over a fixed duration. The property
/// value is written as `baseline + delta * progress` with progress in
/// [0, 1]; a zero duration pins progress to 1 on the first tick.
#[derive(Clone, Debug)]
pub struct Tween {
    duration: Duration,
    prop: Prop,
    elapsed: Duration,
    resolved: Option<Resolved>,
}

impl Tween {
    /// Negative `secs` clamps to zero.
    pub fn new(secs: f32, prop: Prop) -> Self {
        Self {
            duration: Duration::from_secs_f32(secs.max(0.0)),
            prop,
            elapsed: Duration::from_secs(0),
            resolved: None,
        }
    }

    pub fn move_by(secs: f32, delta: impl Into<Point>) -> Self {
        Self::new(secs, Prop::Position(Endpoint::By(delta.into())))
    }

    pub fn move_to(secs: f32, end: impl Into<Point>) -> Self {
        Self::new(secs, Prop::Position(Endpoint::To(end.into())))
    }

    pub fn scale_by(secs: f32, delta: impl Into<Point>) -> Self {
        Self::new(secs, Prop::Scale(Endpoint::By(delta.into())))
    }

    pub fn scale_to(secs: f32, end: impl Into<Point>) -> Self {
        Self::new(secs, Prop::Scale(Endpoint::To(end.into())))
    }

    pub fn rotate_by(secs: f32, degrees: f32) -> Self {
        Self::new(secs, Prop::Rotation(Endpoint::By(degrees)))
    }

    pub fn rotate_to(secs: f32, degrees: f32) -> Self {
        Self::new(secs, Prop::Rotation(Endpoint::To(degrees)))
    }

    pub fn fade_by(secs: f32, delta: f32) -> Self {
        Self::new(secs, Prop::Opacity(Endpoint::By(delta)))
    }

    pub fn fade_to(secs: f32, opacity: f32) -> Self {
        Self::new(secs, Prop::Opacity(Endpoint::To(opacity)))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Progress ratio in [0, 1]. Monotonic non-decreasing within one run.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            if self.resolved.is_some() { 1.0 } else { 0.0 }
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    fn init(&mut self, node: &scene::Node) -> Resolved {
        fn delta_of<T: Copy + std::ops::Sub<Output = T>>(end: Endpoint<T>, baseline: T) -> T {
            match end {
                Endpoint::By(d) => d,
                Endpoint::To(e) => e - baseline,
            }
        }

        let r = match self.prop {
            Prop::Position(end) => Resolved::Vector {
                baseline: node.pos,
                delta: delta_of(end, node.pos),
            },
            Prop::Scale(end) => Resolved::Vector {
                baseline: node.scale,
                delta: delta_of(end, node.scale),
            },
            Prop::Rotation(end) => Resolved::Scalar {
                baseline: node.rotation,
                delta: delta_of(end, node.rotation),
            },
            Prop::Opacity(end) => Resolved::Scalar {
                baseline: node.opacity(),
                delta: delta_of(end, node.opacity()),
            },
        };
        self.resolved = Some(r);
        r
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        let node = match scene.node_mut(target) {
            Some(n) => n,
            None => return Status::Done,
        };
        let resolved = match self.resolved {
            Some(r) => r,
            None => self.init(node),
        };

        self.elapsed += dt;
        let ratio = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        match (self.prop, resolved) {
            (Prop::Position(_), Resolved::Vector { baseline, delta }) => {
                node.pos = baseline + delta * ratio;
            }
            (Prop::Scale(_), Resolved::Vector { baseline, delta }) => {
                node.scale = baseline + delta * ratio;
            }
            (Prop::Rotation(_), Resolved::Scalar { baseline, delta }) => {
                node.rotation = lerp(baseline, delta, ratio);
            }
            (Prop::Opacity(_), Resolved::Scalar { baseline, delta }) => {
                node.set_opacity(lerp(baseline, delta, ratio));
            }
            _ => unreachable!(),
        }

        if ratio >= 1.0 {
            Status::Done
        } else {
            Status::Running
        }
    }

    pub(in crate::action) fn reset(&mut self) {
        self.elapsed = Duration::from_secs(0);
        self.resolved = None;
    }

    /// `By` tweens invert by negating the delta; `To` tweens have no
    /// inverse without the pre-action baseline.
    pub(in crate::action) fn reversed(&self) -> Option<Tween> {
        let prop = match self.prop {
            Prop::Position(Endpoint::By(d)) => Prop::Position(Endpoint::By(-d)),
            Prop::Scale(Endpoint::By(d)) => Prop::Scale(Endpoint::By(-d)),
            Prop::Rotation(Endpoint::By(d)) => Prop::Rotation(Endpoint::By(-d)),
            Prop::Opacity(Endpoint::By(d)) => Prop::Opacity(Endpoint::By(-d)),
            Prop::Position(Endpoint::To(_))
            | Prop::Scale(Endpoint::To(_))
            | Prop::Rotation(Endpoint::To(_))
            | Prop::Opacity(Endpoint::To(_)) => return None,
        };
        let mut r = self.clone();
        r.prop = prop;
        r.reset();
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scene_with_node, tick_at};
    use super::*;
    use crate::scene::Node;
    use std::time::Instant;

    fn run_move_by(scene: &mut Scene, node: scene::Handle, secs: f32, delta: (f32, f32),
        samples: &[f32]) -> Vec<Point>
    {
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        mgr.start(node, Tween::move_by(secs, delta));
        samples.iter().map(|&t| {
            tick_at(&mut mgr, scene, t0, t);
            scene.node(node).unwrap().pos
        }).collect()
    }

    // (0,0) + move_by(2s, (100,0)) sampled at 0/1/2/3s.
    #[test]
    fn move_by_example_trajectory() {
        let (mut scene, node) = scene_with_node();
        let got = run_move_by(&mut scene, node, 2.0, (100.0, 0.0), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(got, vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 0.0),
        ]);
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let (mut scene, node) = scene_with_node();
        let t0 = Instant::now();
        let mut action = Action::from(Tween::move_by(2.0, (10.0, 0.0)));
        action.start_with(node);
        let mut last = 0.0;
        for &t in &[0.0, 0.3, 0.9, 1.4, 1.9, 2.0, 2.5, 7.0] {
            action.update(&mut Update {
                time: t0 + Duration::from_secs_f32(t),
                scene: &mut scene,
            });
            let p = match action.kind() {
                Kind::Tween(tw) => tw.progress(),
                _ => unreachable!(),
            };
            assert!(p >= last && p <= 1.0, "progress {} after {} at t={}", p, last, t);
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, Tween::move_by(0.0, (42.0, -7.0)));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        assert_eq!(scene.node(node).unwrap().pos, Point::new(42.0, -7.0));
        assert!(!mgr.is_registered(h));
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let tw = Tween::move_by(-3.0, (1.0, 1.0));
        assert_eq!(tw.duration(), Duration::from_secs(0));
    }

    // By/To equivalence: MoveTo(D, P) from P0 matches MoveBy(D, P - P0)
    // at every sample.
    #[test]
    fn move_to_equals_move_by_of_difference() {
        let p0 = Point::new(30.0, -10.0);
        let end = Point::new(90.0, 50.0);
        let samples = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5];

        let mut scene_a = Scene::new();
        let node_a = scene_a.insert_node(Node::at(p0.tuple()));
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        mgr.start(node_a, Tween::move_to(2.0, end.tuple()));
        let via_to: Vec<_> = samples.iter().map(|&t| {
            tick_at(&mut mgr, &mut scene_a, t0, t);
            scene_a.node(node_a).unwrap().pos
        }).collect();

        let mut scene_b = Scene::new();
        let node_b = scene_b.insert_node(Node::at(p0.tuple()));
        let via_by = run_move_by(&mut scene_b, node_b, 2.0, (end - p0).tuple(), &samples);

        assert_eq!(via_to, via_by);
        assert_eq!(*via_to.last().unwrap(), end);
    }

    #[test]
    fn to_tween_captures_baseline_at_start_not_construction() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let action = Action::from(Tween::fade_to(1.0, 0.25));
        // Node changes after construction, before the action starts.
        scene.node_mut(node).unwrap().set_opacity(0.75);
        mgr.start(node, action);
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 0.5);
        let mid = scene.node(node).unwrap().opacity();
        assert!((mid - 0.5).abs() < 1e-5);
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        assert!((scene.node(node).unwrap().opacity() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn opacity_writes_stay_clamped() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        mgr.start(node, Tween::fade_by(1.0, -2.0));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        assert_eq!(scene.node(node).unwrap().opacity(), 0.0);
    }

    #[test]
    fn rotate_and_scale_interpolate() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        mgr.start(node, Tween::rotate_by(2.0, 90.0));
        mgr.start(node, Tween::scale_to(2.0, (3.0, 3.0)));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        let n = scene.node(node).unwrap();
        assert!((n.rotation - 45.0).abs() < 1e-4);
        assert_eq!(n.scale, Point::new(2.0, 2.0));
    }

    #[test]
    fn reversed_by_undoes_the_move() {
        let (mut scene, node) = scene_with_node();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let forward = Action::from(Tween::move_by(1.0, (10.0, 4.0)));
        let back = forward.reversed().unwrap();
        mgr.start(node, forward);
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        tick_at(&mut mgr, &mut scene, t0, 1.0);
        assert_eq!(scene.node(node).unwrap().pos, Point::new(10.0, 4.0));
        mgr.start(node, back);
        tick_at(&mut mgr, &mut scene, t0, 2.0);
        tick_at(&mut mgr, &mut scene, t0, 3.0);
        assert_eq!(scene.node(node).unwrap().pos, Point::new(0.0, 0.0));
    }

    // Reset + rerun reproduces a fresh action's trajectory, including
    // re-capturing the baseline.
    #[test]
    fn reset_recaptures_baseline() {
        let (mut scene, node) = scene_with_node();
        let t0 = Instant::now();
        let mut action = Action::from(Tween::move_by(1.0, (10.0, 0.0)));
        action.start_with(node);
        action.update(&mut Update { time: t0, scene: &mut scene });
        action.update(&mut Update { time: t0 + Duration::from_secs(1), scene: &mut scene });
        assert!(action.is_ending());
        assert_eq!(scene.node(node).unwrap().pos, Point::new(10.0, 0.0));

        action.reset();
        let t1 = t0 + Duration::from_secs(5);
        action.update(&mut Update { time: t1, scene: &mut scene });
        action.update(&mut Update { time: t1 + Duration::from_secs(1), scene: &mut scene });
        assert!(action.is_ending());
        // Second run started from the new baseline (10, 0).
        assert_eq!(scene.node(node).unwrap().pos, Point::new(20.0, 0.0));
    }
}
