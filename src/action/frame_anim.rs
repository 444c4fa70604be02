use enum_map_derive::Enum;
use log::warn;
use std::time::Duration;

use crate::scene::{self, Scene};

use super::*;

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub enum AnimDirection {
    Forward,
    Backward,
}

impl AnimDirection {
    fn flipped(self) -> Self {
        match self {
            AnimDirection::Forward => AnimDirection::Backward,
            AnimDirection::Backward => AnimDirection::Forward,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Started,
    Running { frame: usize, acc: Duration },
    Done,
}

/// Steps a node through the frames of a frame set at a fixed interval,
/// then ends. When more than one interval elapsed since the last tick the
/// animation catches up frame by frame instead of skipping; the accumulator
/// is reduced by whole intervals, never re-anchored to "now", so no time
/// is lost between frames.
#[derive(Clone, Debug)]
pub struct FrameAnim {
    frames: scene::FrameSetHandle,
    frame_len: Duration,
    direction: AnimDirection,
    phase: Phase,
}

impl FrameAnim {
    /// `secs_per_frame` is clamped to at least 1 ms so catch-up always
    /// terminates.
    pub fn new(frames: scene::FrameSetHandle, secs_per_frame: f32) -> Self {
        Self {
            frames,
            frame_len: Duration::from_secs_f32(secs_per_frame.max(0.001)),
            direction: AnimDirection::Forward,
            phase: Phase::Started,
        }
    }

    pub fn backward(mut self) -> Self {
        self.direction = AnimDirection::Backward;
        self
    }

    pub fn direction(&self) -> AnimDirection {
        self.direction
    }

    fn start_frame(&self, len: usize) -> usize {
        match self.direction {
            AnimDirection::Forward => 0,
            AnimDirection::Backward => len - 1,
        }
    }

    // Next frame index, or None past the end of the run.
    fn next_frame(&self, frame: usize, len: usize) -> Option<usize> {
        match self.direction {
            AnimDirection::Forward => {
                if frame + 1 < len { Some(frame + 1) } else { None }
            }
            AnimDirection::Backward => frame.checked_sub(1),
        }
    }

    pub(in crate::action) fn update(&mut self, dt: Duration, target: scene::Handle,
        scene: &mut Scene) -> Status
    {
        let len = match scene.frame_set(self.frames) {
            Some(fs) => fs.frames.len(),
            None => {
                warn!("frame set {:?} is gone, stopping animation", self.frames);
                self.phase = Phase::Done;
                return Status::Done;
            }
        };
        if len == 0 {
            return Status::Done;
        }

        let (mut frame, mut acc) = match self.phase {
            Phase::Started => {
                let frame = self.start_frame(len);
                let node = match scene.node_mut(target) {
                    Some(n) => n,
                    None => return Status::Done,
                };
                node.frame_set = Some(self.frames);
                node.frame_idx = frame;
                (frame, Duration::from_secs(0))
            }
            Phase::Running { frame, acc } => (frame, acc),
            Phase::Done => return Status::Done,
        };

        acc += dt;
        while acc >= self.frame_len {
            acc -= self.frame_len;
            match self.next_frame(frame, len) {
                Some(next) => {
                    frame = next;
                    if let Some(node) = scene.node_mut(target) {
                        node.frame_idx = frame;
                    }
                }
                None => {
                    self.phase = Phase::Done;
                    return Status::Done;
                }
            }
        }
        self.phase = Phase::Running {
            frame,
            acc,
        };
        Status::Running
    }

    pub(in crate::action) fn reset(&mut self) {
        self.phase = Phase::Started;
    }

    /// The reversed animation replays the same frame list in reversed
    /// index order.
    pub(in crate::action) fn reversed(&self) -> Option<FrameAnim> {
        let mut r = self.clone();
        r.direction = self.direction.flipped();
        r.reset();
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scene_with_node, tick_at};
    use super::*;
    use crate::scene::FrameSet;
    use std::time::Instant;

    fn scene_with_anim() -> (Scene, scene::Handle, scene::FrameSetHandle) {
        let (mut scene, node) = scene_with_node();
        let frames = scene.insert_frame_set(FrameSet::new(vec![10, 11, 12, 13], 10));
        (scene, node, frames)
    }

    #[test]
    fn steps_through_frames_and_ends() {
        let (mut scene, node, frames) = scene_with_anim();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, FrameAnim::new(frames, 0.1));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        assert_eq!(scene.node(node).unwrap().frame_idx, 0);
        assert_eq!(scene.node(node).unwrap().frame_set, Some(frames));
        tick_at(&mut mgr, &mut scene, t0, 0.1);
        assert_eq!(scene.node(node).unwrap().frame_idx, 1);
        tick_at(&mut mgr, &mut scene, t0, 0.2);
        tick_at(&mut mgr, &mut scene, t0, 0.3);
        assert_eq!(scene.node(node).unwrap().frame_idx, 3);
        assert!(mgr.is_registered(h));
        // One more interval past the last frame ends the animation.
        tick_at(&mut mgr, &mut scene, t0, 0.4);
        assert!(!mgr.is_registered(h));
    }

    // A long frame catches up frame by frame, not by skipping to the end
    // of the elapsed span.
    #[test]
    fn catches_up_after_a_long_tick() {
        let (mut scene, node, frames) = scene_with_anim();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, FrameAnim::new(frames, 0.1));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        // 0.25 s elapse in one tick: exactly two whole intervals.
        tick_at(&mut mgr, &mut scene, t0, 0.25);
        assert_eq!(scene.node(node).unwrap().frame_idx, 2);
        assert!(mgr.is_registered(h));
        // The half-consumed interval carries over: 0.05 s remain.
        tick_at(&mut mgr, &mut scene, t0, 0.3);
        assert_eq!(scene.node(node).unwrap().frame_idx, 3);
    }

    #[test]
    fn backward_replays_in_reverse_order() {
        let (mut scene, node, frames) = scene_with_anim();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let forward = Action::from(FrameAnim::new(frames, 0.1));
        let reversed = forward.reversed().unwrap();
        mgr.start(node, reversed);
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        assert_eq!(scene.node(node).unwrap().frame_idx, 3);
        tick_at(&mut mgr, &mut scene, t0, 0.1);
        assert_eq!(scene.node(node).unwrap().frame_idx, 2);
    }

    #[test]
    fn stale_frame_set_stops_the_animation() {
        let (mut scene, node, frames) = scene_with_anim();
        let mut mgr = ActionManager::new();
        let t0 = Instant::now();
        let h = mgr.start(node, FrameAnim::new(frames, 0.1));
        tick_at(&mut mgr, &mut scene, t0, 0.0);
        scene.release_frame_set(frames);
        scene.end_frame();
        tick_at(&mut mgr, &mut scene, t0, 0.1);
        assert!(!mgr.is_registered(h));
    }
}
