use enumflags2::{bitflags, BitFlags};
use log::debug;
use slotmap::new_key_type;
use std::time::Duration;

use crate::graphics::Point;
use crate::pool::Pool;

new_key_type! {
    /// Weak handle to a node. Reads as `None` once the node was released
    /// and swept.
    pub struct Handle;

    pub struct FrameSetHandle;
}

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeFlag {
    Visible = 1 << 0,
    FlipX = 1 << 1,
    FlipY = 1 << 2,
}

/// Scene-graph node as seen by the action core: a bag of animatable
/// properties. Rendering reads these; actions write them.
#[derive(Clone, Debug)]
pub struct Node {
    pub pos: Point,
    /// Degrees, clockwise.
    pub rotation: f32,
    /// Per-axis scale factors.
    pub scale: Point,
    pub flags: BitFlags<NodeFlag>,
    pub frame_set: Option<FrameSetHandle>,
    pub frame_idx: usize,
    opacity: f32,
}

impl Node {
    pub fn new() -> Self {
        Self {
            pos: Point::default(),
            rotation: 0.0,
            scale: Point::splat(1.0),
            flags: NodeFlag::Visible.into(),
            frame_set: None,
            frame_idx: 0,
            opacity: 1.0,
        }
    }

    pub fn at(pos: impl Into<Point>) -> Self {
        let mut r = Self::new();
        r.pos = pos.into();
        r
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamps to [0, 1].
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlag::Visible)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered list of image frames shared by frame animations. The images
/// themselves live with the renderer; the core only tracks ids.
#[derive(Clone, Debug)]
pub struct FrameSet {
    pub frames: Vec<u32>,
    pub fps: u32,
}

impl FrameSet {
    pub fn new(frames: Vec<u32>, fps: u32) -> Self {
        Self {
            frames,
            fps: fps.max(1),
        }
    }

    /// Default display time of one frame.
    pub fn frame_len(&self) -> Duration {
        Duration::from_millis(1000 / self.fps as u64)
    }
}

/// Owns the node and frame-set pools. Both are swept once per frame by
/// `end_frame()`; everything in between only marks entries for reclamation.
pub struct Scene {
    nodes: Pool<Handle, Node>,
    frame_sets: Pool<FrameSetHandle, FrameSet>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Pool::new(),
            frame_sets: Pool::new(),
        }
    }

    pub fn insert_node(&mut self, node: Node) -> Handle {
        self.nodes.insert(node)
    }

    pub fn node(&self, h: Handle) -> Option<&Node> {
        self.nodes.get(h)
    }

    pub fn node_mut(&mut self, h: Handle) -> Option<&mut Node> {
        self.nodes.get_mut(h)
    }

    pub fn contains_node(&self, h: Handle) -> bool {
        self.nodes.contains(h)
    }

    pub fn retain_node(&mut self, h: Handle) {
        self.nodes.retain(h);
    }

    pub fn release_node(&mut self, h: Handle) {
        self.nodes.release(h);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn insert_frame_set(&mut self, fs: FrameSet) -> FrameSetHandle {
        self.frame_sets.insert(fs)
    }

    pub fn frame_set(&self, h: FrameSetHandle) -> Option<&FrameSet> {
        self.frame_sets.get(h)
    }

    pub fn retain_frame_set(&mut self, h: FrameSetHandle) {
        self.frame_sets.retain(h);
    }

    pub fn release_frame_set(&mut self, h: FrameSetHandle) {
        self.frame_sets.release(h);
    }

    /// End-of-frame sweep of both pools.
    pub fn end_frame(&mut self) {
        let swept = self.nodes.flush() + self.frame_sets.flush();
        if swept > 0 {
            debug!("swept {} unreferenced scene entries", swept);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
