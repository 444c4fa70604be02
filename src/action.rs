pub mod call;
pub mod delay;
pub mod frame_anim;
pub mod repeat;
pub mod sequence;
pub mod spawn;
pub mod then;
pub mod tween;

use log::{debug, warn};
use slotmap::{new_key_type, SlotMap};
use std::time::{Duration, Instant};

use crate::scene::{self, Scene};

pub use self::call::Call;
pub use self::delay::Delay;
pub use self::frame_anim::{AnimDirection, FrameAnim};
pub use self::repeat::Repeat;
pub use self::sequence::Sequence;
pub use self::spawn::Spawn;
pub use self::then::Then;
pub use self::tween::Tween;

new_key_type! {
    /// Handle to an action registered with an `ActionManager`. Stale once
    /// the manager removed the action.
    pub struct Handle;
}

/// Lifecycle of one action.
///
/// `Fresh` covers both "never bound" and "reset"; a bound `Fresh` action
/// starts running on its first update. The per-kind init (baseline capture
/// and the like) happens inside the kind on its first update after a bind
/// or reset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Fresh,
    Running,
    Paused,
    /// Finished or stopped; the manager drops it on its next pass.
    Ending,
}

/// Per-frame tick context. `time` is the single frame-wide sample taken by
/// the host loop; every action ticked this frame sees the same instant.
pub struct Update<'a> {
    pub time: Instant,
    pub scene: &'a mut Scene,
}

/// Completion signal a kind reports to its owner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Running,
    Done,
}

#[derive(Clone, Debug)]
pub enum Kind {
    Call(Call),
    Delay(Delay),
    FrameAnim(FrameAnim),
    Repeat(Repeat),
    Sequence(Sequence),
    Spawn(Spawn),
    Then(Then),
    Tween(Tween),
}

impl Kind {
    fn update(&mut self, dt: Duration, target: scene::Handle, scene: &mut Scene) -> Status {
        match self {
            Kind::Call(a) => a.update(dt, target, scene),
            Kind::Delay(a) => a.update(dt, target, scene),
            Kind::FrameAnim(a) => a.update(dt, target, scene),
            Kind::Repeat(a) => a.update(dt, target, scene),
            Kind::Sequence(a) => a.update(dt, target, scene),
            Kind::Spawn(a) => a.update(dt, target, scene),
            Kind::Then(a) => a.update(dt, target, scene),
            Kind::Tween(a) => a.update(dt, target, scene),
        }
    }

    fn reset(&mut self) {
        match self {
            Kind::Call(a) => a.reset(),
            Kind::Delay(a) => a.reset(),
            Kind::FrameAnim(a) => a.reset(),
            Kind::Repeat(a) => a.reset(),
            Kind::Sequence(a) => a.reset(),
            Kind::Spawn(a) => a.reset(),
            Kind::Then(a) => a.reset(),
            Kind::Tween(a) => a.reset(),
        }
    }

    fn reversed(&self) -> Option<Kind> {
        match self {
            Kind::Call(a) => a.reversed().map(Kind::Call),
            Kind::Delay(a) => a.reversed().map(Kind::Delay),
            Kind::FrameAnim(a) => a.reversed().map(Kind::FrameAnim),
            Kind::Repeat(a) => a.reversed().map(Kind::Repeat),
            Kind::Sequence(a) => a.reversed().map(Kind::Sequence),
            Kind::Spawn(a) => a.reversed().map(Kind::Spawn),
            Kind::Then(a) => a.reversed().map(Kind::Then),
            Kind::Tween(a) => a.reversed().map(Kind::Tween),
        }
    }
}

/// One schedulable unit: common state machine plus the kind-specific
/// behavior. Holds only a weak handle to its target node; a target that
/// disappears makes the action stop, never crash.
#[derive(Debug)]
pub struct Action {
    state: State,
    target: Option<scene::Handle>,
    name: Option<String>,
    last_time: Option<Instant>,
    kind: Kind,
}

impl Action {
    pub fn new(kind: impl Into<Kind>) -> Self {
        Self {
            state: State::Fresh,
            target: None,
            name: None,
            last_time: None,
            kind: kind.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn target(&self) -> Option<scene::Handle> {
        self.target
    }

    pub fn is_ending(&self) -> bool {
        self.state == State::Ending
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Binds the action to `target` and starts it running.
    ///
    /// An action binds at most once: binding an already-bound action to a
    /// different target asserts in debug builds and is a logged no-op in
    /// release builds. Binding again to the same target just restarts the
    /// running flag (used after `reset()`).
    pub fn start_with(&mut self, target: scene::Handle) {
        match self.target {
            None => {
                self.target = Some(target);
                self.state = State::Running;
                self.last_time = None;
            }
            Some(bound) if bound == target => {
                if self.state == State::Fresh {
                    self.state = State::Running;
                    self.last_time = None;
                }
            }
            Some(bound) => {
                debug_assert!(false, "action {:?} already bound to {:?}, ignoring bind to {:?}",
                    self.name, bound, target);
                warn!("action {:?} already bound to {:?}, ignoring bind to {:?}",
                    self.name, bound, target);
            }
        }
    }

    pub fn set_target(&mut self, target: scene::Handle) {
        self.start_with(target);
    }

    /// Stops ticking without losing progress.
    pub fn pause(&mut self) {
        if self.state == State::Running {
            self.state = State::Paused;
        }
    }

    /// Resumes ticking. Wall time spent paused never counts as elapsed:
    /// the next update after a resume contributes zero time.
    pub fn resume(&mut self) {
        if self.state == State::Paused {
            self.state = State::Running;
            self.last_time = None;
        }
    }

    /// Cooperative stop: the action merely enters `Ending` and is dropped
    /// by the manager on its next pass.
    pub fn stop(&mut self) {
        self.state = State::Ending;
    }

    /// Returns the action to `Fresh`, keeping the target binding. The next
    /// update re-runs kind init, reproducing a freshly constructed action's
    /// trajectory.
    pub fn reset(&mut self) {
        self.state = State::Fresh;
        self.last_time = None;
        self.kind.reset();
    }

    /// Per-frame tick. No-op unless the action is running (or bound and
    /// fresh, in which case this is the initializing tick).
    pub fn update(&mut self, ctx: &mut Update) {
        match self.state {
            State::Fresh | State::Running => {}
            State::Paused | State::Ending => return,
        }
        let dt = match self.last_time {
            Some(last) => ctx.time.saturating_duration_since(last),
            None => Duration::from_secs(0),
        };
        self.last_time = Some(ctx.time);
        self.advance(dt, ctx.scene);
    }

    /// Advances by an externally computed time slice. Composites drive
    /// their children through this so that a paused parent suspends the
    /// whole subtree's notion of time.
    pub(crate) fn advance(&mut self, dt: Duration, scene: &mut Scene) {
        match self.state {
            State::Fresh => {
                if self.target.is_none() {
                    return;
                }
                self.state = State::Running;
            }
            State::Running => {}
            State::Paused | State::Ending => return,
        }
        let target = match self.target {
            Some(t) => t,
            None => return,
        };
        if !scene.contains_node(target) {
            warn!("action {:?} lost target node {:?}, stopping", self.name, target);
            self.state = State::Ending;
            return;
        }
        if self.kind.update(dt, target, scene) == Status::Done {
            self.state = State::Ending;
        }
    }

    /// The inverse action, fresh and unbound, when one is defined:
    /// delta-tweens negate, composites reverse children and order, frame
    /// animations flip direction. `None` for kinds with no well-defined
    /// inverse (absolute-target tweens, callbacks).
    pub fn reversed(&self) -> Option<Action> {
        let kind = self.kind.reversed()?;
        Some(Action {
            state: State::Fresh,
            target: None,
            name: self.name.clone(),
            last_time: None,
            kind,
        })
    }
}

/// Deep copy with all runtime state dropped: unbound, `Fresh`, zero
/// elapsed time, children copied recursively. Parameters (durations,
/// deltas, callbacks, frame lists) are shared or copied as-is.
impl Clone for Action {
    fn clone(&self) -> Self {
        let mut kind = self.kind.clone();
        kind.reset();
        Self {
            state: State::Fresh,
            target: None,
            name: self.name.clone(),
            last_time: None,
            kind,
        }
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident),+ $(,)?) => {
        $(
            impl From<$kind> for Kind {
                fn from(v: $kind) -> Self {
                    Kind::$kind(v)
                }
            }

            impl From<$kind> for Action {
                fn from(v: $kind) -> Self {
                    Action::new(Kind::$kind(v))
                }
            }
        )+
    };
}

impl_from_kind!(Call, Delay, FrameAnim, Repeat, Sequence, Spawn, Then, Tween);

/// Binds an owned child to the composite's target unless already bound.
pub(crate) fn start_child(child: &mut Action, target: scene::Handle) {
    if child.target().is_none() {
        child.start_with(target);
    }
}

/// Owns the set of currently-running actions and ticks them once per
/// frame. An action that reaches `Ending` is removed in the same tick and
/// never updated again.
pub struct ActionManager {
    actions: SlotMap<Handle, Action>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self {
            actions: SlotMap::with_key(),
        }
    }

    /// Binds `action` to `target` and registers it.
    pub fn start(&mut self, target: scene::Handle, action: impl Into<Action>) -> Handle {
        let mut action = action.into();
        action.start_with(target);
        self.add(action)
    }

    /// Registers an already-bound action.
    pub fn add(&mut self, action: Action) -> Handle {
        if action.target().is_none() {
            warn!("adding unbound action {:?}; it will not run", action.name);
        }
        let h = self.actions.insert(action);
        debug!("registered action {:?}", h);
        h
    }

    pub fn is_registered(&self, h: Handle) -> bool {
        self.actions.contains_key(h)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, h: Handle) -> Option<&Action> {
        self.actions.get(h)
    }

    /// Stale handles are ignored by all three, as are states where the
    /// transition doesn't apply.
    pub fn pause(&mut self, h: Handle) {
        if let Some(a) = self.actions.get_mut(h) {
            a.pause();
        }
    }

    pub fn resume(&mut self, h: Handle) {
        if let Some(a) = self.actions.get_mut(h) {
            a.resume();
        }
    }

    pub fn stop(&mut self, h: Handle) {
        if let Some(a) = self.actions.get_mut(h) {
            a.stop();
        }
    }

    /// Drops every registered action. Whatever they referenced becomes
    /// reclaimable by the scene's next end-of-frame sweep.
    pub fn stop_all(&mut self) {
        debug!("dropping {} actions", self.actions.len());
        self.actions.clear();
    }

    /// Ticks every registered action once and removes the finished ones.
    pub fn update(&mut self, ctx: &mut Update) {
        let mut done = Vec::new();
        for (h, action) in self.actions.iter_mut() {
            action.update(ctx);
            if action.is_ending() {
                done.push(h);
            }
        }
        for h in done {
            debug!("removing finished action {:?}", h);
            self.actions.remove(h);
        }
    }
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}
