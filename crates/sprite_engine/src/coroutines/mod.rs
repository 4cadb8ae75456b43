//! Cooperative per-entity coroutines
//!
//! A coroutine is a routine that runs a little game logic each tick and
//! suspends in between, either for one tick, for a wall-clock delay in
//! game time, or until a predicate holds. Routines can call sub-routines;
//! the scheduler flattens the nesting with an explicit frame stack so a
//! caller resumes the same tick its callee finishes.
//!
//! Coroutines are owned by entities: destroying an entity cancels every
//! coroutine it started, silently and without further steps.

use crate::ecs::components::ScriptError;
use crate::ecs::EntityId;
use crate::scene::Scene;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled coroutine
    pub struct CoroutineId;
}

/// A resumable unit of game logic
///
/// `step` is called once per resume and reports how to continue via
/// [`RoutineStep`]. Closures of the matching shape implement this
/// directly, so most routines are written as `move |scene, entity| ...`
/// with captured state.
pub trait Routine {
    /// Run until the next suspension point
    fn step(&mut self, scene: &mut Scene, entity: EntityId) -> Result<RoutineStep, ScriptError>;
}

impl<F> Routine for F
where
    F: FnMut(&mut Scene, EntityId) -> Result<RoutineStep, ScriptError>,
{
    fn step(&mut self, scene: &mut Scene, entity: EntityId) -> Result<RoutineStep, ScriptError> {
        self(scene, entity)
    }
}

/// Outcome of one routine step
pub enum RoutineStep {
    /// Yield; resume on the next tick
    Next,
    /// Suspend until the condition is satisfied
    Wait(Suspension),
    /// Run a sub-routine to completion, then resume this routine
    Call(Box<dyn Routine>),
    /// The routine is finished
    Done,
}

/// A condition a coroutine is suspended on
pub enum Suspension {
    /// Game-time delay in seconds
    Seconds {
        /// Full delay, restored when the wait is satisfied
        duration: f32,
        /// Time left before the wait is satisfied
        remaining: f32,
    },
    /// Resume once the predicate returns true
    Until(Box<dyn FnMut(&Scene) -> bool>),
}

impl Suspension {
    /// Suspend for `duration` seconds of scaled game time
    pub fn seconds(duration: f32) -> Self {
        Self::Seconds {
            duration,
            remaining: duration,
        }
    }

    /// Suspend until `predicate` returns true
    pub fn until(predicate: impl FnMut(&Scene) -> bool + 'static) -> Self {
        Self::Until(Box::new(predicate))
    }

    /// Check the condition, consuming `dt` seconds for timed waits
    ///
    /// Timed waits re-arm themselves on satisfaction so a suspension held
    /// inside a looping routine waits the full duration every pass.
    pub(crate) fn is_done(&mut self, dt: f32, scene: &Scene) -> bool {
        match self {
            Self::Seconds { duration, remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    *remaining = *duration;
                    true
                } else {
                    false
                }
            }
            Self::Until(predicate) => predicate(scene),
        }
    }
}

/// One scheduled coroutine: a stack of routine frames plus the condition
/// it is currently suspended on
pub struct Coroutine {
    frames: Vec<Box<dyn Routine>>,
    pending: Option<Suspension>,
}

impl Coroutine {
    fn new(routine: Box<dyn Routine>) -> Self {
        Self {
            frames: vec![routine],
            pending: None,
        }
    }

    /// Resume the coroutine for one tick
    ///
    /// Returns `Ok(true)` when the outermost routine has finished. A
    /// `Call` pushes the sub-routine and steps it in the same tick; a
    /// finished frame pops and its caller also resumes in the same tick.
    pub(crate) fn advance(
        &mut self,
        scene: &mut Scene,
        entity: EntityId,
        dt: f32,
    ) -> Result<bool, ScriptError> {
        if let Some(suspension) = &mut self.pending {
            if !suspension.is_done(dt, scene) {
                return Ok(false);
            }
            self.pending = None;
        }

        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Ok(true);
            };
            match frame.step(scene, entity)? {
                RoutineStep::Next => return Ok(false),
                RoutineStep::Wait(suspension) => {
                    self.pending = Some(suspension);
                    return Ok(false);
                }
                RoutineStep::Call(sub) => self.frames.push(sub),
                RoutineStep::Done => {
                    self.frames.pop();
                    if self.frames.is_empty() {
                        return Ok(true);
                    }
                }
            }
        }
    }
}

struct Slot {
    entity: EntityId,
    co: Option<Coroutine>,
}

/// Owns every scheduled coroutine
///
/// Coroutines are taken out of their slots while stepping so the routine
/// can borrow the scene mutably; a slot whose coroutine is in flight can
/// still be removed (the in-flight coroutine is then dropped instead of
/// restored).
#[derive(Default)]
pub struct CoroutineScheduler {
    slots: SlotMap<CoroutineId, Slot>,
}

impl CoroutineScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a routine on behalf of `entity`
    pub fn start(&mut self, entity: EntityId, routine: Box<dyn Routine>) -> CoroutineId {
        let id = self.slots.insert(Slot {
            entity,
            co: Some(Coroutine::new(routine)),
        });
        log::debug!("started coroutine {id:?} for entity {entity}");
        id
    }

    /// Cancel one coroutine; unknown ids are a no-op
    pub fn stop(&mut self, id: CoroutineId) {
        if self.slots.remove(id).is_some() {
            log::debug!("stopped coroutine {id:?}");
        }
    }

    /// Cancel every coroutine started by `entity`
    pub fn stop_all_for(&mut self, entity: EntityId) {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.entity != entity);
        let removed = before - self.slots.len();
        if removed > 0 {
            log::debug!("stopped {removed} coroutine(s) for entity {entity}");
        }
    }

    /// Whether the coroutine is still scheduled
    pub fn is_running(&self, id: CoroutineId) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of scheduled coroutines
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no coroutines are scheduled
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of scheduled ids; coroutines started after this call run
    /// on the next tick
    pub(crate) fn keys(&self) -> Vec<CoroutineId> {
        self.slots.keys().collect()
    }

    /// Take a coroutine out of its slot for stepping
    pub(crate) fn take(&mut self, id: CoroutineId) -> Option<(EntityId, Coroutine)> {
        let slot = self.slots.get_mut(id)?;
        slot.co.take().map(|co| (slot.entity, co))
    }

    /// Restore a coroutine after stepping; a no-op if the slot was removed
    /// while the coroutine ran
    pub(crate) fn restore(&mut self, id: CoroutineId, co: Coroutine) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.co = Some(co);
        }
    }

    /// Remove a finished coroutine's slot
    pub(crate) fn finish(&mut self, id: CoroutineId) {
        self.slots.remove(id);
        log::debug!("coroutine {id:?} finished");
    }
}
