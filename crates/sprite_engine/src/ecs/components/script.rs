//! Script behavior component
//!
//! Scripts are trait objects driven by the per-tick lifecycle pass:
//! `ready` once on the first tick the component is seen, then `update`
//! every tick, `on_collision`/`on_trigger` from the physics pass, and
//! `on_destroy` when the owning entity is removed. Every callback receives
//! the scene as an explicit context plus the owning entity id; there is no
//! global state to reach through.

use crate::ecs::{EntityId, StoreError};
use crate::scene::{Scene, SceneError};
use thiserror::Error;

/// Failure raised by a script callback or coroutine step
///
/// Failures are always caught by the driving pass, logged with the owning
/// entity id, and isolated so one entity's failure never interrupts the
/// tick for others.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Free-form failure raised by game logic
    #[error("{0}")]
    Message(String),
    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Scene operation failed
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl ScriptError {
    /// Create a free-form script failure
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Snapshot of the other side of a collision or trigger overlap
#[derive(Debug, Clone)]
pub struct CollisionInfo {
    /// The other entity
    pub entity: EntityId,
    /// The other entity's tag, if any
    pub tag: Option<String>,
    /// Whether the other collider is a trigger volume
    pub is_trigger: bool,
}

/// Per-entity behavior with a Ready/Update/OnDestroy lifecycle
#[allow(unused_variables)]
pub trait Script {
    /// Called once, on the first tick this component is processed
    fn ready(&mut self, scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called every tick after `ready` has run
    fn update(&mut self, scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called when a solid collision involving this entity is resolved
    fn on_collision(
        &mut self,
        scene: &mut Scene,
        entity: EntityId,
        other: &CollisionInfo,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called when this entity's trigger collider overlaps another collider
    fn on_trigger(
        &mut self,
        scene: &mut Scene,
        entity: EntityId,
        other: &CollisionInfo,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called as the owning entity is destroyed
    fn on_destroy(&mut self, scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
        Ok(())
    }
}

/// Storage slot for one script component
///
/// The boxed script is taken out of the slot while a callback runs so the
/// callback can borrow the scene mutably, then restored afterwards. The
/// "ready has run" flag lives on the slot, independent of the script's own
/// construction.
pub struct ScriptSlot {
    script: Option<Box<dyn Script>>,
    ready_run: bool,
}

impl ScriptSlot {
    /// Wrap a boxed script in a fresh slot
    pub fn new(script: Box<dyn Script>) -> Self {
        Self {
            script: Some(script),
            ready_run: false,
        }
    }

    /// Whether `ready` has already run for this component
    pub fn ready_has_run(&self) -> bool {
        self.ready_run
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn Script>> {
        self.script.take()
    }

    pub(crate) fn restore(&mut self, script: Box<dyn Script>, ready_run: bool) {
        self.script = Some(script);
        self.ready_run = ready_run;
    }
}
