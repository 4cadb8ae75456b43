//! Scene ownership and the per-tick update loop
//!
//! The scene owns the entity store, the coroutine scheduler, the clock,
//! and the input snapshot, and drives every subsystem pass in a fixed
//! order each tick. Scene transitions go through a registry of named
//! setup functions; the active camera survives transitions.

pub mod registry;
#[allow(clippy::module_inception)]
pub mod scene;

pub use registry::{SceneRegistry, SceneSetupFn};
pub use scene::{Scene, SceneError};
