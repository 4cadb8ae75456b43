//! # Sprite Engine
//!
//! A 2D sprite game engine core built around an entity-component runtime.
//!
//! ## Features
//!
//! - **Entity-Component Store**: entities own ordered component lists with
//!   type-filtered queries across the parent/child hierarchy
//! - **Transform Hierarchy**: local/world position math with reparenting
//!   and optional world-position preservation
//! - **AABB Physics**: solid push-apart resolution plus trigger overlap
//!   callbacks, filtered by collision layers and masks
//! - **Coroutines**: cooperative per-entity routines that suspend across
//!   ticks, with transparent nesting
//! - **Script Lifecycle**: Ready/Update/OnDestroy callbacks with per-entity
//!   failure isolation
//! - **Sprite Animation**: frame-index state machines with loop/hold/reset
//!   end behaviors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_engine::prelude::*;
//!
//! fn setup(scene: &mut Scene) {
//!     let player = scene.create_entity("Player", 10.0, 20.0, None).unwrap();
//!     let _ = scene.add_component(player, Component::Rigidbody(Rigidbody::new(5.0, 0.0)));
//! }
//!
//! fn main() {
//!     let mut registry = SceneRegistry::new();
//!     registry.register("main", setup).unwrap();
//!     let mut scene = Scene::new("main", registry).unwrap();
//!     scene.update(1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod coroutines;
pub mod animation;
pub mod scene;
pub mod input;
pub mod render;
pub mod config;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::{Rect, Vec2},
            time::Clock,
        },
        ecs::{
            components::{
                Animator, Camera, Collider, CollisionInfo, EntityTransform, Rigidbody, Script,
                ScriptError, SpriteRenderer,
            },
            Component, EntityId, EntityStore,
        },
        animation::{Animation, AnimationEnd},
        coroutines::{CoroutineId, Routine, RoutineStep, Suspension},
        input::{Button, InputState},
        physics::CollisionLayers,
        render::{render_scene, RenderSurface, SpriteDraw},
        scene::{Scene, SceneError, SceneRegistry},
        config::{Config, EngineConfig},
    };
}
