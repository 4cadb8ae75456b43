//! AABB physics: velocity integration, solid push-apart, trigger overlap
//!
//! The physics pass runs once per tick in three phases: integrate rigidbody
//! velocities, resolve solid collider pairs by pushing the movable side(s)
//! apart along the shallower axis, then report trigger overlaps. Candidate
//! pairs are filtered through [`CollisionLayers`] before any geometry test.

pub mod collision_layers;
pub(crate) mod physics_system;

pub use collision_layers::CollisionLayers;
