//! Entity-component runtime
//!
//! Entities are plain ids owning an ordered list of components. Lookups are
//! linear scans in creation order; "first component of kind T" semantics
//! follow insertion order. Fine for the small entity counts this engine
//! targets.

pub mod component;
pub mod components;
pub mod entity;
pub mod store;
pub mod systems;

pub use component::{Component, ComponentKind, ComponentView};
pub use entity::EntityId;
pub use store::{EntityStore, StoreError};
