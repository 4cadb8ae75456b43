//! Transform component: local position plus hierarchy links
//!
//! Pure data component. World-position derivation and reparenting live on
//! [`EntityStore`](crate::ecs::EntityStore), which owns the parent chain.

use crate::ecs::EntityId;
use crate::foundation::math::Vec2;

/// Local-space position relative to an optional parent entity
///
/// Every entity owns exactly one transform, created alongside the entity.
/// World position is derived on demand by summing local offsets up the
/// parent chain; nothing is cached, so repeated reads within one tick
/// re-walk the chain each time.
#[derive(Debug, Clone)]
pub struct EntityTransform {
    /// Offset relative to the parent (or world origin when unparented)
    pub local: Vec2,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl EntityTransform {
    /// Create a transform at the given local position
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            local: Vec2::new(x, y),
            parent: None,
            children: Vec::new(),
        }
    }

    /// The parent entity, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Child entities in attachment order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn add_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) {
        self.children.retain(|&c| c != child);
    }
}
