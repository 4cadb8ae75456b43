//! Collider component for AABB collision detection

use crate::foundation::math::Rect;
use crate::physics::CollisionLayers;

/// Axis-aligned collision rectangle with layer-based filtering
///
/// The rect is in local space, offset from the entity's world position at
/// detection time. Two colliders interact only when each one's layer bit
/// appears in the other's mask.
#[derive(Debug, Clone)]
pub struct Collider {
    /// Collision rectangle in local space
    pub rect: Rect,
    /// Collision layer bitmask (what layer is this entity on?)
    pub layer: u32,
    /// Collision mask bitmask (what layers does this entity collide with?)
    pub mask: u32,
    /// Trigger volumes report overlap but never participate in push-apart
    pub is_trigger: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 8.0, 8.0),
            layer: CollisionLayers::DEFAULT,
            mask: CollisionLayers::DEFAULT,
            is_trigger: false,
        }
    }
}

impl Collider {
    /// Create a collider with the given local-space rect
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            ..Default::default()
        }
    }

    /// Builder: set the collision layer and mask
    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Builder: mark this collider as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }
}
