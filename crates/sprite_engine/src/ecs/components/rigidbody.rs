//! Rigidbody component

use crate::foundation::math::Vec2;

/// 2D velocity state
///
/// Presence of this component makes the entity's position subject to
/// per-tick displacement by the physics pass, and opts the entity into
/// push-apart resolution against solid colliders.
#[derive(Debug, Clone, Default)]
pub struct Rigidbody {
    /// Velocity in world units per second
    pub velocity: Vec2,
}

impl Rigidbody {
    /// Create a rigidbody with the given velocity
    pub fn new(vx: f32, vy: f32) -> Self {
        Self {
            velocity: Vec2::new(vx, vy),
        }
    }
}
