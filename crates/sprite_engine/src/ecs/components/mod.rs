//! Concrete component types

pub mod animator;
pub mod camera;
pub mod collider;
pub mod rigidbody;
pub mod script;
pub mod sprite;
pub mod transform;

pub use animator::Animator;
pub use camera::Camera;
pub use collider::Collider;
pub use rigidbody::Rigidbody;
pub use script::{CollisionInfo, Script, ScriptError, ScriptSlot};
pub use sprite::SpriteRenderer;
pub use transform::EntityTransform;
