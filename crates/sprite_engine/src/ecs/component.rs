//! Component sum type and kind-tagged access
//!
//! Components are polymorphic over a closed capability set, so they are
//! modeled as an enum rather than trait objects. Typed lookups go through
//! [`ComponentView`], which downcasts a `Component` to one concrete variant
//! while preserving the store's insertion-order "first match" semantics.

use crate::ecs::components::{
    Animator, Camera, Collider, EntityTransform, Rigidbody, ScriptSlot, SpriteRenderer,
};

/// A component attached to exactly one entity
pub enum Component {
    /// Position in the parent/child hierarchy (exactly one per entity)
    Transform(EntityTransform),
    /// Axis-aligned collision shape with layer filtering
    Collider(Collider),
    /// Velocity state integrated by the physics pass
    Rigidbody(Rigidbody),
    /// Sprite draw state with layer/sort-order draw keys
    Sprite(SpriteRenderer),
    /// Active viewpoint marker
    Camera(Camera),
    /// Behavior callbacks driven by the script lifecycle
    Script(ScriptSlot),
    /// Frame-index animation state machine
    Animator(Animator),
}

impl Component {
    /// The kind tag for this component
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::Collider(_) => ComponentKind::Collider,
            Self::Rigidbody(_) => ComponentKind::Rigidbody,
            Self::Sprite(_) => ComponentKind::Sprite,
            Self::Camera(_) => ComponentKind::Camera,
            Self::Script(_) => ComponentKind::Script,
            Self::Animator(_) => ComponentKind::Animator,
        }
    }

    /// Shorthand for wrapping a script behavior
    pub fn script(script: impl crate::ecs::components::Script + 'static) -> Self {
        Self::Script(ScriptSlot::new(Box::new(script)))
    }
}

/// Kind tag distinguishing the component variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`EntityTransform`]
    Transform,
    /// [`Collider`]
    Collider,
    /// [`Rigidbody`]
    Rigidbody,
    /// [`SpriteRenderer`]
    Sprite,
    /// [`Camera`]
    Camera,
    /// Script behavior slot
    Script,
    /// [`Animator`]
    Animator,
}

/// Typed view into one [`Component`] variant
///
/// Implemented for every concrete component type except scripts, which are
/// trait objects and go through the store's dedicated slot accessors.
pub trait ComponentView: Sized {
    /// Kind tag of the viewed variant
    const KIND: ComponentKind;

    /// Borrow the concrete component if the variant matches
    fn view(component: &Component) -> Option<&Self>;

    /// Mutably borrow the concrete component if the variant matches
    fn view_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! impl_component_view {
    ($type:ty, $variant:ident) => {
        impl ComponentView for $type {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn view(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn view_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_component_view!(EntityTransform, Transform);
impl_component_view!(Collider, Collider);
impl_component_view!(Rigidbody, Rigidbody);
impl_component_view!(SpriteRenderer, Sprite);
impl_component_view!(Camera, Camera);
impl_component_view!(Animator, Animator);
