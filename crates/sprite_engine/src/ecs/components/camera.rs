//! Camera component

/// Marks the entity providing the active viewpoint
///
/// At most one camera is active per scene; the scene refuses a second one.
/// The camera entity cannot be destroyed, reparented, or used as a parent,
/// and survives scene reloads with its position reset to the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera;
