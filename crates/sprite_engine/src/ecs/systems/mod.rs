//! Per-tick component passes driven by the scene

pub(crate) mod animation_system;
pub(crate) mod script_system;
