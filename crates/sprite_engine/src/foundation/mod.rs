//! Foundation utilities: math primitives and time management

pub mod math;
pub mod time;
