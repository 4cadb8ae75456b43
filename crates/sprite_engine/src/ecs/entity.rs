//! Entity identifier

use std::fmt;

/// Entity identifier
///
/// Ids are allocated monotonically starting at 1 and are never reused
/// within a store. A scene reload replaces the store wholesale, so callers
/// must treat ids held across a reload as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an id from its raw value
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
