//! Named scene setup registry

use crate::scene::{Scene, SceneError};
use std::collections::HashMap;

/// Populates a freshly cleared scene with its entities
pub type SceneSetupFn = fn(&mut Scene);

/// Registry of named scene setup functions
///
/// Scenes are registered up front; transitions look setups up by name at
/// runtime. Duplicate names are refused so a later registration can never
/// silently shadow an earlier one.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, SceneSetupFn>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a setup function under `name`
    pub fn register(&mut self, name: &str, setup: SceneSetupFn) -> Result<(), SceneError> {
        if self.scenes.contains_key(name) {
            log::error!("scene '{name}' is already registered");
            return Err(SceneError::DuplicateScene(name.to_string()));
        }
        self.scenes.insert(name.to_string(), setup);
        log::info!("registered scene '{name}'");
        Ok(())
    }

    /// Look up a setup function by name
    pub fn get(&self, name: &str) -> Option<SceneSetupFn> {
        self.scenes.get(name).copied()
    }

    /// Whether a scene with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether no scenes are registered
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_is_refused() {
        let mut registry = SceneRegistry::new();
        registry.register("main", |_| {}).unwrap();

        let result = registry.register("main", |_| {});
        assert!(matches!(result, Err(SceneError::DuplicateScene(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = SceneRegistry::new();
        registry.register("main", |_| {}).unwrap();

        assert!(registry.get("main").is_some());
        assert!(registry.get("missing").is_none());
    }
}
