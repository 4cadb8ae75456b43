//! Entity storage with hierarchy-aware queries
//!
//! The store owns every entity record and its ordered component list, and
//! owns the transform hierarchy math: world positions are derived on every
//! read by walking the parent chain, and reparenting is guarded against
//! cycles with an ancestor walk. Lookups are linear scans in creation
//! order; the engine targets small entity counts, so this is the intended
//! cost model rather than an oversight.

use crate::ecs::components::{EntityTransform, Script};
use crate::ecs::{Component, ComponentKind, ComponentView, EntityId};
use crate::foundation::math::Vec2;
use thiserror::Error;

/// Store-level operation failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Entity names must be non-empty
    #[error("entity name cannot be empty")]
    EmptyName,
    /// The referenced entity does not exist
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    /// Entities own exactly one transform
    #[error("entity {0} already has a transform")]
    DuplicateTransform(EntityId),
    /// An entity cannot be its own parent
    #[error("cannot parent entity {0} to itself")]
    SelfParent(EntityId),
    /// Reparenting under a descendant would create a cycle
    #[error("cannot parent entity {child} under its descendant {parent}")]
    DescendantParent {
        /// The entity being reparented
        child: EntityId,
        /// The rejected parent, a descendant of `child`
        parent: EntityId,
    },
}

struct EntityRecord {
    id: EntityId,
    name: String,
    tag: Option<String>,
    components: Vec<Component>,
}

/// Owns entities and their component lists
#[derive(Default)]
pub struct EntityStore {
    entities: Vec<EntityRecord>,
    next_id: u32,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    // -- Entity lifecycle --

    /// Create an entity with a transform at `(x, y)`
    ///
    /// Fails when the name is empty or whitespace. Ids are monotonic and
    /// never reused.
    pub fn create_entity(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        tag: Option<&str>,
    ) -> Result<EntityId, StoreError> {
        if name.trim().is_empty() {
            log::error!("cannot create entity with an empty name");
            return Err(StoreError::EmptyName);
        }

        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.push(EntityRecord {
            id,
            name: name.to_string(),
            tag: tag.map(str::to_string),
            components: vec![Component::Transform(EntityTransform::new(x, y))],
        });
        log::info!(
            "created entity '{name}' (tag: {}) with id {id} at ({x}, {y})",
            tag.unwrap_or("untagged")
        );
        Ok(id)
    }

    /// Whether the entity exists
    pub fn exists(&self, id: EntityId) -> bool {
        self.record(id).is_some()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The entity's name
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.record(id).map(|r| r.name.as_str())
    }

    /// The entity's tag, if one was assigned
    pub fn tag(&self, id: EntityId) -> Option<&str> {
        self.record(id).and_then(|r| r.tag.as_deref())
    }

    /// All entity ids in creation order
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|r| r.id).collect()
    }

    /// Ids of entities whose transform has no parent
    pub fn root_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|r| {
                r.components
                    .iter()
                    .find_map(EntityTransform::view)
                    .is_some_and(|t| t.parent().is_none())
            })
            .map(|r| r.id)
            .collect()
    }

    /// Delete a single entity record, detaching it from its parent
    ///
    /// No recursion and no destruction callbacks happen here; the scene
    /// drives those before calling in. Missing entities are a logged no-op.
    pub(crate) fn delete_entity(&mut self, id: EntityId) {
        let Some(record) = self.record(id) else {
            log::warn!("attempted to remove non-existent entity {id}");
            return;
        };
        let name = record.name.clone();

        if let Some(parent) = self.get::<EntityTransform>(id).and_then(EntityTransform::parent) {
            if let Some(parent_transform) = self.get_mut::<EntityTransform>(parent) {
                parent_transform.remove_child(id);
            }
        }
        self.entities.retain(|r| r.id != id);
        log::info!("removed entity '{name}' with id {id}");
    }

    // -- Component operations --

    /// Attach a component to an entity
    ///
    /// Missing entities and duplicate transforms are logged and refused;
    /// the store is left unchanged.
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), StoreError> {
        let kind = component.kind();
        if kind == ComponentKind::Transform && self.get::<EntityTransform>(id).is_some() {
            log::error!("entity {id} already has a transform");
            return Err(StoreError::DuplicateTransform(id));
        }
        let Some(record) = self.record_mut(id) else {
            log::error!("cannot add {kind:?} component: entity {id} not found");
            return Err(StoreError::EntityNotFound(id));
        };
        record.components.push(component);
        log::debug!("added {kind:?} component to entity {id}");
        Ok(())
    }

    /// First component of kind `T` on the entity, in insertion order
    pub fn get<T: ComponentView>(&self, id: EntityId) -> Option<&T> {
        self.record(id)?.components.iter().find_map(T::view)
    }

    /// Mutable access to the first component of kind `T` on the entity
    pub fn get_mut<T: ComponentView>(&mut self, id: EntityId) -> Option<&mut T> {
        self.record_mut(id)?.components.iter_mut().find_map(T::view_mut)
    }

    /// The `index`-th component of kind `T` on the entity, counting only
    /// components of that kind in insertion order
    pub fn nth<T: ComponentView>(&self, id: EntityId, index: usize) -> Option<&T> {
        self.record(id)?.components.iter().filter_map(T::view).nth(index)
    }

    /// Number of components of kind `T` on the entity
    pub fn count<T: ComponentView>(&self, id: EntityId) -> usize {
        self.record(id)
            .map_or(0, |r| r.components.iter().filter(|c| T::view(c).is_some()).count())
    }

    /// First `T` on the entity itself, else on its direct children
    ///
    /// Searches exactly one level down, short-circuiting on the first match.
    pub fn get_in_children<T: ComponentView>(&self, id: EntityId) -> Option<&T> {
        if let Some(found) = self.get::<T>(id) {
            return Some(found);
        }
        let transform = self.get::<EntityTransform>(id)?;
        transform
            .children()
            .iter()
            .find_map(|&child| self.get::<T>(child))
    }

    /// First `T` on the entity or any ancestor, walking to the root
    pub fn get_in_parent<T: ComponentView>(&self, id: EntityId) -> Option<&T> {
        let mut current = Some(id);
        while let Some(cur) = current {
            if let Some(found) = self.get::<T>(cur) {
                return Some(found);
            }
            current = self.get::<EntityTransform>(cur).and_then(EntityTransform::parent);
        }
        None
    }

    /// Every component of kind `T` across all entities, in creation order
    ///
    /// Full linear scan; runs once per subsystem per tick by design.
    pub fn all<T: ComponentView>(&self) -> Vec<(EntityId, &T)> {
        self.entities
            .iter()
            .flat_map(|r| r.components.iter().filter_map(T::view).map(|c| (r.id, c)))
            .collect()
    }

    /// Ids of entities owning at least one component of kind `T`
    pub fn entities_with<T: ComponentView>(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|r| r.components.iter().any(|c| T::view(c).is_some()))
            .map(|r| r.id)
            .collect()
    }

    // -- Transform hierarchy --

    /// World position derived by walking the parent chain
    ///
    /// Recomputed on every read; nothing is cached. The reparent guard
    /// keeps the chain acyclic, so the walk terminates.
    pub fn world_position(&self, id: EntityId) -> Vec2 {
        let mut position = Vec2::zeros();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(transform) = self.get::<EntityTransform>(cur) else {
                break;
            };
            position += transform.local;
            current = transform.parent();
        }
        position
    }

    /// Move the entity to a world position by re-deriving its local offset
    pub fn set_world_position(&mut self, id: EntityId, world: Vec2) {
        let parent_world = self
            .get::<EntityTransform>(id)
            .and_then(EntityTransform::parent)
            .map_or_else(Vec2::zeros, |parent| self.world_position(parent));
        if let Some(transform) = self.get_mut::<EntityTransform>(id) {
            transform.local = world - parent_world;
        }
    }

    /// Whether `ancestor` appears on `entity`'s parent chain
    pub fn is_ancestor(&self, ancestor: EntityId, entity: EntityId) -> bool {
        let mut current = self
            .get::<EntityTransform>(entity)
            .and_then(EntityTransform::parent);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.get::<EntityTransform>(cur).and_then(EntityTransform::parent);
        }
        false
    }

    /// Reparent an entity, optionally preserving its world position
    ///
    /// Rejects self-parenting and parenting under a descendant (the cycle
    /// guard); refused mutations leave the hierarchy unchanged. With
    /// `maintain_world_position` the local offset is recomputed so the
    /// world position survives the change; otherwise the local offset is
    /// kept verbatim and the entity moves in world space.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        new_parent: Option<EntityId>,
        maintain_world_position: bool,
    ) -> Result<(), StoreError> {
        if new_parent == Some(child) {
            log::warn!("cannot parent entity {child} to itself");
            return Err(StoreError::SelfParent(child));
        }
        if self.get::<EntityTransform>(child).is_none() {
            log::error!("cannot reparent: entity {child} not found");
            return Err(StoreError::EntityNotFound(child));
        }
        if let Some(parent) = new_parent {
            if self.get::<EntityTransform>(parent).is_none() {
                log::error!("cannot reparent: parent entity {parent} not found");
                return Err(StoreError::EntityNotFound(parent));
            }
            if self.is_ancestor(child, parent) {
                log::warn!("cannot parent entity {child} to its descendant {parent}");
                return Err(StoreError::DescendantParent { child, parent });
            }
        }

        let world = maintain_world_position.then(|| self.world_position(child));

        let old_parent = self
            .get::<EntityTransform>(child)
            .and_then(EntityTransform::parent);
        if let Some(old) = old_parent {
            if let Some(old_transform) = self.get_mut::<EntityTransform>(old) {
                old_transform.remove_child(child);
            }
        }

        if let Some(transform) = self.get_mut::<EntityTransform>(child) {
            transform.set_parent_link(new_parent);
        }
        if let Some(parent) = new_parent {
            if let Some(parent_transform) = self.get_mut::<EntityTransform>(parent) {
                parent_transform.add_child(child);
            }
        }
        if let Some(world) = world {
            self.set_world_position(child, world);
        }

        log::debug!(
            "set parent of entity {child} to {}",
            new_parent.map_or_else(|| "none".to_string(), |p| p.to_string())
        );
        Ok(())
    }

    /// Ids of the entity and all descendants, children before parents
    ///
    /// This is the destruction order: leaves first, the entity itself last.
    pub(crate) fn subtree_post_order(&self, id: EntityId) -> Vec<EntityId> {
        let mut order = Vec::new();
        if let Some(transform) = self.get::<EntityTransform>(id) {
            for &child in transform.children() {
                order.extend(self.subtree_post_order(child));
            }
        }
        order.push(id);
        order
    }

    // -- Script slots --

    /// `(entity, component index)` of every script slot, in creation order
    pub(crate) fn script_slots(&self) -> Vec<(EntityId, usize)> {
        self.entities
            .iter()
            .flat_map(|r| {
                r.components
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.kind() == ComponentKind::Script)
                    .map(|(idx, _)| (r.id, idx))
            })
            .collect()
    }

    /// Script slot indices for one entity
    pub(crate) fn script_slots_of(&self, id: EntityId) -> Vec<usize> {
        self.record(id)
            .map(|r| {
                r.components
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.kind() == ComponentKind::Script)
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Take the boxed script out of a slot so a callback can borrow the
    /// scene mutably; returns the previous "ready has run" flag
    pub(crate) fn take_script(
        &mut self,
        id: EntityId,
        index: usize,
    ) -> Option<(Box<dyn Script>, bool)> {
        let record = self.record_mut(id)?;
        match record.components.get_mut(index) {
            Some(Component::Script(slot)) => {
                let ready = slot.ready_has_run();
                slot.take().map(|script| (script, ready))
            }
            _ => None,
        }
    }

    /// Put a script back into its slot with the given "ready has run" flag
    ///
    /// Silently drops the script when the entity or slot disappeared while
    /// the callback ran (the entity destroyed itself).
    pub(crate) fn restore_script(
        &mut self,
        id: EntityId,
        index: usize,
        script: Box<dyn Script>,
        ready_run: bool,
    ) {
        if let Some(record) = self.record_mut(id) {
            if let Some(Component::Script(slot)) = record.components.get_mut(index) {
                slot.restore(script, ready_run);
            }
        }
    }

    fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.iter().find(|r| r.id == id)
    }

    fn record_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.iter_mut().find(|r| r.id == id)
    }
}
