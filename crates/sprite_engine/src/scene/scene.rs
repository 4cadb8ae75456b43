//! The scene: owner of all per-tick state

use crate::coroutines::{CoroutineId, CoroutineScheduler, Routine, RoutineStep, Suspension};
use crate::ecs::components::{Animator, Camera, CollisionInfo, Script, ScriptError, SpriteRenderer};
use crate::ecs::systems::{animation_system, script_system};
use crate::ecs::{Component, ComponentKind, EntityId, EntityStore, StoreError};
use crate::foundation::math::Vec2;
use crate::foundation::time::Clock;
use crate::input::{Button, InputState};
use crate::physics::physics_system;
use crate::scene::SceneRegistry;
use thiserror::Error;

/// Scene-level operation failure
#[derive(Debug, Error)]
pub enum SceneError {
    /// No scene with this name is registered
    #[error("scene '{0}' is not registered")]
    UnknownScene(String),
    /// A scene with this name is already registered
    #[error("scene '{0}' is already registered")]
    DuplicateScene(String),
    /// The active camera cannot be destroyed or reparented away
    #[error("entity {0} holds or contains the active camera")]
    CameraProtected(EntityId),
    /// A scene has exactly one camera
    #[error("scene already has an active camera")]
    DuplicateCamera,
    /// Underlying store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A running game scene
///
/// Owns the entity store, coroutine scheduler, clock, and input snapshot,
/// and drives the fixed per-tick pass order: scripts, physics, coroutines,
/// animation. A scene always has exactly one active camera; it is created
/// at startup and survives scene transitions with its position reset.
pub struct Scene {
    name: String,
    store: EntityStore,
    coroutines: CoroutineScheduler,
    clock: Clock,
    input: InputState,
    camera: EntityId,
    registry: SceneRegistry,
}

impl Scene {
    /// Create a scene, bootstrap the camera, and load `initial`
    pub fn new(initial: &str, registry: SceneRegistry) -> Result<Self, SceneError> {
        let mut store = EntityStore::new();
        let camera = store.create_entity("MainCamera", 0.0, 0.0, None)?;
        store.add_component(camera, Component::Camera(Camera))?;

        let mut scene = Self {
            name: String::new(),
            store,
            coroutines: CoroutineScheduler::new(),
            clock: Clock::new(),
            input: InputState::new(),
            camera,
            registry,
        };
        scene.load_scene(initial)?;
        Ok(scene)
    }

    /// Name of the currently loaded scene
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity store
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable access to the entity store
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// The simulation clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable access to the simulation clock
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// The entity carrying the active camera
    pub fn camera(&self) -> EntityId {
        self.camera
    }

    /// World position of the active camera
    pub fn camera_position(&self) -> Vec2 {
        self.store.world_position(self.camera)
    }

    // -- Input --

    /// Record whether a button is held; the embedder calls this before
    /// each tick
    pub fn set_button(&mut self, button: Button, held: bool) {
        self.input.set_held(button, held);
    }

    /// Whether a button is currently held
    pub fn is_button_held(&self, button: Button) -> bool {
        self.input.is_held(button)
    }

    // -- Scene transitions --

    /// Tear down the current scene and run the named setup
    ///
    /// Every entity except the camera subtree is destroyed (with
    /// `on_destroy` callbacks and coroutine cancellation), the camera is
    /// reset to the origin, and the new setup runs against the cleared
    /// scene. An unknown name fails before anything is torn down.
    pub fn load_scene(&mut self, name: &str) -> Result<(), SceneError> {
        let Some(setup) = self.registry.get(name) else {
            log::error!("cannot load unknown scene '{name}'");
            return Err(SceneError::UnknownScene(name.to_string()));
        };

        log::info!("loading scene '{name}'");
        for root in self.store.root_ids() {
            if root == self.camera {
                continue;
            }
            self.destroy_subtree(root);
        }
        self.store.set_world_position(self.camera, Vec2::zeros());

        self.name = name.to_string();
        setup(self);
        Ok(())
    }

    // -- Entity lifecycle --

    /// Create an entity at `(x, y)` with an optional tag
    pub fn create_entity(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        tag: Option<&str>,
    ) -> Result<EntityId, SceneError> {
        Ok(self.store.create_entity(name, x, y, tag)?)
    }

    /// Attach a component, enforcing the single-camera rule
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), SceneError> {
        if component.kind() == ComponentKind::Camera {
            log::error!("cannot add a second camera (entity {})", self.camera);
            return Err(SceneError::DuplicateCamera);
        }
        Ok(self.store.add_component(id, component)?)
    }

    /// Reparent an entity; the camera can be neither reparented nor used
    /// as a parent
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
        maintain_world_position: bool,
    ) -> Result<(), SceneError> {
        if child == self.camera {
            log::warn!("refusing to reparent the active camera");
            return Err(SceneError::CameraProtected(child));
        }
        if parent == Some(self.camera) {
            log::warn!("refusing to parent entity {child} to the active camera");
            return Err(SceneError::CameraProtected(self.camera));
        }
        Ok(self.store.set_parent(child, parent, maintain_world_position)?)
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Children go before parents; each destroyed entity gets `on_destroy`
    /// on its scripts and all of its coroutines cancelled. Destroying a
    /// missing entity is a logged no-op. The camera (or any ancestor of
    /// it) is protected.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), SceneError> {
        if id == self.camera || self.store.is_ancestor(id, self.camera) {
            log::warn!("refusing to destroy entity {id}: it holds the active camera");
            return Err(SceneError::CameraProtected(id));
        }
        if !self.store.exists(id) {
            log::warn!("attempted to destroy non-existent entity {id}");
            return Ok(());
        }
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: EntityId) {
        for entity in self.store.subtree_post_order(id) {
            for slot in self.store.script_slots_of(entity) {
                let Some((mut script, ready_run)) = self.store.take_script(entity, slot) else {
                    continue;
                };
                if let Err(err) = script.on_destroy(self, entity) {
                    log::error!("on_destroy failed for entity {entity}: {err}");
                }
                self.store.restore_script(entity, slot, script, ready_run);
            }
            self.coroutines.stop_all_for(entity);
            self.store.delete_entity(entity);
        }
    }

    /// Destroy an entity after `seconds` of scaled game time
    ///
    /// The delay runs as a coroutine owned by the doomed entity, so
    /// destroying it earlier by other means also cancels the timer.
    pub fn destroy_entity_delayed(&mut self, id: EntityId, seconds: f32) -> CoroutineId {
        let mut waited = false;
        self.coroutines.start(
            id,
            Box::new(
                move |scene: &mut Scene, entity: EntityId| -> Result<RoutineStep, ScriptError> {
                    if !waited {
                        waited = true;
                        return Ok(RoutineStep::Wait(Suspension::seconds(seconds)));
                    }
                    scene.destroy_entity(entity)?;
                    Ok(RoutineStep::Done)
                },
            ),
        )
    }

    // -- Coroutines --

    /// Schedule a routine on behalf of an entity
    ///
    /// The routine first steps on the next tick's coroutine pass. It is
    /// cancelled automatically when the entity is destroyed.
    pub fn start_coroutine(
        &mut self,
        entity: EntityId,
        routine: impl Routine + 'static,
    ) -> Result<CoroutineId, SceneError> {
        if !self.store.exists(entity) {
            log::error!("cannot start coroutine for non-existent entity {entity}");
            return Err(SceneError::Store(StoreError::EntityNotFound(entity)));
        }
        Ok(self.coroutines.start(entity, Box::new(routine)))
    }

    /// Cancel one coroutine; unknown ids are a no-op
    pub fn stop_coroutine(&mut self, id: CoroutineId) {
        self.coroutines.stop(id);
    }

    /// Cancel every coroutine started for an entity
    pub fn stop_entity_coroutines(&mut self, entity: EntityId) {
        self.coroutines.stop_all_for(entity);
    }

    /// Number of scheduled coroutines
    pub fn coroutine_count(&self) -> usize {
        self.coroutines.len()
    }

    /// Whether a coroutine is still scheduled
    pub fn coroutine_running(&self, id: CoroutineId) -> bool {
        self.coroutines.is_running(id)
    }

    fn run_coroutines(&mut self, dt: f32) {
        // Snapshot at pass start: coroutines spawned mid-pass first step
        // on the next tick
        for id in self.coroutines.keys() {
            let Some((entity, mut co)) = self.coroutines.take(id) else {
                continue;
            };
            match co.advance(self, entity, dt) {
                Ok(true) => self.coroutines.finish(id),
                Ok(false) => self.coroutines.restore(id, co),
                Err(err) => {
                    log::error!("coroutine failed for entity {entity}: {err}");
                    self.coroutines.finish(id);
                }
            }
        }
    }

    // -- Animation --

    /// Start a clip on the entity's animator and apply frame 0 immediately
    pub fn play_animation(&mut self, id: EntityId, clip: crate::animation::Animation) {
        let Some(sprite) = self.store.get_mut::<Animator>(id).map(|a| a.play(clip)) else {
            log::warn!("entity {id} has no animator to play on");
            return;
        };
        self.apply_sprite(id, sprite);
    }

    /// Stop the entity's animator, rewinding to frame 0
    pub fn stop_animation(&mut self, id: EntityId) {
        let Some(sprite) = self.store.get_mut::<Animator>(id).and_then(Animator::stop) else {
            return;
        };
        self.apply_sprite(id, sprite);
    }

    fn apply_sprite(&mut self, id: EntityId, sprite: u8) {
        if let Some(renderer) = self.store.get_mut::<SpriteRenderer>(id) {
            renderer.sprite_index = sprite;
        }
    }

    // -- Physics callbacks --

    /// Deliver `on_collision` to every script on `entity`
    pub(crate) fn dispatch_collision(&mut self, entity: EntityId, other: &CollisionInfo) {
        self.dispatch(entity, |script, scene, entity| {
            script.on_collision(scene, entity, other)
        });
    }

    /// Deliver `on_trigger` to every script on `entity`
    pub(crate) fn dispatch_trigger(&mut self, entity: EntityId, other: &CollisionInfo) {
        self.dispatch(entity, |script, scene, entity| {
            script.on_trigger(scene, entity, other)
        });
    }

    fn dispatch<F>(&mut self, entity: EntityId, mut call: F)
    where
        F: FnMut(&mut dyn Script, &mut Scene, EntityId) -> Result<(), ScriptError>,
    {
        for slot in self.store.script_slots_of(entity) {
            let Some((mut script, ready_run)) = self.store.take_script(entity, slot) else {
                continue;
            };
            if let Err(err) = call(script.as_mut(), self, entity) {
                log::error!("collision callback failed for entity {entity}: {err}");
            }
            self.store.restore_script(entity, slot, script, ready_run);
        }
    }

    // -- Update loop --

    /// Advance the scene by `dt` unscaled seconds
    ///
    /// Pass order is fixed: clock, scripts, physics, coroutines,
    /// animation. All simulation passes consume the scaled delta, so a
    /// time scale of zero freezes everything except the clock itself.
    pub fn update(&mut self, dt: f32) {
        self.clock.update(dt);
        let scaled = self.clock.delta_time();

        script_system::run(self);
        physics_system::run(self, scaled);
        self.run_coroutines(scaled);
        animation_system::run(self, scaled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Collider, EntityTransform, Rigidbody, Script, ScriptError};
    use crate::foundation::math::Rect;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_scene() -> Scene {
        let mut registry = SceneRegistry::new();
        registry.register("empty", |_| {}).unwrap();
        Scene::new("empty", registry).unwrap()
    }

    #[test]
    fn test_new_scene_has_a_camera_at_origin() {
        let scene = empty_scene();
        assert!(scene.store().get::<Camera>(scene.camera()).is_some());
        assert_relative_eq!(scene.camera_position().x, 0.0);
    }

    #[test]
    fn test_second_camera_is_refused() {
        let mut scene = empty_scene();
        let id = scene.create_entity("Pretender", 0.0, 0.0, None).unwrap();

        let result = scene.add_component(id, Component::Camera(Camera));
        assert!(matches!(result, Err(SceneError::DuplicateCamera)));
        assert!(scene.store().get::<Camera>(id).is_none());
    }

    #[test]
    fn test_camera_cannot_be_destroyed_or_reparented() {
        let mut scene = empty_scene();
        let camera = scene.camera();
        let other = scene.create_entity("Other", 0.0, 0.0, None).unwrap();

        assert!(matches!(
            scene.destroy_entity(camera),
            Err(SceneError::CameraProtected(_))
        ));
        assert!(matches!(
            scene.set_parent(camera, Some(other), false),
            Err(SceneError::CameraProtected(_))
        ));
        assert!(scene.store().exists(camera));
    }

    #[test]
    fn test_camera_cannot_be_a_parent() {
        let mut scene = empty_scene();
        let camera = scene.camera();
        let child = scene.create_entity("Child", 0.0, 0.0, None).unwrap();

        assert!(matches!(
            scene.set_parent(child, Some(camera), false),
            Err(SceneError::CameraProtected(_))
        ));
        assert!(scene.store().get::<EntityTransform>(child).unwrap().parent().is_none());
        assert!(scene.store().get::<EntityTransform>(camera).unwrap().children().is_empty());
    }

    #[test]
    fn test_rigidbody_moves_over_one_second() {
        let mut scene = empty_scene();
        let player = scene.create_entity("Player", 10.0, 20.0, None).unwrap();
        scene
            .add_component(player, Component::Rigidbody(Rigidbody::new(5.0, 0.0)))
            .unwrap();

        scene.update(1.0);

        let world = scene.store().world_position(player);
        assert_relative_eq!(world.x, 15.0);
        assert_relative_eq!(world.y, 20.0);
    }

    #[test]
    fn test_time_scale_zero_freezes_simulation() {
        let mut scene = empty_scene();
        let mover = scene.create_entity("Mover", 0.0, 0.0, None).unwrap();
        scene
            .add_component(mover, Component::Rigidbody(Rigidbody::new(5.0, 0.0)))
            .unwrap();
        scene.clock_mut().set_time_scale(0.0);

        scene.update(1.0);

        assert_relative_eq!(scene.store().world_position(mover).x, 0.0);
        assert_relative_eq!(scene.clock().game_time(), 1.0);
    }

    struct KeyPickup {
        opened: Rc<RefCell<Vec<Option<String>>>>,
    }

    impl Script for KeyPickup {
        fn on_trigger(
            &mut self,
            scene: &mut Scene,
            entity: EntityId,
            other: &CollisionInfo,
        ) -> Result<(), ScriptError> {
            self.opened.borrow_mut().push(other.tag.clone());
            scene.destroy_entity(entity)?;
            Ok(())
        }
    }

    #[test]
    fn test_trigger_pickup_destroys_itself() {
        let mut scene = empty_scene();
        let player = scene.create_entity("Player", 0.0, 0.0, Some("player")).unwrap();
        scene
            .add_component(player, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))))
            .unwrap();
        scene
            .add_component(player, Component::Rigidbody(Rigidbody::default()))
            .unwrap();

        let key = scene.create_entity("Key", 4.0, 0.0, Some("key")).unwrap();
        scene
            .add_component(
                key,
                Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0)).as_trigger()),
            )
            .unwrap();
        let opened = Rc::new(RefCell::new(Vec::new()));
        scene
            .add_component(key, Component::script(KeyPickup { opened: Rc::clone(&opened) }))
            .unwrap();

        scene.update(0.016);

        assert_eq!(opened.borrow().as_slice(), &[Some("player".to_string())]);
        assert!(!scene.store().exists(key));
        // The solid side passes through a trigger unpushed
        assert_relative_eq!(scene.store().world_position(player).x, 0.0);
    }

    struct DestroyJournal {
        destroyed: Rc<RefCell<Vec<EntityId>>>,
    }

    impl Script for DestroyJournal {
        fn on_destroy(&mut self, _scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
            self.destroyed.borrow_mut().push(entity);
            Ok(())
        }
    }

    #[test]
    fn test_destroy_walks_children_first_and_cancels_coroutines() {
        let mut scene = empty_scene();
        let destroyed = Rc::new(RefCell::new(Vec::new()));

        let parent = scene.create_entity("Parent", 0.0, 0.0, None).unwrap();
        let child = scene.create_entity("Child", 0.0, 0.0, None).unwrap();
        scene.set_parent(child, Some(parent), false).unwrap();
        for &id in &[parent, child] {
            scene
                .add_component(
                    id,
                    Component::script(DestroyJournal { destroyed: Rc::clone(&destroyed) }),
                )
                .unwrap();
        }
        let ticker = |_: &mut Scene, _: EntityId| -> Result<RoutineStep, ScriptError> {
            Ok(RoutineStep::Next)
        };
        let first = scene.start_coroutine(child, ticker).unwrap();
        let second = scene.start_coroutine(child, ticker).unwrap();

        scene.destroy_entity(parent).unwrap();

        assert_eq!(destroyed.borrow().as_slice(), &[child, parent]);
        assert!(!scene.coroutine_running(first));
        assert!(!scene.coroutine_running(second));
        assert_eq!(scene.coroutine_count(), 0);
        assert!(!scene.store().exists(child));
    }

    #[test]
    fn test_delayed_destroy_waits_out_its_timer() {
        let mut scene = empty_scene();
        let bomb = scene.create_entity("Bomb", 0.0, 0.0, None).unwrap();
        scene.destroy_entity_delayed(bomb, 0.25);

        scene.update(0.1); // arms the wait
        scene.update(0.1);
        assert!(scene.store().exists(bomb));

        scene.update(0.1);
        scene.update(0.1); // wait satisfied, destroy runs
        assert!(!scene.store().exists(bomb));
    }

    #[test]
    fn test_load_scene_clears_entities_but_keeps_camera() {
        let mut registry = SceneRegistry::new();
        registry
            .register("first", |scene| {
                scene.create_entity("FirstThing", 1.0, 1.0, None).unwrap();
            })
            .unwrap();
        registry
            .register("second", |scene| {
                scene.create_entity("SecondThing", 2.0, 2.0, None).unwrap();
            })
            .unwrap();

        let mut scene = Scene::new("first", registry).unwrap();
        let camera = scene.camera();
        scene.store_mut().set_world_position(camera, Vec2::new(9.0, 9.0));

        scene.load_scene("second").unwrap();

        assert_eq!(scene.name(), "second");
        assert!(scene.store().exists(camera));
        assert_relative_eq!(scene.camera_position().x, 0.0);
        let names: Vec<_> = scene
            .store()
            .entity_ids()
            .into_iter()
            .filter_map(|id| scene.store().name(id).map(str::to_string))
            .collect();
        assert!(names.contains(&"SecondThing".to_string()));
        assert!(!names.contains(&"FirstThing".to_string()));
    }

    #[test]
    fn test_unknown_scene_leaves_everything_in_place() {
        let mut scene = empty_scene();
        let survivor = scene.create_entity("Survivor", 0.0, 0.0, None).unwrap();

        assert!(matches!(
            scene.load_scene("nope"),
            Err(SceneError::UnknownScene(_))
        ));
        assert!(scene.store().exists(survivor));
        assert_eq!(scene.name(), "empty");
    }

    #[test]
    fn test_coroutine_waits_span_ticks() {
        let mut scene = empty_scene();
        let runner = scene.create_entity("Runner", 0.0, 0.0, None).unwrap();
        let progress = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&progress);

        let mut phase = 0;
        scene
            .start_coroutine(
                runner,
                move |_: &mut Scene, _: EntityId| -> Result<RoutineStep, ScriptError> {
                    phase += 1;
                    *seen.borrow_mut() = phase;
                    match phase {
                        1 => Ok(RoutineStep::Wait(Suspension::seconds(0.2))),
                        _ => Ok(RoutineStep::Done),
                    }
                },
            )
            .unwrap();

        scene.update(0.1);
        assert_eq!(*progress.borrow(), 1);
        scene.update(0.1);
        assert_eq!(*progress.borrow(), 1); // still waiting
        scene.update(0.1);
        assert_eq!(*progress.borrow(), 2);
        assert_eq!(scene.coroutine_count(), 0);
    }

    #[test]
    fn test_button_state_round_trips() {
        let mut scene = empty_scene();
        scene.set_button(Button::Action1, true);
        assert!(scene.is_button_held(Button::Action1));
        assert!(!scene.is_button_held(Button::Left));
    }
}
