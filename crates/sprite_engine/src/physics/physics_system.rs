//! Per-tick physics pass
//!
//! Pair resolution is sequential: every pair re-reads positions from the
//! store, so a push applied while resolving one pair is visible to the
//! next. Collision and trigger callbacks also run mid-pass, which means an
//! entity can vanish between pairs; every pair lookup tolerates that.

use crate::ecs::components::{Collider, CollisionInfo, EntityTransform, Rigidbody};
use crate::ecs::EntityId;
use crate::physics::CollisionLayers;
use crate::scene::Scene;

/// One collider in the pass: owning entity plus the collider's ordinal
/// among that entity's colliders
type Body = (EntityId, usize);

/// Advance physics by `dt` seconds of scaled game time
pub(crate) fn run(scene: &mut Scene, dt: f32) {
    integrate(scene, dt);

    let bodies = collect_bodies(scene);
    resolve_solids(scene, &bodies);
    report_triggers(scene, &bodies);
}

/// Every collider component, not just each entity's first
fn collect_bodies(scene: &Scene) -> Vec<Body> {
    let mut bodies = Vec::new();
    for id in scene.store().entities_with::<Collider>() {
        for ordinal in 0..scene.store().count::<Collider>(id) {
            bodies.push((id, ordinal));
        }
    }
    bodies
}

fn integrate(scene: &mut Scene, dt: f32) {
    for id in scene.store().entities_with::<Rigidbody>() {
        let Some(velocity) = scene.store().get::<Rigidbody>(id).map(|rb| rb.velocity) else {
            continue;
        };
        // Translating the local offset translates the world position by the
        // same amount, the hierarchy is translation-only
        if let Some(transform) = scene.store_mut().get_mut::<EntityTransform>(id) {
            transform.local += velocity * dt;
        }
    }
}

struct PairSnapshot {
    overlap_x: f32,
    overlap_y: f32,
    min_delta_x: f32,
    min_delta_y: f32,
}

/// Current world-space rect of one collider component
fn world_collider(scene: &Scene, body: Body) -> Option<(Collider, crate::foundation::math::Rect)> {
    let (id, ordinal) = body;
    let collider = scene.store().nth::<Collider>(id, ordinal)?.clone();
    let rect = collider.rect.translated(scene.store().world_position(id));
    Some((collider, rect))
}

fn snapshot_pair(scene: &Scene, a: Body, b: Body, triggers: bool) -> Option<PairSnapshot> {
    let (col_a, rect_a) = world_collider(scene, a)?;
    let (col_b, rect_b) = world_collider(scene, b)?;
    if triggers {
        if !col_a.is_trigger {
            return None;
        }
    } else if col_a.is_trigger || col_b.is_trigger {
        return None;
    }
    if !CollisionLayers::should_collide(col_a.layer, col_a.mask, col_b.layer, col_b.mask) {
        return None;
    }
    let (overlap_x, overlap_y) = rect_a.overlap(&rect_b)?;
    Some(PairSnapshot {
        overlap_x,
        overlap_y,
        min_delta_x: rect_a.min_x() - rect_b.min_x(),
        min_delta_y: rect_a.min_y() - rect_b.min_y(),
    })
}

fn contact_info(scene: &Scene, other: EntityId, is_trigger: bool) -> CollisionInfo {
    CollisionInfo {
        entity: other,
        tag: scene.store().tag(other).map(str::to_string),
        is_trigger,
    }
}

/// Push overlapping solid pairs apart and fire collision callbacks
///
/// The shallower penetration axis is resolved; on a tie Y wins. A pair
/// with one rigidbody moves that body the full overlap, with two each
/// moves half, with none nothing moves but callbacks still fire.
fn resolve_solids(scene: &mut Scene, bodies: &[Body]) {
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let ((a, a_ord), (b, b_ord)) = (bodies[i], bodies[j]);
            if a == b {
                continue;
            }
            let Some(pair) = snapshot_pair(scene, (a, a_ord), (b, b_ord), false) else {
                continue;
            };

            let push_y = pair.overlap_y <= pair.overlap_x;
            let (overlap, min_delta) = if push_y {
                (pair.overlap_y, pair.min_delta_y)
            } else {
                (pair.overlap_x, pair.min_delta_x)
            };
            // The lower rect minimum is pushed negative; coincident minima
            // fall back to undoing a's relative motion
            let direction = if min_delta != 0.0 {
                min_delta.signum()
            } else {
                -relative_velocity(scene, a, b, push_y).signum_or(1.0)
            };

            let a_dynamic = scene.store().get::<Rigidbody>(a).is_some();
            let b_dynamic = scene.store().get::<Rigidbody>(b).is_some();
            let (push_a, push_b) = match (a_dynamic, b_dynamic) {
                (true, true) => (0.5 * overlap, 0.5 * overlap),
                (true, false) => (overlap, 0.0),
                (false, true) => (0.0, overlap),
                (false, false) => (0.0, 0.0),
            };

            apply_push(scene, a, push_y, direction * push_a);
            apply_push(scene, b, push_y, -direction * push_b);

            log::debug!(
                "resolved collision between {a} and {b} ({} axis, overlap {overlap})",
                if push_y { "Y" } else { "X" }
            );

            let info_b = contact_info(scene, b, false);
            scene.dispatch_collision(a, &info_b);
            let info_a = contact_info(scene, a, false);
            scene.dispatch_collision(b, &info_a);
        }
    }
}

/// Report overlaps where the first collider is a trigger volume
///
/// Pairs are ordered: only the trigger's own scripts are notified. Two
/// overlapping triggers therefore each hear about the other.
fn report_triggers(scene: &mut Scene, bodies: &[Body]) {
    for &(a, a_ord) in bodies {
        for &(b, b_ord) in bodies {
            if a == b {
                continue;
            }
            if snapshot_pair(scene, (a, a_ord), (b, b_ord), true).is_none() {
                continue;
            }
            let other_is_trigger = scene
                .store()
                .nth::<Collider>(b, b_ord)
                .is_some_and(|c| c.is_trigger);
            let info = contact_info(scene, b, other_is_trigger);
            log::debug!("trigger {a} overlaps {b}");
            scene.dispatch_trigger(a, &info);
        }
    }
}

fn apply_push(scene: &mut Scene, id: EntityId, push_y: bool, amount: f32) {
    if amount == 0.0 {
        return;
    }
    if let Some(transform) = scene.store_mut().get_mut::<EntityTransform>(id) {
        if push_y {
            transform.local.y += amount;
        } else {
            transform.local.x += amount;
        }
    }
}

fn relative_velocity(scene: &Scene, a: EntityId, b: EntityId, axis_y: bool) -> f32 {
    let component = |id| {
        scene
            .store()
            .get::<Rigidbody>(id)
            .map_or(0.0, |rb| if axis_y { rb.velocity.y } else { rb.velocity.x })
    };
    component(a) - component(b)
}

trait SignumOr {
    fn signum_or(self, fallback: f32) -> f32;
}

impl SignumOr for f32 {
    fn signum_or(self, fallback: f32) -> f32 {
        if self == 0.0 {
            fallback
        } else {
            self.signum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Script, ScriptError};
    use crate::ecs::Component;
    use crate::foundation::math::Rect;
    use crate::scene::SceneRegistry;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene() -> Scene {
        let mut registry = SceneRegistry::new();
        registry.register("test", |_| {}).unwrap();
        Scene::new("test", registry).unwrap()
    }

    fn solid(scene: &mut Scene, name: &str, x: f32, y: f32) -> EntityId {
        let id = scene.create_entity(name, x, y, None).unwrap();
        scene
            .add_component(id, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))))
            .unwrap();
        id
    }

    fn dynamic(scene: &mut Scene, name: &str, x: f32, y: f32) -> EntityId {
        let id = solid(scene, name, x, y);
        scene
            .add_component(id, Component::Rigidbody(Rigidbody::default()))
            .unwrap();
        id
    }

    #[test]
    fn test_integration_moves_by_velocity_times_dt() {
        let mut scene = scene();
        let id = scene.create_entity("Mover", 10.0, 20.0, None).unwrap();
        scene
            .add_component(id, Component::Rigidbody(Rigidbody::new(5.0, -2.0)))
            .unwrap();

        run(&mut scene, 1.0);

        let world = scene.store().world_position(id);
        assert_relative_eq!(world.x, 15.0);
        assert_relative_eq!(world.y, 18.0);
    }

    #[test]
    fn test_dynamic_pushed_fully_out_of_static() {
        let mut scene = scene();
        // Wall at x 10..18, mover overlapping from the left by 2 on X,
        // deeply on Y, so X is the shallower axis
        let _wall = solid(&mut scene, "Wall", 10.0, 0.0);
        let mover = dynamic(&mut scene, "Mover", 4.0, 1.0);

        run(&mut scene, 0.0);

        assert_relative_eq!(scene.store().world_position(mover).x, 2.0);
        assert_relative_eq!(scene.store().world_position(mover).y, 1.0);
    }

    #[test]
    fn test_two_dynamics_split_the_push() {
        let mut scene = scene();
        let left = dynamic(&mut scene, "Left", 0.0, 0.0);
        let right = dynamic(&mut scene, "Right", 6.0, 0.5);

        run(&mut scene, 0.0);

        // 2 units of X overlap, one unit each way
        assert_relative_eq!(scene.store().world_position(left).x, -1.0);
        assert_relative_eq!(scene.store().world_position(right).x, 7.0);
    }

    #[test]
    fn test_equal_overlap_resolves_on_y() {
        let mut scene = scene();
        let _anchor = solid(&mut scene, "Anchor", 0.0, 0.0);
        let mover = dynamic(&mut scene, "Mover", 6.0, 6.0);

        run(&mut scene, 0.0);

        assert_relative_eq!(scene.store().world_position(mover).x, 6.0);
        assert_relative_eq!(scene.store().world_position(mover).y, 8.0);
    }

    #[test]
    fn test_layer_mask_filters_pairs() {
        let mut scene = scene();
        let a = scene.create_entity("A", 0.0, 0.0, None).unwrap();
        scene
            .add_component(
                a,
                Component::Collider(
                    Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))
                        .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY),
                ),
            )
            .unwrap();
        scene
            .add_component(a, Component::Rigidbody(Rigidbody::default()))
            .unwrap();
        let hits = Rc::new(RefCell::new(Vec::new()));
        scene
            .add_component(a, Component::script(Recorder { hits: Rc::clone(&hits) }))
            .unwrap();
        let b = scene.create_entity("B", 4.0, 0.0, None).unwrap();
        scene
            .add_component(
                b,
                Component::Collider(
                    Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))
                        .with_layers(CollisionLayers::PICKUP, CollisionLayers::ENEMY),
                ),
            )
            .unwrap();

        run(&mut scene, 0.0);

        // A filtered pair produces no push and no callback either
        assert_relative_eq!(scene.store().world_position(a).x, 0.0);
        assert!(hits.borrow().is_empty());
    }

    #[test]
    fn test_every_collider_on_an_entity_participates() {
        let mut scene = scene();
        let _wall = solid(&mut scene, "Wall", 10.0, 0.0);
        let mover = scene.create_entity("Mover", 4.0, 1.0, None).unwrap();
        // First collider is far off to the side; only the second one
        // actually touches the wall
        scene
            .add_component(
                mover,
                Component::Collider(Collider::new(Rect::new(100.0, 0.0, 8.0, 8.0))),
            )
            .unwrap();
        scene
            .add_component(mover, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))))
            .unwrap();
        scene
            .add_component(mover, Component::Rigidbody(Rigidbody::default()))
            .unwrap();

        run(&mut scene, 0.0);

        assert_relative_eq!(scene.store().world_position(mover).x, 2.0);
    }

    #[test]
    fn test_push_direction_follows_rect_minima() {
        let mut scene = scene();
        // Wide static floor fully containing the crate on X; the crate's
        // minimum is above the floor's, so the crate is pushed positive
        // even though its center sits left of the floor's center
        let floor = scene.create_entity("Floor", 0.0, 0.0, None).unwrap();
        scene
            .add_component(floor, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 20.0, 8.0))))
            .unwrap();
        let crate_box = scene.create_entity("Crate", 2.0, 0.0, None).unwrap();
        scene
            .add_component(crate_box, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 4.0, 8.0))))
            .unwrap();
        scene
            .add_component(crate_box, Component::Rigidbody(Rigidbody::default()))
            .unwrap();

        run(&mut scene, 0.0);

        assert_relative_eq!(scene.store().world_position(crate_box).x, 6.0);
    }

    struct Recorder {
        hits: Rc<RefCell<Vec<(EntityId, bool)>>>,
    }

    impl Script for Recorder {
        fn on_collision(
            &mut self,
            _scene: &mut Scene,
            _entity: EntityId,
            other: &CollisionInfo,
        ) -> Result<(), ScriptError> {
            self.hits.borrow_mut().push((other.entity, false));
            Ok(())
        }

        fn on_trigger(
            &mut self,
            _scene: &mut Scene,
            _entity: EntityId,
            other: &CollisionInfo,
        ) -> Result<(), ScriptError> {
            self.hits.borrow_mut().push((other.entity, true));
            Ok(())
        }
    }

    #[test]
    fn test_static_pair_still_fires_collision_callbacks() {
        let mut scene = scene();
        let a = solid(&mut scene, "A", 0.0, 0.0);
        let b = solid(&mut scene, "B", 4.0, 0.0);
        let hits = Rc::new(RefCell::new(Vec::new()));
        scene
            .add_component(a, Component::script(Recorder { hits: Rc::clone(&hits) }))
            .unwrap();

        run(&mut scene, 0.0);

        // No push, but the contact is reported
        assert_relative_eq!(scene.store().world_position(a).x, 0.0);
        assert_eq!(hits.borrow().as_slice(), &[(b, false)]);
    }

    #[test]
    fn test_trigger_notifies_only_its_own_scripts() {
        let mut scene = scene();
        let walker = dynamic(&mut scene, "Walker", 0.0, 0.0);
        let zone = scene.create_entity("Zone", 4.0, 0.0, None).unwrap();
        scene
            .add_component(
                zone,
                Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0)).as_trigger()),
            )
            .unwrap();

        let zone_hits = Rc::new(RefCell::new(Vec::new()));
        let walker_hits = Rc::new(RefCell::new(Vec::new()));
        scene
            .add_component(zone, Component::script(Recorder { hits: Rc::clone(&zone_hits) }))
            .unwrap();
        scene
            .add_component(walker, Component::script(Recorder { hits: Rc::clone(&walker_hits) }))
            .unwrap();

        run(&mut scene, 0.0);

        // The walker passes through unpushed and hears nothing
        assert_relative_eq!(scene.store().world_position(walker).x, 0.0);
        assert!(walker_hits.borrow().is_empty());
        assert_eq!(zone_hits.borrow().as_slice(), &[(walker, true)]);
    }
}
