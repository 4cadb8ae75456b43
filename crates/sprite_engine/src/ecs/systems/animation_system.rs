//! Animation pass
//!
//! Ticks every animator and writes the resulting sprite index into the
//! entity's sprite renderer. An animator that already holds a clip the
//! first time the pass sees it gets its current frame applied even when
//! paused, so a freshly spawned entity never renders a stale sprite.

use crate::ecs::components::{Animator, SpriteRenderer};
use crate::scene::Scene;

/// Advance every animator by `dt` seconds of scaled game time
pub(crate) fn run(scene: &mut Scene, dt: f32) {
    for id in scene.store().entities_with::<Animator>() {
        let mut apply = None;
        if let Some(animator) = scene.store_mut().get_mut::<Animator>(id) {
            if !animator.ready_run {
                animator.ready_run = true;
                apply = animator
                    .animation()
                    .map(|clip| clip.frames()[animator.current_frame()]);
            }
            if let Some(sprite) = animator.tick(dt) {
                apply = Some(sprite);
            }
        }
        if let Some(sprite) = apply {
            if let Some(renderer) = scene.store_mut().get_mut::<SpriteRenderer>(id) {
                renderer.sprite_index = sprite;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, AnimationEnd};
    use crate::ecs::Component;
    use crate::scene::SceneRegistry;

    fn scene() -> Scene {
        let mut registry = SceneRegistry::new();
        registry.register("test", |_| {}).unwrap();
        Scene::new("test", registry).unwrap()
    }

    fn clip() -> Animation {
        Animation::new("walk", vec![3, 4, 5], 10.0, AnimationEnd::Loop).unwrap()
    }

    #[test]
    fn test_tick_writes_frame_to_sprite_renderer() {
        let mut scene = scene();
        let id = scene.create_entity("E", 0.0, 0.0, None).unwrap();
        scene
            .add_component(id, Component::Sprite(SpriteRenderer::new(0)))
            .unwrap();
        scene.add_component(id, Component::Animator(Animator::new())).unwrap();
        scene.play_animation(id, clip());

        // 10 fps: 0.15s into the clip lands on frame 1
        run(&mut scene, 0.15);

        assert_eq!(scene.store().get::<SpriteRenderer>(id).unwrap().sprite_index, 4);
    }

    #[test]
    fn test_paused_animator_holds_its_sprite() {
        let mut scene = scene();
        let id = scene.create_entity("E", 0.0, 0.0, None).unwrap();
        scene
            .add_component(id, Component::Sprite(SpriteRenderer::new(0)))
            .unwrap();
        scene.add_component(id, Component::Animator(Animator::new())).unwrap();
        scene.play_animation(id, clip());
        run(&mut scene, 0.15);

        if let Some(animator) = scene.store_mut().get_mut::<Animator>(id) {
            animator.pause();
        }
        run(&mut scene, 0.5);

        assert_eq!(scene.store().get::<SpriteRenderer>(id).unwrap().sprite_index, 4);
    }

    #[test]
    fn test_animator_without_renderer_is_tolerated() {
        let mut scene = scene();
        let id = scene.create_entity("E", 0.0, 0.0, None).unwrap();
        scene.add_component(id, Component::Animator(Animator::new())).unwrap();
        scene.play_animation(id, clip());

        run(&mut scene, 0.15);

        assert_eq!(scene.store().get::<Animator>(id).unwrap().current_frame(), 1);
    }
}
