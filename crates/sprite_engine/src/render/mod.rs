//! Rendering seam
//!
//! The engine computes what to draw and in what order; actually putting
//! pixels somewhere is the embedder's job behind [`RenderSurface`]. Draws
//! are emitted camera-relative, sorted by `(layer, sort_order)` with
//! creation order breaking the remaining ties.

use crate::ecs::components::SpriteRenderer;
use crate::foundation::math::Vec2;
use crate::scene::Scene;

/// One sprite draw request
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    /// Index into the sprite table
    pub sprite_index: u8,
    /// Position relative to the active camera
    pub position: Vec2,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
}

/// Target the engine emits draw requests into
pub trait RenderSurface {
    /// Draw one sprite; called in back-to-front order
    fn draw_sprite(&mut self, draw: &SpriteDraw);
}

/// Emit every visible sprite into `surface`, back to front
pub fn render_scene(scene: &Scene, surface: &mut dyn RenderSurface) {
    let camera = scene.camera_position();
    let mut draws: Vec<(i32, i32, SpriteDraw)> = scene
        .store()
        .all::<SpriteRenderer>()
        .into_iter()
        .map(|(id, sprite)| {
            (
                sprite.layer,
                sprite.sort_order,
                SpriteDraw {
                    sprite_index: sprite.sprite_index,
                    position: scene.store().world_position(id) - camera,
                    flip_x: sprite.flip_x,
                    flip_y: sprite.flip_y,
                },
            )
        })
        .collect();
    // Stable sort keeps creation order within equal draw keys
    draws.sort_by_key(|&(layer, sort_order, _)| (layer, sort_order));

    for (_, _, draw) in &draws {
        surface.draw_sprite(draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;
    use crate::scene::SceneRegistry;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recording {
        draws: Vec<SpriteDraw>,
    }

    impl RenderSurface for Recording {
        fn draw_sprite(&mut self, draw: &SpriteDraw) {
            self.draws.push(draw.clone());
        }
    }

    fn empty_scene() -> Scene {
        let mut registry = SceneRegistry::new();
        registry.register("empty", |_| {}).unwrap();
        Scene::new("empty", registry).unwrap()
    }

    #[test]
    fn test_draws_are_sorted_by_layer_then_order() {
        let mut scene = empty_scene();
        let spawn = |scene: &mut Scene, index: u8, layer: i32, order: i32| {
            let id = scene.create_entity("Sprite", 0.0, 0.0, None).unwrap();
            scene
                .add_component(
                    id,
                    Component::Sprite(
                        SpriteRenderer::new(index).with_layer(layer).with_sort_order(order),
                    ),
                )
                .unwrap();
        };
        spawn(&mut scene, 2, 1, 0);
        spawn(&mut scene, 0, 0, 5);
        spawn(&mut scene, 1, 0, 9);

        let mut surface = Recording::default();
        render_scene(&scene, &mut surface);

        let order: Vec<u8> = surface.draws.iter().map(|d| d.sprite_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_positions_are_camera_relative() {
        let mut scene = empty_scene();
        let id = scene.create_entity("Sprite", 30.0, 40.0, None).unwrap();
        scene
            .add_component(id, Component::Sprite(SpriteRenderer::new(7)))
            .unwrap();
        let camera = scene.camera();
        scene.store_mut().set_world_position(camera, Vec2::new(10.0, 15.0));

        let mut surface = Recording::default();
        render_scene(&scene, &mut surface);

        assert_relative_eq!(surface.draws[0].position.x, 20.0);
        assert_relative_eq!(surface.draws[0].position.y, 25.0);
    }
}
