//! Dungeon demo application
//!
//! A headless walkthrough of the engine: a player entity walks right under
//! script control, bumps into a wall, picks up a key through a trigger
//! volume, and plays a walk animation. Each tick's draw list is logged
//! through a console render surface.

use sprite_engine::prelude::*;

const WALK_SPEED: f32 = 24.0;

/// Sprite table indices used by the demo
mod sprites {
    pub const PLAYER_WALK: [u8; 4] = [1, 2, 3, 4];
    pub const WALL: u8 = 8;
    pub const KEY: u8 = 9;
}

/// Player behavior: walk right while the button is held, report wall bumps
struct PlayerController;

impl Script for PlayerController {
    fn ready(&mut self, scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
        log::info!("player ready at {}", scene.store().world_position(entity));
        let clip = Animation::new(
            "walk",
            sprites::PLAYER_WALK.to_vec(),
            8.0,
            AnimationEnd::Loop,
        )
        .map_err(|e| ScriptError::msg(e.to_string()))?;
        scene.play_animation(entity, clip);
        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, entity: EntityId) -> Result<(), ScriptError> {
        let walking = scene.is_button_held(Button::Right);
        if let Some(body) = scene.store_mut().get_mut::<Rigidbody>(entity) {
            body.velocity.x = if walking { WALK_SPEED } else { 0.0 };
        }
        Ok(())
    }

    fn on_collision(
        &mut self,
        _scene: &mut Scene,
        entity: EntityId,
        other: &CollisionInfo,
    ) -> Result<(), ScriptError> {
        if other.tag.as_deref() == Some("wall") {
            log::info!("player {entity} bumped into wall {}", other.entity);
        }
        Ok(())
    }
}

/// Key pickup: destroy self when the player walks through, after a brief
/// sparkle delay
struct KeyPickup;

impl Script for KeyPickup {
    fn on_trigger(
        &mut self,
        scene: &mut Scene,
        entity: EntityId,
        other: &CollisionInfo,
    ) -> Result<(), ScriptError> {
        if other.tag.as_deref() != Some("player") {
            return Ok(());
        }
        log::info!("key {entity} collected by {}", other.entity);
        scene.destroy_entity_delayed(entity, 0.1);
        Ok(())
    }
}

fn spawn_wall(scene: &mut Scene, x: f32, y: f32) {
    let wall = scene.create_entity("Wall", x, y, Some("wall")).unwrap();
    scene
        .add_component(wall, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))))
        .unwrap();
    scene
        .add_component(wall, Component::Sprite(SpriteRenderer::new(sprites::WALL)))
        .unwrap();
}

fn dungeon(scene: &mut Scene) {
    let player = scene.create_entity("Player", 0.0, 0.0, Some("player")).unwrap();
    scene
        .add_component(player, Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0))))
        .unwrap();
    scene
        .add_component(player, Component::Rigidbody(Rigidbody::default()))
        .unwrap();
    scene
        .add_component(player, Component::Sprite(SpriteRenderer::new(sprites::PLAYER_WALK[0]).with_layer(1)))
        .unwrap();
    scene
        .add_component(player, Component::Animator(Animator::new()))
        .unwrap();
    scene
        .add_component(player, Component::script(PlayerController))
        .unwrap();

    let key = scene.create_entity("Key", 24.0, 0.0, Some("key")).unwrap();
    scene
        .add_component(
            key,
            Component::Collider(Collider::new(Rect::new(0.0, 0.0, 8.0, 8.0)).as_trigger()),
        )
        .unwrap();
    scene
        .add_component(key, Component::Sprite(SpriteRenderer::new(sprites::KEY)))
        .unwrap();
    scene.add_component(key, Component::script(KeyPickup)).unwrap();

    spawn_wall(scene, 64.0, 0.0);
}

/// Render surface that logs each tick's draw list
#[derive(Default)]
struct ConsoleSurface {
    draws: Vec<SpriteDraw>,
}

impl RenderSurface for ConsoleSurface {
    fn draw_sprite(&mut self, draw: &SpriteDraw) {
        self.draws.push(draw.clone());
    }
}

impl ConsoleSurface {
    fn flush(&mut self, tick: u32) {
        let line: Vec<String> = self
            .draws
            .drain(..)
            .map(|d| format!("#{}@({:.1},{:.1})", d.sprite_index, d.position.x, d.position.y))
            .collect();
        log::info!("tick {tick:3}: {}", line.join(" "));
    }
}

/// Engine settings from the file named on the command line, or defaults
fn load_config() -> EngineConfig {
    let Some(path) = std::env::args().nth(1) else {
        return EngineConfig::default();
    };
    match EngineConfig::load_from_file(&path) {
        Ok(config) => {
            log::info!("loaded engine config from {path}");
            config
        }
        Err(err) => {
            log::warn!("falling back to default config, {path} failed to load: {err}");
            EngineConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("starting dungeon demo");

    let config = load_config();
    let mut registry = SceneRegistry::new();
    registry.register("dungeon", dungeon).expect("fresh registry");
    let mut scene = Scene::new("dungeon", registry).expect("dungeon scene loads");
    scene.clock_mut().set_time_scale(config.time_scale);
    let camera = scene.camera();
    scene.store_mut().set_world_position(camera, config.camera_position());

    let mut surface = ConsoleSurface::default();
    scene.set_button(Button::Right, true);

    // Three simulated seconds: enough to collect the key and hit the wall
    let tick_seconds = 1.0 / config.target_fps as f32;
    for tick in 0..180 {
        scene.update(tick_seconds);
        render_scene(&scene, &mut surface);
        if tick % 30 == 0 {
            surface.flush(tick);
        } else {
            surface.draws.clear();
        }
    }

    log::info!("demo finished after 180 ticks");
}
