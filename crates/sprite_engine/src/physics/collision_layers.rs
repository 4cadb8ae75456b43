//! Collision layer filtering
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8: most
//! games filter collision candidates through layers or groups before any
//! geometry test runs.

/// Collision layer bit definitions and mask helpers
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer; never collides
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Default layer for colliders that don't pick one
    pub const DEFAULT: u32 = 1 << 0;

    /// Player characters
    pub const PLAYER: u32 = 1 << 1;

    /// Enemy characters
    pub const ENEMY: u32 = 1 << 2;

    /// Projectiles
    pub const PROJECTILE: u32 = 1 << 3;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 4;

    /// Pickups and collectibles
    pub const PICKUP: u32 = 1 << 5;

    /// First bit free for game-defined layers (bits 8-31)
    pub const CUSTOM_BASE: u32 = 1 << 8;

    /// Whether two colliders pass each other's layer filters
    ///
    /// Filtering is mutual: A's layer must be in B's mask and B's layer in
    /// A's mask. Callers still run the geometry test afterwards.
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Combine layers into a mask
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_one_way_interest_does_not_collide() {
        // Player watches for enemies, but the enemy only masks projectiles
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PROJECTILE,
        ));
    }

    #[test]
    fn test_mask_combines_layers() {
        let mask = CollisionLayers::mask(&[CollisionLayers::PLAYER, CollisionLayers::ENVIRONMENT]);
        assert_eq!(mask, CollisionLayers::PLAYER | CollisionLayers::ENVIRONMENT);
    }
}
