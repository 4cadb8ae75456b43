//! Sprite renderer component

/// Draw state for one sprite from the fixed sprite table
///
/// Rendering itself is external; this component only carries the sprite
/// index, flip flags, and the `(layer, sort_order)` draw key consumed by
/// [`render_scene`](crate::render::render_scene).
#[derive(Debug, Clone, Default)]
pub struct SpriteRenderer {
    /// Index into the sprite table
    pub sprite_index: u8,
    /// Mirror horizontally when drawing
    pub flip_x: bool,
    /// Mirror vertically when drawing
    pub flip_y: bool,
    /// Primary draw-order key; higher layers draw later
    pub layer: i32,
    /// Secondary draw-order key within a layer
    pub sort_order: i32,
}

impl SpriteRenderer {
    /// Create a renderer showing the given sprite index
    pub fn new(sprite_index: u8) -> Self {
        Self {
            sprite_index,
            ..Default::default()
        }
    }

    /// Builder: set the draw layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Builder: set the sort order within the layer
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Builder: set the flip flags
    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }
}
