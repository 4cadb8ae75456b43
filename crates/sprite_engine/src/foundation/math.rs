//! Math primitives for 2D simulation

/// 2D vector used for positions, offsets, and velocities
pub type Vec2 = nalgebra::Vector2<f32>;

/// Axis-aligned rectangle in local or world space
///
/// `x`/`y` is the minimum corner; `width`/`height` are non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum X coordinate
    pub x: f32,
    /// Minimum Y coordinate
    pub y: f32,
    /// Extent along X (non-negative)
    pub width: f32,
    /// Extent along Y (non-negative)
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its minimum corner and extents
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Minimum X coordinate
    pub fn min_x(&self) -> f32 {
        self.x
    }

    /// Maximum X coordinate
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Minimum Y coordinate
    pub fn min_y(&self) -> f32 {
        self.y
    }

    /// Maximum Y coordinate
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Translate this rectangle by an offset, producing a world-space rect
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Compute the strict overlap with another rectangle
    ///
    /// Returns `(overlap_x, overlap_y)` when the interiors intersect.
    /// Touching edges do not count as an overlap.
    pub fn overlap(&self, other: &Self) -> Option<(f32, f32)> {
        if self.max_x() <= other.min_x()
            || other.max_x() <= self.min_x()
            || self.max_y() <= other.min_y()
            || other.max_y() <= self.min_y()
        {
            return None;
        }
        let overlap_x = self.max_x().min(other.max_x()) - self.min_x().max(other.min_x());
        let overlap_y = self.max_y().min(other.max_y()) - self.min_y().max(other.min_y());
        Some((overlap_x, overlap_y))
    }
}
