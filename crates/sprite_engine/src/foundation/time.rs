//! Time management utilities
//!
//! The engine never polls a wall clock; the embedder supplies the elapsed
//! seconds for each tick and the clock derives the scaled delta from it.

/// Per-tick simulation clock
///
/// Tracks the externally supplied frame delta, a global time scale, and the
/// accumulated game time. The scaled delta drives physics integration,
/// coroutine waits, and animation playback.
#[derive(Debug, Clone)]
pub struct Clock {
    time_scale: f32,
    unscaled_delta: f32,
    game_time: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new clock with a time scale of 1.0
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            unscaled_delta: 0.0,
            game_time: 0.0,
        }
    }

    /// Record the elapsed seconds for the current tick
    pub fn update(&mut self, dt: f32) {
        self.unscaled_delta = dt;
        self.game_time += dt;
    }

    /// Time since the last tick, scaled by the global time scale
    pub fn delta_time(&self) -> f32 {
        self.unscaled_delta * self.time_scale
    }

    /// Time since the last tick, ignoring the time scale
    pub fn unscaled_delta_time(&self) -> f32 {
        self.unscaled_delta
    }

    /// Total unscaled time accumulated across all ticks
    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    /// The global time scale factor
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the global time scale, clamped to be non-negative
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}
