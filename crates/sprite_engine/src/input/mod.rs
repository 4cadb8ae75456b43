//! Input state for a small fixed set of logical buttons
//!
//! The engine never touches input devices. The embedder polls its windowing
//! layer and pushes per-tick "held" booleans into the scene; scripts read
//! them during their update callbacks.

/// Logical button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Directional up
    Up,
    /// Directional down
    Down,
    /// Directional left
    Left,
    /// Directional right
    Right,
    /// Primary action
    Action1,
    /// Secondary action
    Action2,
}

impl Button {
    /// Number of logical buttons
    pub const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Action1 => 4,
            Self::Action2 => 5,
        }
    }
}

/// Per-tick held state for every logical button
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; Button::COUNT],
}

impl InputState {
    /// Create a state with no buttons held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether a button is held this tick
    pub fn set_held(&mut self, button: Button, held: bool) {
        self.held[button.index()] = held;
    }

    /// Whether a button is held this tick
    pub fn is_held(&self, button: Button) -> bool {
        self.held[button.index()]
    }
}
