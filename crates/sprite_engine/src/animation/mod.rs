//! Animation clip resources
//!
//! A clip is a name, an ordered list of sprite-table indices, a playback
//! rate, and an end behavior. Clips are validated on construction and
//! cheap to clone into animators.

use thiserror::Error;

/// Number of entries in the fixed sprite table
pub const SPRITE_COUNT: usize = 256;

/// Highest accepted playback rate in frames per second
pub const MAX_FRAME_RATE: f32 = 60.0;

/// Clip construction failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    /// The clip name is empty or whitespace
    #[error("animation name cannot be empty")]
    EmptyName,
    /// The frame list is empty
    #[error("animation '{0}' has no frames")]
    NoFrames(String),
    /// Playback rate outside `0..=60` fps
    #[error("animation '{0}' frame rate must be between 0 and 60")]
    InvalidFrameRate(String),
    /// Keyframe list failed validation
    #[error("invalid keyframes: {0}")]
    InvalidKeyframes(String),
}

/// What playback does when the last frame is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// Wrap to frame 0 and keep playing forever
    Loop,
    /// Freeze on the last frame
    Hold,
    /// Rewind to frame 0 and stop
    Reset,
}

/// An immutable, validated animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    name: String,
    frames: Vec<u8>,
    frame_rate: f32,
    end_behavior: AnimationEnd,
}

impl Animation {
    /// Create a clip, validating its name, frames, and playback rate
    pub fn new(
        name: impl Into<String>,
        frames: Vec<u8>,
        frame_rate: f32,
        end_behavior: AnimationEnd,
    ) -> Result<Self, AnimationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnimationError::EmptyName);
        }
        if frames.is_empty() {
            return Err(AnimationError::NoFrames(name));
        }
        if !(0.0..=MAX_FRAME_RATE).contains(&frame_rate) {
            return Err(AnimationError::InvalidFrameRate(name));
        }
        Ok(Self {
            name,
            frames,
            frame_rate,
            end_behavior,
        })
    }

    /// Expand sparse `(frame_position, sprite_index)` keyframes into a
    /// dense frame list of `total_frames` entries
    ///
    /// Each frame takes the sprite of the most recent keyframe at or before
    /// it. Positions must be unique, in bounds, and include position 0.
    pub fn from_keyframes(
        keyframes: &[(usize, u8)],
        total_frames: usize,
    ) -> Result<Vec<u8>, AnimationError> {
        let invalid = |msg: &str| AnimationError::InvalidKeyframes(msg.to_string());
        if keyframes.is_empty() {
            return Err(invalid("keyframe list is empty"));
        }
        if total_frames == 0 {
            return Err(invalid("total frame count must be positive"));
        }
        if keyframes.iter().any(|&(pos, _)| pos >= total_frames) {
            return Err(invalid("keyframe position out of range"));
        }

        let mut sorted: Vec<(usize, u8)> = keyframes.to_vec();
        sorted.sort_by_key(|&(pos, _)| pos);
        if sorted.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(invalid("keyframe positions must be unique"));
        }
        if sorted[0].0 != 0 {
            return Err(invalid("first keyframe must be at position 0"));
        }

        let mut frames = Vec::with_capacity(total_frames);
        let mut current = 0;
        for i in 0..total_frames {
            if current + 1 < sorted.len() && i >= sorted[current + 1].0 {
                current += 1;
            }
            frames.push(sorted[current].1);
        }
        Ok(frames)
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sprite-table indices in playback order
    pub fn frames(&self) -> &[u8] {
        &self.frames
    }

    /// Number of frames in the clip
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Playback rate in frames per second
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// End-of-clip behavior
    pub fn end_behavior(&self) -> AnimationEnd {
        self.end_behavior
    }
}
