//! Animator component: frame-index playback state machine

use crate::animation::{Animation, AnimationEnd};

/// Per-entity animation playback state
///
/// Stopped until [`play`](Self::play) is called, then advances its frame
/// index from accumulated elapsed time each tick. The end behavior of the
/// clip decides what happens on the last frame: `Loop` wraps forever,
/// `Hold` freezes on the last frame, `Reset` returns to frame 0 and stops.
///
/// State mutations return the sprite index that should be written to the
/// entity's sprite renderer; the animation pass (or the scene's play/stop
/// helpers) performs that cross-component write.
pub struct Animator {
    animation: Option<Animation>,
    playing: bool,
    current_frame: usize,
    elapsed: f32,
    pub(crate) ready_run: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Create a stopped animator with no clip assigned
    pub fn new() -> Self {
        Self {
            animation: None,
            playing: false,
            current_frame: 0,
            elapsed: 0.0,
            ready_run: false,
        }
    }

    /// Whether a clip is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The current frame index within the clip
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// The assigned clip, if any
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Start playing a clip from frame 0
    ///
    /// Resets elapsed time and returns frame 0's sprite index so the caller
    /// can apply it immediately.
    pub fn play(&mut self, clip: Animation) -> u8 {
        log::debug!("playing animation '{}'", clip.name());
        let first = clip.frames()[0];
        self.animation = Some(clip);
        self.playing = true;
        self.current_frame = 0;
        self.elapsed = 0.0;
        first
    }

    /// Pause playback, keeping the current frame
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop playback and rewind to frame 0 unconditionally
    ///
    /// Returns frame 0's sprite index when a clip is assigned.
    pub fn stop(&mut self) -> Option<u8> {
        self.current_frame = 0;
        self.elapsed = 0.0;
        self.playing = false;
        self.animation.as_ref().map(|clip| clip.frames()[0])
    }

    /// Advance playback by `dt` seconds
    ///
    /// Returns the sprite index to apply, or `None` when stopped or no clip
    /// is assigned.
    pub(crate) fn tick(&mut self, dt: f32) -> Option<u8> {
        if !self.playing {
            return None;
        }
        let clip = self.animation.as_ref()?;
        self.elapsed += dt;

        let frame_duration = 1.0 / clip.frame_rate();
        let frame_count = clip.frame_count();
        let raw_frame = (self.elapsed / frame_duration) as usize;

        match clip.end_behavior() {
            AnimationEnd::Loop => {
                self.current_frame = raw_frame % frame_count;
            }
            AnimationEnd::Hold => {
                self.current_frame = raw_frame.min(frame_count - 1);
                if self.current_frame == frame_count - 1 {
                    self.playing = false;
                }
            }
            AnimationEnd::Reset => {
                self.current_frame = raw_frame.min(frame_count - 1);
                if self.current_frame == frame_count - 1 {
                    self.current_frame = 0;
                    self.playing = false;
                }
            }
        }

        let clip = self.animation.as_ref()?;
        Some(clip.frames()[self.current_frame])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(end: AnimationEnd) -> Animation {
        Animation::new("walk", vec![3, 4, 5], 10.0, end).unwrap()
    }

    #[test]
    fn test_play_applies_first_frame() {
        let mut animator = Animator::new();
        assert_eq!(animator.play(clip(AnimationEnd::Loop)), 3);
        assert!(animator.is_playing());
        assert_eq!(animator.current_frame(), 0);
    }

    #[test]
    fn test_loop_wraps_around() {
        let mut animator = Animator::new();
        animator.play(clip(AnimationEnd::Loop));

        // 10 fps, 3 frames: 0.35s lands on frame 3 raw, wraps to 0
        assert_eq!(animator.tick(0.35), Some(3));
        assert!(animator.is_playing());
    }

    #[test]
    fn test_hold_freezes_on_last_frame() {
        let mut animator = Animator::new();
        animator.play(clip(AnimationEnd::Hold));

        assert_eq!(animator.tick(1.0), Some(5));
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(), 2);
    }

    #[test]
    fn test_reset_rewinds_and_stops() {
        let mut animator = Animator::new();
        animator.play(clip(AnimationEnd::Reset));

        assert_eq!(animator.tick(1.0), Some(3));
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(), 0);
    }

    #[test]
    fn test_stop_rewinds_unconditionally() {
        let mut animator = Animator::new();
        animator.play(clip(AnimationEnd::Loop));
        animator.tick(0.15);

        assert_eq!(animator.stop(), Some(3));
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(), 0);
    }

    #[test]
    fn test_tick_without_clip_is_inert() {
        let mut animator = Animator::new();
        assert_eq!(animator.tick(1.0), None);
    }
}
