//! Playback Cursor
//!
//! A pure state machine over a generated timeline. It owns no timer: the
//! caller advances it one frame at a time at whatever pace it wants, and
//! cancellation is just stopping the advance. Generation itself is never
//! cancelled.

use std::fmt;

use crate::animation::timeline::{AnimationTimeline, Frame};

/// Playback states for a timeline cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Created, not yet started
    #[default]
    Ready,
    /// Frames are being consumed
    Running,
    /// Stopped by the caller before completion
    Stopped,
    /// Every frame has been consumed
    Completed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Running => write!(f, "running"),
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Completed => write!(f, "completed"),
        }
    }
}

/// Frame-by-frame cursor over an immutable timeline
#[derive(Debug, Clone)]
pub struct Playback {
    timeline: AnimationTimeline,
    cursor: usize,
    state: PlaybackState,
}

impl Playback {
    /// Wrap a generated timeline for playback.
    pub fn new(timeline: AnimationTimeline) -> Self {
        Self {
            timeline,
            cursor: 0,
            state: PlaybackState::Ready,
        }
    }

    /// Begin consuming frames. No-op unless the cursor is `Ready`.
    pub fn start(&mut self) {
        if self.state == PlaybackState::Ready {
            self.state = PlaybackState::Running;
            log::debug!(
                "Playback started: {} frames at {:.1} ms/frame",
                self.timeline.frame_count(),
                self.timeline.frame_interval_ms()
            );
        }
    }

    /// The next frame, advancing the cursor.
    ///
    /// Returns `None` when not running; transitions to `Completed` after
    /// the last frame is handed out.
    pub fn next_frame(&mut self) -> Option<&Frame> {
        if self.state != PlaybackState::Running {
            return None;
        }

        let index = self.cursor;
        if index >= self.timeline.frames.len() {
            self.state = PlaybackState::Completed;
            return None;
        }

        self.cursor += 1;
        if self.cursor == self.timeline.frames.len() {
            self.state = PlaybackState::Completed;
        }
        Some(&self.timeline.frames[index])
    }

    /// Stop before completion. Completed playback stays completed.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Running || self.state == PlaybackState::Ready {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Frames not yet handed out
    pub fn frames_remaining(&self) -> usize {
        self.timeline.frames.len() - self.cursor
    }

    /// The wrapped timeline
    pub fn timeline(&self) -> &AnimationTimeline {
        &self.timeline
    }

    /// Suggested real-time pacing between frames
    pub fn frame_interval_ms(&self) -> f64 {
        self.timeline.frame_interval_ms()
    }
}
