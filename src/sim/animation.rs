//! Texture animations and idle motion
//!
//! Both only advance while their owner is unpaused; a frozen entity holds
//! its current frame and offset.

use glam::Vec2;

use crate::consts::{ANIMATION_FRAME_TIME, BOB_DISTANCE, BOB_STEP_DURATION};
use crate::resources::{Texture, TextureSet};
use std::sync::Arc;

/// In-flight playback of a track
#[derive(Debug, Clone, Copy, PartialEq)]
struct Playback {
    elapsed: f32,
    reversed: bool,
}

/// A two-state texture animation.
///
/// Each play runs the frames from the current end to the other end, so
/// alternate plays run forward and backward. Plays requested while one is
/// running are queued.
#[derive(Debug, Clone)]
pub struct AnimationTrack {
    name: String,
    frames: TextureSet,
    at_start: bool,
    playback: Option<Playback>,
    queued: usize,
}

impl AnimationTrack {
    /// `None` if there are no frames
    pub fn new(name: impl Into<String>, frames: TextureSet) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            frames,
            at_start: true,
            playback: None,
            queued: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_at_start(&self) -> bool {
        self.at_start
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Length of one play in seconds
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * ANIMATION_FRAME_TIME
    }

    pub fn play(&mut self) {
        if self.playback.is_some() {
            self.queued += 1;
            return;
        }
        self.playback = Some(Playback {
            elapsed: 0.0,
            reversed: !self.at_start,
        });
    }

    /// Advance playback; a finished play flips the resting end
    pub fn update(&mut self, dt: f32) {
        let duration = self.duration();
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        playback.elapsed += dt;
        if playback.elapsed < duration {
            return;
        }

        self.at_start = !self.at_start;
        self.playback = None;
        if self.queued > 0 {
            self.queued -= 1;
            self.play();
        }
    }

    /// Frame to draw right now
    pub fn current_frame(&self) -> &Arc<Texture> {
        let last = self.frames.len() - 1;
        match self.playback {
            Some(p) => {
                let index = ((p.elapsed / ANIMATION_FRAME_TIME) as usize).min(last);
                if p.reversed {
                    &self.frames[last - index]
                } else {
                    &self.frames[index]
                }
            }
            None if self.at_start => &self.frames[0],
            None => &self.frames[last],
        }
    }
}

/// Render-time offset loop started at spawn
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IdleMotion {
    #[default]
    Still,
    /// Up, back down, further down, back up; each step eased
    Bob { phase: f32 },
}

impl IdleMotion {
    pub fn advance(&mut self, dt: f32) {
        if let IdleMotion::Bob { phase } = self {
            *phase = (*phase + dt).rem_euclid(BOB_STEP_DURATION * 4.0);
        }
    }

    pub fn offset(&self) -> Vec2 {
        let IdleMotion::Bob { phase } = *self else {
            return Vec2::ZERO;
        };
        let step = (phase / BOB_STEP_DURATION).floor() as u32;
        let t = (phase / BOB_STEP_DURATION).fract();
        let y = match step {
            0 => BOB_DISTANCE * ease_out(t),
            1 => BOB_DISTANCE - BOB_DISTANCE * ease_in(t),
            2 => -BOB_DISTANCE * ease_out(t),
            _ => -BOB_DISTANCE + BOB_DISTANCE * ease_in(t),
        };
        Vec2::new(0.0, y)
    }
}

#[inline]
fn ease_in(t: f32) -> f32 {
    t * t
}

#[inline]
fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}
