//! Starlight - a side-scrolling arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, parallax, contacts, game state)
//! - `level`: Data-driven level configuration
//! - `resources`: Texture atlas lookup with memoization
//! - `scene`: Draw list composition for an external renderer

pub mod error;
pub mod level;
pub mod resources;
pub mod scene;
pub mod sim;

pub use error::ConfigError;
pub use level::Level;
pub use resources::{AtlasManifest, Texture, TextureCache, TextureProvider};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed step used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Floor (and initial value) of a layer's smoothed frame time
    pub const NOMINAL_FRAME_TIME: f32 = 1.0 / 60.0;
    /// Depth units reserved per parallax layer
    pub const MAX_LAYERS_PER_NODE: f32 = 5.0;
    /// Center-anchored tiles offset by `k * CENTER_OFFSET_STEP * inset`, k in [0, steps)
    pub const CENTER_OFFSET_STEPS: u32 = 20;
    pub const CENTER_OFFSET_STEP: f32 = 0.1;

    /// Spawn interval jitter defaults (factor range [1.1, 1.4))
    pub const DEFAULT_JITTER_UPPER: f32 = 3.0;
    pub const DEFAULT_JITTER_LOWER: f32 = 1.0;
    pub const JITTER_SCALE: f32 = 0.1;

    /// Spawn lane: uniform [0, 6) tenths of the cross axis, pushed in by 20%
    pub const SPAWN_LANE_STEPS: f32 = 6.0;
    pub const SPAWN_LANE_OFFSET: f32 = 0.2;

    /// Fade applied to entities consumed by a collision (seconds)
    pub const FADE_OUT_DURATION: f32 = 0.1;
    /// Texture animation frame time
    pub const ANIMATION_FRAME_TIME: f32 = 1.0 / 60.0;
    /// Idle bob: four eased moves of this distance, each lasting one step
    pub const BOB_DISTANCE: f32 = 5.0;
    pub const BOB_STEP_DURATION: f32 = 1.0;

    /// Chargers lock on once the player is this close
    pub const CHARGE_DETECTION_RADIUS: f32 = 150.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_HEALTH_MAX: f32 = 4.0;
    pub const PLAYER_BOOST_MAX: f32 = 100.0;
    pub const PLAYER_BOOST_SPEED: f32 = 2.0;
    /// Boost rates are authored per frame at this rate
    pub const BOOST_RATE_HZ: f32 = 60.0;

    /// Per-component RNG stream offsets (mixed into the level seed)
    pub const RNG_STREAM_ENEMIES: u64 = 1;
    pub const RNG_STREAM_COLLECTIBLES: u64 = 2;
    pub const RNG_STREAM_PARALLAX: u64 = 3;
}

/// Collision category bits
pub mod collider {
    pub const PLAYER: u32 = 1 << 0;
    pub const ENEMY: u32 = 1 << 1;
    pub const COLLECTIBLE: u32 = 1 << 2;
}

/// A multiplier this small pauses everything it drives
#[inline]
pub fn is_frozen(multiplier: f32) -> bool {
    multiplier <= f32::EPSILON
}

/// Derive a component seed from the level seed and a stream id
#[inline]
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// RGBA color, components in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Fully transparent colors draw nothing
    pub fn is_clear(&self) -> bool {
        self.a <= f32::EPSILON
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::CLEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_threshold() {
        assert!(is_frozen(0.0));
        assert!(is_frozen(f32::EPSILON));
        assert!(!is_frozen(0.5));
        assert!(!is_frozen(2.0));
    }

    #[test]
    fn test_stream_seeds_differ() {
        let a = stream_seed(42, consts::RNG_STREAM_ENEMIES);
        let b = stream_seed(42, consts::RNG_STREAM_COLLECTIBLES);
        assert_ne!(a, b);
        assert_eq!(stream_seed(42, 0), 42);
    }

    #[test]
    fn test_color_clear() {
        assert!(Color::CLEAR.is_clear());
        assert!(!Color::from_rgb8(208, 100, 90).is_clear());
        assert_eq!(Color::default(), Color::CLEAR);
    }
}
