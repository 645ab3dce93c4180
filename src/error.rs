//! Construction-time configuration errors
//!
//! Levels are authored content, so anything that breaks an invariant is
//! rejected when the generator, layer or stack is built. Nothing in the
//! per-tick path returns an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("template {kind}: base interval must be positive and finite, got {value}")]
    NonPositiveInterval { kind: u32, value: f32 },

    #[error("{what}: extent must be positive in both axes, got {width}x{height}")]
    NonPositiveExtent {
        what: String,
        width: f32,
        height: f32,
    },

    #[error("template {kind}: jitter bounds must be finite and non-negative (upper {upper}, lower {lower})")]
    NegativeJitter { kind: u32, upper: f32, lower: f32 },

    #[error("{what}: speed must be positive, got {value}")]
    NonPositiveSpeed { what: String, value: f32 },

    #[error("layer '{group}': max concurrent tiles must be at least 1")]
    NoTileCapacity { group: String },

    #[error("layer '{group}': tint strength {value} is outside [0, 1]")]
    TintStrengthOutOfRange { group: String, value: f32 },

    #[error("texture group '{group}' in atlas '{atlas}' is empty")]
    EmptyTextureGroup { atlas: String, group: String },

    #[error("texture '{name}' not found in atlas '{atlas}'")]
    MissingTexture { atlas: String, name: String },

    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
}
