//! Parallax stack
//!
//! The ordered set of layers making up the background. Membership is fixed
//! at construction; the stack fans out updates and texture-set switches.

use glam::Vec2;

use super::layer::{LayerConfig, ParallaxLayer};
use crate::error::ConfigError;
use crate::resources::TextureProvider;
use crate::stream_seed;

pub struct ParallaxStack {
    layers: Vec<ParallaxLayer>,
    z_offset: f32,
}

impl ParallaxStack {
    /// Resolve each layer's texture group and build the layers in order.
    /// Each layer draws from its own RNG stream of `seed`.
    pub fn new(
        configs: Vec<LayerConfig>,
        screen_size: Vec2,
        provider: &mut dyn TextureProvider,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::with_capacity(configs.len());
        for (index, config) in configs.into_iter().enumerate() {
            let textures = provider.textures(&config.atlas, &config.texture_group);
            let layer = ParallaxLayer::new(config, screen_size, textures, stream_seed(seed, index as u64))?;
            layers.push(layer);
        }

        log::info!("Parallax stack ready with {} layer(s)", layers.len());
        Ok(Self { layers, z_offset: 0.0 })
    }

    pub fn update(&mut self, delta_time: f32, multiplier: f32) {
        for layer in &mut self.layers {
            layer.update(delta_time, multiplier);
        }
    }

    /// Re-resolve every layer's group from `atlas`. Tiles already on screen
    /// keep their textures. Returns how many layers switched.
    pub fn switch_texture_set(&mut self, atlas: &str, provider: &mut dyn TextureProvider) -> usize {
        let mut switched = 0;
        for layer in &mut self.layers {
            let textures = provider.textures(atlas, &layer.config().texture_group);
            if layer.set_textures(atlas, textures) {
                switched += 1;
            }
        }
        log::info!(
            "Switched texture set to '{}' ({}/{} layers)",
            atlas,
            switched,
            self.layers.len()
        );
        switched
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&ParallaxLayer> {
        self.layers.get(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn tile_count(&self) -> usize {
        self.layers.iter().map(|l| l.tiles().len()).sum()
    }

    pub fn z_offset(&self) -> f32 {
        self.z_offset
    }

    pub fn set_z_offset(&mut self, z_offset: f32) {
        self.z_offset = z_offset;
    }
}
