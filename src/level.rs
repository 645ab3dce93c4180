//! Level configuration
//!
//! Everything authored about a run: the screen, the spawn templates, the
//! parallax layers and the atlases they draw from. Levels load from JSON;
//! the default is the built-in desert level.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resources::AtlasManifest;
use crate::sim::collectibles::CollectibleKind;
use crate::sim::enemies::EnemyKind;
use crate::sim::layer::{Anchor, LayerConfig};
use crate::sim::template::{IdleAction, SpawnTemplate};
use crate::{Color, collider};

fn default_scale() -> f32 {
    1.0
}

fn default_player_atlas() -> String {
    "Ship".to_string()
}

fn default_player_texture() -> String {
    "idle".to_string()
}

fn default_enemy_atlas() -> String {
    "Enemies".to_string()
}

fn default_collectible_atlas() -> String {
    "Collectibles".to_string()
}

/// A complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Run seed; every random stream derives from it
    #[serde(default)]
    pub seed: u64,
    pub screen_size: Vec2,
    /// Texture density (2.0 selects `@2x` textures)
    #[serde(default = "default_scale")]
    pub display_scale: f32,

    #[serde(default = "default_player_atlas")]
    pub player_atlas: String,
    #[serde(default = "default_player_texture")]
    pub player_texture: String,

    #[serde(default = "default_enemy_atlas")]
    pub enemy_atlas: String,
    /// Keyed by enemy kind
    #[serde(default)]
    pub enemies: BTreeMap<u32, SpawnTemplate>,

    #[serde(default = "default_collectible_atlas")]
    pub collectible_atlas: String,
    /// Keyed by collectible kind
    #[serde(default)]
    pub collectibles: BTreeMap<u32, SpawnTemplate>,

    /// Drawn by each layer's depth order, not list order
    #[serde(default)]
    pub parallax: Vec<LayerConfig>,

    #[serde(default = "AtlasManifest::starlight")]
    pub atlases: AtlasManifest,
}

impl Default for Level {
    fn default() -> Self {
        let enemy_size = Vec2::new(40.0, 40.0);
        let mut enemies = BTreeMap::new();
        enemies.insert(
            EnemyKind::Basic.id(),
            SpawnTemplate::new("enemy_mine", enemy_size, 250.0, 0.8, collider::ENEMY)
                .with_idle_action(IdleAction::Bob),
        );
        enemies.insert(
            EnemyKind::Charger.id(),
            SpawnTemplate::new("enemy_flyer", enemy_size, 300.0, 5.0, collider::ENEMY)
                .with_idle_action(IdleAction::Bob),
        );

        let mut collectibles = BTreeMap::new();
        collectibles.insert(
            CollectibleKind::Coin.id(),
            SpawnTemplate::new("point", Vec2::new(20.0, 20.0), 300.0, 15.0, collider::COLLECTIBLE)
                .with_idle_action(IdleAction::Bob)
                .with_animations(["point"]),
        );

        let foreground_border = Color::from_rgb8(208, 100, 90);
        let background_border = Color::from_rgb8(88, 45, 37);
        let parallax = vec![
            LayerConfig::new("Desert", "ground_small", 781.25, 2.0)
                .with_tint(Color::RED, 0.2)
                .with_oscillation(10.0, 2.0)
                .with_gap(0.2),
            LayerConfig::new("Desert", "ground_large", 625.0, 1.0)
                .with_capacity(3)
                .with_tint(Color::RED, 0.1)
                .with_anchor(Anchor::Bottom, 10.0)
                .with_border(foreground_border),
            LayerConfig::new("Desert", "ground_float", 187.5, -1.0)
                .with_capacity(3)
                .with_tint(Color::BLACK, 0.2)
                .with_anchor(Anchor::Center, 50.0),
            LayerConfig::new("Desert", "ground_large", 75.0, -2.0)
                .with_capacity(3)
                .with_tint(Color::BLACK, 0.4)
                .with_anchor(Anchor::Bottom, 10.0)
                .with_border(background_border),
            LayerConfig::new("Skybox", "planet", 6.25, -3.0).with_anchor(Anchor::Top, 0.0),
        ];

        Self {
            seed: 0x5EED,
            screen_size: Vec2::new(1024.0, 768.0),
            display_scale: 1.0,
            player_atlas: default_player_atlas(),
            player_texture: default_player_texture(),
            enemy_atlas: default_enemy_atlas(),
            enemies,
            collectible_atlas: default_collectible_atlas(),
            collectibles,
            parallax,
            atlases: AtlasManifest::starlight(),
        }
    }
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Read and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level from {} ({} enemy, {} collectible templates, {} layers)",
            path.as_ref().display(),
            level.enemies.len(),
            level.collectibles.len(),
            level.parallax.len()
        );
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every template and layer up front
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_size.x > 0.0 && self.screen_size.y > 0.0) {
            return Err(ConfigError::NonPositiveExtent {
                what: "screen".to_string(),
                width: self.screen_size.x,
                height: self.screen_size.y,
            });
        }
        for (&kind, template) in self.enemies.iter().chain(&self.collectibles) {
            template.validate(kind)?;
        }
        for layer in &self.parallax {
            layer.validate()?;
        }
        Ok(())
    }
}
