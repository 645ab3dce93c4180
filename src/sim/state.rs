//! Game state
//!
//! The host scene: the player, both generators, the parallax stack and the
//! contact tracker, plus what the HUD reads (health, boost, score).

use std::sync::Arc;

use glam::Vec2;

use super::collectibles::{CollectibleFactory, CollectibleGenerator};
use super::collision::{Body, BodyId, ContactTracker};
use super::enemies::{EnemyFactory, EnemyGenerator};
use super::entity::Spawned;
use super::player::Player;
use super::stack::ParallaxStack;
use crate::consts::{RNG_STREAM_COLLECTIBLES, RNG_STREAM_ENEMIES, RNG_STREAM_PARALLAX};
use crate::error::ConfigError;
use crate::level::Level;
use crate::resources::{Texture, TextureProvider};
use crate::{collider, stream_seed};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Everything frozen until unpaused
    Paused,
    /// Player destroyed; frozen for good
    GameOver,
}

/// Things that happened during a tick, for UI and audio layers
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerHit { health: f32 },
    Collected { score: u64 },
    GameOver { score: u64 },
    TextureSetSwitched { atlas: String, layers: usize },
    Paused,
    Resumed,
}

/// Values the HUD shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub health: f32,
    pub health_max: f32,
    pub boost: f32,
    pub boost_max: f32,
    pub score: u64,
}

pub struct GameState {
    /// Level seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub screen_size: Vec2,
    /// Unfrozen ticks simulated
    pub time_ticks: u64,
    pub score: u64,
    pub player: Player,
    pub player_texture: Arc<Texture>,
    pub shield_texture: Option<Arc<Texture>>,
    pub enemies: EnemyGenerator,
    pub collectibles: CollectibleGenerator,
    pub parallax: ParallaxStack,
    pub contacts: ContactTracker,
    /// Emitted this tick; cleared at the start of the next
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build every component of a level, resolving textures through `provider`
    pub fn new(level: &Level, provider: &mut dyn TextureProvider) -> Result<Self, ConfigError> {
        level.validate()?;
        let screen = level.screen_size;

        let player_texture = provider
            .texture(&level.player_atlas, &level.player_texture)
            .ok_or_else(|| ConfigError::MissingTexture {
                atlas: level.player_atlas.clone(),
                name: level.player_texture.clone(),
            })?;
        let shield_texture = provider.texture(&level.player_atlas, "shield");
        let player = Player::new(screen, provider.textures(&level.player_atlas, "boost"));

        let enemies = EnemyGenerator::new(
            level.enemy_atlas.clone(),
            level.enemies.clone(),
            screen,
            EnemyFactory,
            provider,
            stream_seed(level.seed, RNG_STREAM_ENEMIES),
        )?;
        let collectibles = CollectibleGenerator::new(
            level.collectible_atlas.clone(),
            level.collectibles.clone(),
            screen,
            CollectibleFactory,
            provider,
            stream_seed(level.seed, RNG_STREAM_COLLECTIBLES),
        )?;
        let parallax = ParallaxStack::new(
            level.parallax.clone(),
            screen,
            provider,
            stream_seed(level.seed, RNG_STREAM_PARALLAX),
        )?;

        log::info!("Game state ready (seed {:#x}, screen {}x{})", level.seed, screen.x, screen.y);

        Ok(Self {
            seed: level.seed,
            phase: GamePhase::Playing,
            screen_size: screen,
            time_ticks: 0,
            score: 0,
            player,
            player_texture,
            shield_texture,
            enemies,
            collectibles,
            parallax,
            contacts: ContactTracker::new(),
            events: Vec::new(),
        })
    }

    /// Time scale handed to every component this tick
    pub fn multiplier(&self) -> f32 {
        match self.phase {
            GamePhase::Paused | GamePhase::GameOver => 0.0,
            GamePhase::Playing => self.player.current_speed,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.player.health,
            health_max: self.player.health_max,
            boost: self.player.boost,
            boost_max: self.player.boost_max,
            score: self.score,
        }
    }

    /// Every body that can take part in a contact this tick
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies = Vec::new();
        if self.player.is_alive() {
            bodies.push(Body {
                id: BodyId::Player,
                category: collider::PLAYER,
                contact_mask: self.player.contact_mask(),
                center: self.player.position,
                radius: self.player.body_radius(),
            });
        }

        let objects = self
            .enemies
            .entities()
            .iter()
            .map(|e| (BodyId::Enemy(e.id()), e.object()))
            .chain(
                self.collectibles
                    .entities()
                    .iter()
                    .map(|c| (BodyId::Collectible(c.id()), c.object())),
            );
        for (id, object) in objects {
            if !object.is_collidable() {
                continue;
            }
            bodies.push(Body {
                id,
                category: object.category(),
                contact_mask: object.contact_mask(),
                center: object.position(),
                radius: object.body_radius(),
            });
        }
        bodies
    }

    /// Live spawned entities across both generators
    pub fn entity_count(&self) -> usize {
        self.enemies.entities().len() + self.collectibles.entities().len()
    }
}
