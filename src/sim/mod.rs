//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied delta time and multiplier only
//! - Seeded RNG only, one stream per component
//! - Stable iteration order (ordered maps, id-sorted contacts)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collectibles;
pub mod collision;
pub mod enemies;
pub mod entity;
pub mod generator;
pub mod layer;
pub mod player;
pub mod stack;
pub mod state;
pub mod template;
pub mod tick;

pub use animation::{AnimationTrack, IdleMotion};
pub use collectibles::{Collectible, CollectibleFactory, CollectibleGenerator, CollectibleKind};
pub use collision::{Body, BodyId, ContactEvent, ContactTracker, circles_overlap};
pub use enemies::{Enemy, EnemyFactory, EnemyGenerator, EnemyKind};
pub use entity::{Collidable, Contact, EntityId, ParallaxObject, ResolvedVisuals, Spawned, Updatable};
pub use generator::{EntityGenerator, SpawnContext, SpawnFactory};
pub use layer::{Anchor, BorderStrip, LayerConfig, Oscillation, ParallaxLayer, Tile, Tint};
pub use player::{BoostProfile, Player};
pub use stack::ParallaxStack;
pub use state::{GameEvent, GamePhase, GameState, Hud};
pub use template::{Direction, IdleAction, SpawnTemplate, jitter};
pub use tick::{TickInput, tick};
