//! Enemies
//!
//! Basic enemies drift across their lane. Chargers drift too, but once the
//! player comes within range they lock a heading toward it and add a second
//! movement along that heading every tick.

use glam::Vec2;

use super::entity::{Collidable, Contact, ParallaxObject, Spawned, Updatable};
use super::generator::{EntityGenerator, SpawnContext, SpawnFactory};
use super::template::SpawnTemplate;
use crate::collider;
use crate::consts::CHARGE_DETECTION_RADIUS;
use crate::is_frozen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum EnemyKind {
    Basic = 0,
    Charger = 1,
}

impl EnemyKind {
    pub fn id(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for EnemyKind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EnemyKind::Basic),
            1 => Ok(EnemyKind::Charger),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Drift,
    /// `heading` is set once the player is spotted and never changes after
    Charge { heading: Option<Vec2> },
}

#[derive(Debug, Clone)]
pub struct Enemy {
    object: ParallaxObject,
    kind: EnemyKind,
    behavior: Behavior,
    /// Player position as of the last `track` call
    target: Option<Vec2>,
}

impl Enemy {
    pub fn new(object: ParallaxObject, kind: EnemyKind) -> Self {
        let behavior = match kind {
            EnemyKind::Basic => Behavior::Drift,
            EnemyKind::Charger => Behavior::Charge { heading: None },
        };
        Self {
            object,
            kind,
            behavior,
            target: None,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.behavior, Behavior::Charge { heading: Some(_) })
    }

    /// Tell the enemy where the player is (`None` when there is no player)
    pub fn track(&mut self, player: Option<Vec2>) {
        self.target = player;
    }
}

impl Updatable for Enemy {
    fn update(&mut self, delta_time: f32, multiplier: f32) {
        self.object.update(delta_time, multiplier);
        if self.object.is_removed() || is_frozen(multiplier) {
            return;
        }

        let Behavior::Charge { heading } = &mut self.behavior else {
            return;
        };
        match *heading {
            Some(dir) => {
                let movement = self.object.speed() * delta_time * multiplier;
                self.object.translate(dir * movement);
            }
            None => {
                let Some(target) = self.target else {
                    return;
                };
                let to_target = target - self.object.position();
                if to_target.length() < CHARGE_DETECTION_RADIUS {
                    *heading = Some(to_target.normalize_or_zero());
                }
            }
        }
    }
}

impl Collidable for Enemy {
    fn on_collision_begin(&mut self, other: Option<&Contact>) {
        if other.is_some_and(|c| c.category & collider::PLAYER != 0) {
            self.object.fade_out();
        }
    }
}

impl Spawned for Enemy {
    fn object(&self) -> &ParallaxObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut ParallaxObject {
        &mut self.object
    }
}

/// Closed mapping from enemy kind keys to enemies
#[derive(Debug, Default)]
pub struct EnemyFactory;

impl SpawnFactory for EnemyFactory {
    type Entity = Enemy;

    fn generate(
        &mut self,
        kind: u32,
        template: &SpawnTemplate,
        ctx: &mut SpawnContext<'_>,
    ) -> Option<Enemy> {
        let kind = EnemyKind::try_from(kind).ok()?;
        let object = ParallaxObject::new(ctx.id, kind.id(), template, ctx.visuals, ctx.screen_size, ctx.rng);
        Some(Enemy::new(object, kind))
    }
}

pub type EnemyGenerator = EntityGenerator<EnemyFactory>;

impl EnemyGenerator {
    /// Point every charger at the player
    pub fn track(&mut self, player: Option<Vec2>) {
        for enemy in self.entities_mut() {
            enemy.track(player);
        }
    }
}
