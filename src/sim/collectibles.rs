//! Collectibles
//!
//! Plain lane drifters that disappear when the player picks them up. The
//! host awards the score; the coin only takes care of leaving.

use super::entity::{Collidable, Contact, ParallaxObject, Spawned, Updatable};
use super::generator::{EntityGenerator, SpawnContext, SpawnFactory};
use super::template::SpawnTemplate;
use crate::collider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum CollectibleKind {
    Coin = 0,
}

impl CollectibleKind {
    pub fn id(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for CollectibleKind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CollectibleKind::Coin),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    object: ParallaxObject,
    kind: CollectibleKind,
}

impl Collectible {
    pub fn new(object: ParallaxObject, kind: CollectibleKind) -> Self {
        Self { object, kind }
    }

    pub fn kind(&self) -> CollectibleKind {
        self.kind
    }
}

impl Updatable for Collectible {
    fn update(&mut self, delta_time: f32, multiplier: f32) {
        self.object.update(delta_time, multiplier);
    }
}

impl Collidable for Collectible {
    fn on_collision_begin(&mut self, other: Option<&Contact>) {
        if other.is_some_and(|c| c.category & collider::PLAYER != 0) {
            self.object.fade_out();
        }
    }
}

impl Spawned for Collectible {
    fn object(&self) -> &ParallaxObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut ParallaxObject {
        &mut self.object
    }
}

#[derive(Debug, Default)]
pub struct CollectibleFactory;

impl SpawnFactory for CollectibleFactory {
    type Entity = Collectible;

    fn generate(
        &mut self,
        kind: u32,
        template: &SpawnTemplate,
        ctx: &mut SpawnContext<'_>,
    ) -> Option<Collectible> {
        let kind = CollectibleKind::try_from(kind).ok()?;
        let object = ParallaxObject::new(ctx.id, kind.id(), template, ctx.visuals, ctx.screen_size, ctx.rng);
        Some(Collectible::new(object, kind))
    }
}

pub type CollectibleGenerator = EntityGenerator<CollectibleFactory>;
