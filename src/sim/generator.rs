//! Template-driven spawning
//!
//! An [`EntityGenerator`] owns one countdown per registered template. Each
//! update it fires the expired ones, asks its [`SpawnFactory`] to build an
//! entity for the kind, then advances every entity it owns.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{EntityId, ResolvedVisuals, Spawned, Updatable};
use super::template::SpawnTemplate;
use crate::error::ConfigError;
use crate::is_frozen;
use crate::resources::TextureProvider;

/// Everything a factory may use to build one entity
pub struct SpawnContext<'a> {
    pub id: EntityId,
    pub screen_size: Vec2,
    pub visuals: &'a ResolvedVisuals,
    pub rng: &'a mut Pcg32,
}

/// Maps an entity-type key to a concrete entity.
///
/// The default builds nothing, so an unrecognized kind is a silent no-op.
pub trait SpawnFactory {
    type Entity: Spawned;

    fn generate(
        &mut self,
        _kind: u32,
        _template: &SpawnTemplate,
        _ctx: &mut SpawnContext<'_>,
    ) -> Option<Self::Entity> {
        None
    }
}

/// Spawns and owns the entities of one category (enemies, collectibles)
pub struct EntityGenerator<F: SpawnFactory> {
    atlas: String,
    screen_size: Vec2,
    templates: BTreeMap<u32, SpawnTemplate>,
    visuals: BTreeMap<u32, ResolvedVisuals>,
    timers: BTreeMap<u32, f32>,
    factory: F,
    entities: Vec<F::Entity>,
    rng: Pcg32,
    next_id: u32,
    spawned: usize,
}

impl<F: SpawnFactory> EntityGenerator<F> {
    /// Validate the templates and resolve their textures from `atlas`.
    /// Every timer starts at its template's base interval.
    pub fn new(
        atlas: impl Into<String>,
        templates: BTreeMap<u32, SpawnTemplate>,
        screen_size: Vec2,
        factory: F,
        provider: &mut dyn TextureProvider,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let atlas = atlas.into();
        if !(screen_size.x > 0.0 && screen_size.y > 0.0) {
            return Err(ConfigError::NonPositiveExtent {
                what: format!("screen for '{}'", atlas),
                width: screen_size.x,
                height: screen_size.y,
            });
        }

        let mut visuals = BTreeMap::new();
        let mut timers = BTreeMap::new();
        for (&kind, template) in &templates {
            template.validate(kind)?;
            visuals.insert(kind, ResolvedVisuals::resolve(provider, &atlas, template)?);
            timers.insert(kind, template.base_interval);
        }

        log::info!(
            "Entity generator for '{}' ready with {} template(s)",
            atlas,
            templates.len()
        );

        Ok(Self {
            atlas,
            screen_size,
            templates,
            visuals,
            timers,
            factory,
            entities: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            spawned: 0,
        })
    }

    /// Fire expired timers, then advance and prune the owned entities
    pub fn update(&mut self, delta_time: f32, multiplier: f32) {
        if !is_frozen(multiplier) {
            self.run_timers(delta_time, multiplier);
        }

        for entity in &mut self.entities {
            entity.update(delta_time, multiplier);
        }
        self.entities.retain(|e| !e.is_removed());
    }

    fn run_timers(&mut self, delta_time: f32, multiplier: f32) {
        for (&kind, timer) in self.timers.iter_mut() {
            let Some(template) = self.templates.get(&kind) else {
                continue;
            };

            if *timer < 0.0 {
                *timer = template.next_interval(&mut self.rng);

                let Some(visuals) = self.visuals.get(&kind) else {
                    continue;
                };
                let mut ctx = SpawnContext {
                    id: EntityId(self.next_id),
                    screen_size: self.screen_size,
                    visuals,
                    rng: &mut self.rng,
                };
                match self.factory.generate(kind, template, &mut ctx) {
                    Some(entity) => {
                        self.next_id += 1;
                        self.spawned += 1;
                        self.entities.push(entity);
                    }
                    None => log::debug!("'{}': no entity for kind {}", self.atlas, kind),
                }
            } else {
                *timer -= delta_time * multiplier;
            }
        }
    }

    pub fn atlas(&self) -> &str {
        &self.atlas
    }

    pub fn templates(&self) -> &BTreeMap<u32, SpawnTemplate> {
        &self.templates
    }

    pub fn entities(&self) -> &[F::Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [F::Entity] {
        &mut self.entities
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut F::Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn timer(&self, kind: u32) -> Option<f32> {
        self.timers.get(&kind).copied()
    }

    pub fn timers(&self) -> &BTreeMap<u32, f32> {
        &self.timers
    }

    /// Entities produced since construction
    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}
