//! Moving entities
//!
//! A [`ParallaxObject`] enters from one screen edge, crosses the screen at a
//! constant speed along its template's direction, and flags itself removed
//! the first tick its bounding box is fully past the opposite edge. Enemy and
//! collectible types wrap one and add their own reactions.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use super::animation::{AnimationTrack, IdleMotion};
use super::template::{Direction, SpawnTemplate};
use crate::consts::{FADE_OUT_DURATION, SPAWN_LANE_OFFSET, SPAWN_LANE_STEPS};
use crate::error::ConfigError;
use crate::is_frozen;
use crate::resources::{Texture, TextureProvider, TextureSet};

/// Stable identity of a spawned entity within its generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Anything advanced by the per-frame tick
pub trait Updatable {
    fn update(&mut self, delta_time: f32, multiplier: f32);
}

/// What an entity is told about the body it touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub category: u32,
    pub position: Vec2,
}

/// Contact reactions. Both default to doing nothing.
pub trait Collidable {
    fn on_collision_begin(&mut self, _other: Option<&Contact>) {}
    fn on_collision_end(&mut self, _other: Option<&Contact>) {}
}

/// A generator-owned entity built around a [`ParallaxObject`]
pub trait Spawned: Updatable + Collidable {
    fn object(&self) -> &ParallaxObject;
    fn object_mut(&mut self) -> &mut ParallaxObject;

    fn id(&self) -> EntityId {
        self.object().id()
    }

    fn is_removed(&self) -> bool {
        self.object().is_removed()
    }
}

/// Textures a template needs, resolved once when its generator is built
#[derive(Debug, Clone)]
pub struct ResolvedVisuals {
    pub base: Arc<Texture>,
    pub animations: Vec<(String, TextureSet)>,
}

impl ResolvedVisuals {
    pub fn resolve(
        provider: &mut dyn TextureProvider,
        atlas: &str,
        template: &SpawnTemplate,
    ) -> Result<Self, ConfigError> {
        let base = provider
            .texture(atlas, &template.visual_key)
            .ok_or_else(|| ConfigError::MissingTexture {
                atlas: atlas.to_string(),
                name: template.visual_key.clone(),
            })?;

        let mut animations = Vec::new();
        for key in template.animation_keys.iter().flatten() {
            let frames = provider.textures(atlas, key);
            if frames.is_empty() {
                return Err(ConfigError::EmptyTextureGroup {
                    atlas: atlas.to_string(),
                    group: key.clone(),
                });
            }
            animations.push((key.clone(), frames));
        }

        Ok(Self { base, animations })
    }
}

/// A template-driven entity crossing the screen
#[derive(Debug, Clone)]
pub struct ParallaxObject {
    id: EntityId,
    kind: u32,
    direction: Direction,
    position: Vec2,
    extent: Vec2,
    speed: f32,
    screen_size: Vec2,
    category: u32,
    contact_mask: u32,
    texture: Arc<Texture>,
    animations: Vec<AnimationTrack>,
    idle: IdleMotion,
    /// Seconds of fade remaining once a collision consumes the entity
    fade: Option<f32>,
    alpha: f32,
    paused: bool,
    removed: bool,
}

impl ParallaxObject {
    /// Build an entity at a random lane on its entry edge, with its idle loop
    /// and first animation already running
    pub fn new<R: Rng + ?Sized>(
        id: EntityId,
        kind: u32,
        template: &SpawnTemplate,
        visuals: &ResolvedVisuals,
        screen_size: Vec2,
        rng: &mut R,
    ) -> Self {
        let lane = rng.random_range(0.0..SPAWN_LANE_STEPS) / 10.0;
        let mut animations: Vec<AnimationTrack> = visuals
            .animations
            .iter()
            .filter_map(|(name, frames)| AnimationTrack::new(name.clone(), frames.clone()))
            .collect();
        if let Some(main) = animations.first_mut() {
            main.play();
        }

        Self {
            id,
            kind,
            direction: template.direction,
            position: spawn_position(template.direction, template.extent, screen_size, lane),
            extent: template.extent,
            speed: template.speed,
            screen_size,
            category: template.collision_tag,
            contact_mask: template.collision_tag,
            texture: visuals.base.clone(),
            animations,
            idle: template.idle_action.motion(),
            fade: None,
            alpha: 1.0,
            paused: false,
            removed: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity-type key of the template this was built from
    pub fn kind(&self) -> u32 {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Shift by `delta` without the off-screen check (that runs next update)
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn contact_mask(&self) -> u32 {
        self.contact_mask
    }

    /// Radius of the circular contact body
    pub fn body_radius(&self) -> f32 {
        self.extent.x.max(self.extent.y) / 2.0
    }

    /// Texture to draw: the main animation's frame, else the base texture
    pub fn current_texture(&self) -> &Arc<Texture> {
        self.animations
            .first()
            .map(AnimationTrack::current_frame)
            .unwrap_or(&self.texture)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationTrack> {
        self.animations.iter().find(|a| a.name() == name)
    }

    pub fn play_animation(&mut self, name: &str) -> bool {
        match self.animations.iter_mut().find(|a| a.name() == name) {
            Some(track) => {
                track.play();
                true
            }
            None => false,
        }
    }

    /// Idle-loop offset applied when drawing
    pub fn render_offset(&self) -> Vec2 {
        self.idle.offset()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Only live, non-fading entities take part in contacts
    pub fn is_collidable(&self) -> bool {
        !self.removed && self.fade.is_none()
    }

    /// Fade out, then remove. Repeated calls don't restart the fade.
    pub fn fade_out(&mut self) {
        if !self.removed && self.fade.is_none() {
            self.fade = Some(FADE_OUT_DURATION);
        }
    }

    pub fn remove(&mut self) {
        self.removed = true;
    }

    /// Whether the bounding box has fully cleared the exit edge
    pub fn is_past_exit(&self) -> bool {
        past_exit(self.direction, self.position, self.extent, self.screen_size)
    }
}

impl Updatable for ParallaxObject {
    fn update(&mut self, delta_time: f32, multiplier: f32) {
        self.paused = is_frozen(multiplier);
        if self.removed || self.paused {
            return;
        }

        if let Some(remaining) = self.fade.as_mut() {
            *remaining -= delta_time;
            self.alpha = (*remaining / FADE_OUT_DURATION).clamp(0.0, 1.0);
            if *remaining <= 0.0 {
                self.removed = true;
                return;
            }
        }

        let movement = self.speed * delta_time * multiplier;
        self.position += self.direction.unit() * movement;
        if self.is_past_exit() {
            self.removed = true;
            return;
        }

        self.idle.advance(delta_time);
        for track in &mut self.animations {
            track.update(delta_time);
        }
    }
}

impl Collidable for ParallaxObject {}

/// Entry point on the edge opposite the exit. `lane` in [0, 0.6) picks the
/// spot along the cross axis (pushed 20% in from the low side).
pub fn spawn_position(direction: Direction, extent: Vec2, screen: Vec2, lane: f32) -> Vec2 {
    let cross = |span: f32| lane * span + span * SPAWN_LANE_OFFSET;
    match direction {
        Direction::Up => Vec2::new(cross(screen.x), -extent.y),
        Direction::Down => Vec2::new(cross(screen.x), screen.y + extent.y),
        Direction::Right => Vec2::new(-extent.x, cross(screen.y)),
        Direction::Left => Vec2::new(screen.x + extent.x, cross(screen.y)),
    }
}

/// Past `screen + extent` going up/right, below `-extent` going down/left
pub fn past_exit(direction: Direction, position: Vec2, extent: Vec2, screen: Vec2) -> bool {
    match direction {
        Direction::Up => position.y > screen.y + extent.y,
        Direction::Down => position.y < -extent.y,
        Direction::Right => position.x > screen.x + extent.x,
        Direction::Left => position.x < -extent.x,
    }
}
