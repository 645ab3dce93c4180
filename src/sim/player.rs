//! Player ship
//!
//! Health, shield and boost. Boost doubles the game speed while fuel lasts;
//! rates are authored per 60 Hz frame and scaled by the real delta time.

use glam::Vec2;

use super::animation::{AnimationTrack, IdleMotion};
use super::entity::{Collidable, Contact, Updatable};
use crate::collider;
use crate::consts::{BOOST_RATE_HZ, PLAYER_BOOST_MAX, PLAYER_BOOST_SPEED, PLAYER_HEALTH_MAX, PLAYER_SIZE};
use crate::is_frozen;
use crate::resources::TextureSet;

/// Boost fuel tuning, picked by trigger name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoostProfile {
    /// Burns fast, refills slowly
    Sprint,
    Aggressive,
    #[default]
    Balanced,
    Generous,
    Endurance,
}

impl BoostProfile {
    /// `"..1"` through `"..5"`; anything else selects nothing
    pub fn from_trigger(trigger: &str) -> Option<Self> {
        match trigger.chars().last()? {
            '1' => Some(BoostProfile::Sprint),
            '2' => Some(BoostProfile::Aggressive),
            '3' => Some(BoostProfile::Balanced),
            '4' => Some(BoostProfile::Generous),
            '5' => Some(BoostProfile::Endurance),
            _ => None,
        }
    }

    /// (depletion, recovery) per frame
    pub fn rates(self) -> (f32, f32) {
        match self {
            BoostProfile::Sprint => (0.4, 0.04),
            BoostProfile::Aggressive => (0.32, 0.1),
            BoostProfile::Balanced => (0.2, 0.1),
            BoostProfile::Generous => (0.2, 0.16),
            BoostProfile::Endurance => (0.1, 0.2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub initial_position: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub health_max: f32,
    pub boost: f32,
    pub boost_max: f32,
    /// Game speed multiplier requested by the player (1 or boost speed)
    pub current_speed: f32,
    pub shield: bool,
    pub profile: BoostProfile,
    pub paused: bool,
    screen_size: Vec2,
    boost_animation: Option<AnimationTrack>,
    idle: IdleMotion,
}

impl Player {
    /// Player at a quarter of the way across, vertically centered
    pub fn new(screen_size: Vec2, boost_frames: TextureSet) -> Self {
        let position = Vec2::new(screen_size.x / 4.0, screen_size.y / 2.0);
        Self {
            position,
            initial_position: position,
            size: Vec2::splat(PLAYER_SIZE),
            health: PLAYER_HEALTH_MAX,
            health_max: PLAYER_HEALTH_MAX,
            boost: PLAYER_BOOST_MAX,
            boost_max: PLAYER_BOOST_MAX,
            current_speed: 1.0,
            shield: true,
            profile: BoostProfile::default(),
            paused: false,
            screen_size,
            boost_animation: AnimationTrack::new("boost", boost_frames),
            idle: IdleMotion::Bob { phase: 0.0 },
        }
    }

    pub fn is_boosting(&self) -> bool {
        self.current_speed > 1.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > f32::EPSILON
    }

    pub fn set_profile(&mut self, trigger: &str) -> bool {
        match BoostProfile::from_trigger(trigger) {
            Some(profile) => {
                self.profile = profile;
                true
            }
            None => false,
        }
    }

    /// Needs some fuel left
    pub fn start_boost(&mut self) {
        if self.is_boosting() || self.boost <= f32::EPSILON {
            return;
        }
        self.current_speed = PLAYER_BOOST_SPEED;
        if let Some(track) = self.boost_animation.as_mut() {
            track.play();
        }
    }

    pub fn stop_boost(&mut self) {
        if !self.is_boosting() {
            return;
        }
        self.current_speed = 1.0;
        if let Some(track) = self.boost_animation.as_mut() {
            track.play();
        }
    }

    /// Vertical move, kept fully on screen
    pub fn move_by(&mut self, dy: f32) {
        let half = self.size.y / 2.0;
        self.position.y = (self.position.y + dy).clamp(half, self.screen_size.y - half);
    }

    pub fn body_radius(&self) -> f32 {
        self.size.x.max(self.size.y) / 2.0
    }

    pub fn contact_mask(&self) -> u32 {
        collider::ENEMY | collider::COLLECTIBLE
    }

    pub fn render_offset(&self) -> Vec2 {
        self.idle.offset()
    }

    pub fn boost_animation(&self) -> Option<&AnimationTrack> {
        self.boost_animation.as_ref()
    }

    fn collided(&mut self) {
        self.health -= 1.0;
        if self.health < 1.0 {
            self.health = 0.0;
            self.shield = false;
            log::info!("Player destroyed");
        } else if self.health < 2.0 {
            self.shield = false;
        }
    }

    fn collected(&mut self) {
        if self.health < self.health_max {
            self.health = (self.health + 1.0).min(self.health_max);
        }
        if self.health >= 2.0 {
            self.shield = true;
        }
    }
}

impl Updatable for Player {
    fn update(&mut self, delta_time: f32, multiplier: f32) {
        self.paused = is_frozen(multiplier);
        if self.paused {
            return;
        }

        let frames = delta_time * BOOST_RATE_HZ;
        let (depletion, recovery) = self.profile.rates();
        if self.is_boosting() && self.boost > f32::EPSILON {
            self.boost = (self.boost - depletion * frames).max(0.0);
        } else if self.is_boosting() {
            self.stop_boost();
        } else if self.boost < self.boost_max {
            self.boost = (self.boost + recovery * frames).min(self.boost_max);
        }

        self.idle.advance(delta_time);
        if let Some(track) = self.boost_animation.as_mut() {
            track.update(delta_time);
        }
    }
}

impl Collidable for Player {
    fn on_collision_begin(&mut self, other: Option<&Contact>) {
        let Some(other) = other else {
            return;
        };
        if !self.is_alive() {
            return;
        }
        if other.category & collider::ENEMY != 0 {
            self.collided();
        } else if other.category & collider::COLLECTIBLE != 0 {
            self.collected();
        }
    }
}
