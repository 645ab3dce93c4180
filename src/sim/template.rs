//! Spawn templates
//!
//! A template is the authoring-time description of one spawnable kind: what
//! it looks like, how big and fast it is, and how often it appears.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::animation::IdleMotion;
use crate::ConfigError;
use crate::consts::{DEFAULT_JITTER_LOWER, DEFAULT_JITTER_UPPER, JITTER_SCALE};

/// Direction of travel across the screen (y points up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Right,
    #[default]
    Left,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Unit vector of travel
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Right => Vec2::X,
            Direction::Left => Vec2::NEG_X,
        }
    }

    /// Component of `v` along the travel axis
    pub fn along(self, v: Vec2) -> f32 {
        if self.is_horizontal() { v.x } else { v.y }
    }
}

/// Looping idle behavior started when an entity spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleAction {
    #[default]
    None,
    Bob,
}

impl IdleAction {
    pub fn motion(self) -> IdleMotion {
        match self {
            IdleAction::None => IdleMotion::Still,
            IdleAction::Bob => IdleMotion::Bob { phase: 0.0 },
        }
    }
}

fn default_jitter_upper() -> f32 {
    DEFAULT_JITTER_UPPER
}

fn default_jitter_lower() -> f32 {
    DEFAULT_JITTER_LOWER
}

/// Immutable description of one spawnable entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTemplate {
    /// Base texture name, also the lookup key for the entity's visuals
    pub visual_key: String,
    /// Width and height in screen units
    pub extent: Vec2,
    /// Travel speed (units/second)
    pub speed: f32,
    /// Mean seconds between spawns before jitter
    pub base_interval: f32,
    #[serde(default = "default_jitter_upper")]
    pub jitter_upper: f32,
    #[serde(default = "default_jitter_lower")]
    pub jitter_lower: f32,
    /// Collision category bits (also used as the contact mask)
    pub collision_tag: u32,
    #[serde(default)]
    pub idle_action: IdleAction,
    /// Texture groups animated on the entity; the first one plays at spawn
    #[serde(default)]
    pub animation_keys: Option<Vec<String>>,
    #[serde(default)]
    pub direction: Direction,
}

impl SpawnTemplate {
    pub fn new(
        visual_key: impl Into<String>,
        extent: Vec2,
        speed: f32,
        base_interval: f32,
        collision_tag: u32,
    ) -> Self {
        Self {
            visual_key: visual_key.into(),
            extent,
            speed,
            base_interval,
            jitter_upper: DEFAULT_JITTER_UPPER,
            jitter_lower: DEFAULT_JITTER_LOWER,
            collision_tag,
            idle_action: IdleAction::None,
            animation_keys: None,
            direction: Direction::Left,
        }
    }

    pub fn with_idle_action(mut self, idle_action: IdleAction) -> Self {
        self.idle_action = idle_action;
        self
    }

    pub fn with_animations<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.animation_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_jitter(mut self, upper: f32, lower: f32) -> Self {
        self.jitter_upper = upper;
        self.jitter_lower = lower;
        self
    }

    /// Check the authoring invariants for the template registered as `kind`
    pub fn validate(&self, kind: u32) -> Result<(), ConfigError> {
        if !(self.base_interval.is_finite() && self.base_interval > 0.0) {
            return Err(ConfigError::NonPositiveInterval {
                kind,
                value: self.base_interval,
            });
        }
        if !(self.extent.x > 0.0 && self.extent.y > 0.0) {
            return Err(ConfigError::NonPositiveExtent {
                what: format!("template {} ('{}')", kind, self.visual_key),
                width: self.extent.x,
                height: self.extent.y,
            });
        }
        if !(self.speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed {
                what: format!("template {} ('{}')", kind, self.visual_key),
                value: self.speed,
            });
        }
        let finite = self.jitter_upper.is_finite() && self.jitter_lower.is_finite();
        if !(finite && self.jitter_upper >= 0.0 && self.jitter_lower >= 0.0) {
            return Err(ConfigError::NegativeJitter {
                kind,
                upper: self.jitter_upper,
                lower: self.jitter_lower,
            });
        }
        Ok(())
    }

    /// Draw the countdown that follows a spawn attempt
    pub fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.base_interval * jitter(self.jitter_upper, self.jitter_lower, rng)
    }

    /// Smallest and largest interval `next_interval` can produce
    pub fn interval_bounds(&self) -> (f32, f32) {
        let lo = self.jitter_lower * JITTER_SCALE + self.jitter_lower;
        let hi = (self.jitter_upper + self.jitter_lower) * JITTER_SCALE + self.jitter_lower;
        (self.base_interval * lo, self.base_interval * hi)
    }
}

/// Interval scaling factor: `(uniform[0, upper) + lower) * 0.1 + lower`.
///
/// The lower bound is applied twice; with the defaults (3, 1) the factor
/// lands in [1.1, 1.4).
pub fn jitter<R: Rng + ?Sized>(upper: f32, lower: f32, rng: &mut R) -> f32 {
    let roll = if upper > 0.0 {
        rng.random_range(0.0..upper)
    } else {
        0.0
    };
    (roll + lower) * JITTER_SCALE + lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn mine() -> SpawnTemplate {
        SpawnTemplate::new("enemy_mine", Vec2::new(40.0, 40.0), 250.0, 0.8, collider::ENEMY)
    }

    #[test]
    fn test_jitter_default_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let j = jitter(DEFAULT_JITTER_UPPER, DEFAULT_JITTER_LOWER, &mut rng);
            assert!(j >= 1.1 - 1e-6 && j <= 1.4 + 1e-6, "jitter {} out of range", j);
        }
    }

    #[test]
    fn test_jitter_zero_upper() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!((jitter(0.0, 1.0, &mut rng) - 1.1).abs() < 1e-6);
        assert_eq!(jitter(0.0, 0.0, &mut rng), 0.0);
    }

    #[test]
    fn test_interval_bounds() {
        let (lo, hi) = mine().interval_bounds();
        assert!((lo - 0.88).abs() < 1e-5);
        assert!((hi - 1.12).abs() < 1e-5);

        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..500 {
            let interval = mine().next_interval(&mut rng);
            assert!(interval >= lo - 1e-5 && interval <= hi + 1e-5);
        }
    }

    #[test]
    fn test_validate() {
        assert!(mine().validate(0).is_ok());

        let mut t = mine();
        t.base_interval = 0.0;
        assert!(matches!(t.validate(0), Err(ConfigError::NonPositiveInterval { .. })));

        let mut t = mine();
        t.extent = Vec2::new(40.0, 0.0);
        assert!(matches!(t.validate(1), Err(ConfigError::NonPositiveExtent { .. })));

        let t = mine().with_jitter(-1.0, 1.0);
        assert!(matches!(t.validate(2), Err(ConfigError::NegativeJitter { .. })));

        let mut t = mine();
        t.speed = 0.0;
        assert!(matches!(t.validate(3), Err(ConfigError::NonPositiveSpeed { .. })));
    }

    #[test]
    fn test_validate_rejects_infinite_timing() {
        let t = mine().with_jitter(f32::INFINITY, 1.0);
        assert!(matches!(t.validate(0), Err(ConfigError::NegativeJitter { .. })));

        let t = mine().with_jitter(3.0, f32::INFINITY);
        assert!(matches!(t.validate(0), Err(ConfigError::NegativeJitter { .. })));

        let mut t = mine();
        t.base_interval = f32::INFINITY;
        assert!(matches!(t.validate(0), Err(ConfigError::NonPositiveInterval { .. })));

        let mut t = mine();
        t.base_interval = f32::NAN;
        assert!(matches!(t.validate(0), Err(ConfigError::NonPositiveInterval { .. })));
    }

    #[test]
    fn test_template_json_defaults() {
        let json = r#"{
            "visual_key": "point",
            "extent": [20.0, 20.0],
            "speed": 300.0,
            "base_interval": 15.0,
            "collision_tag": 4,
            "idle_action": "bob",
            "animation_keys": ["point"]
        }"#;
        let t: SpawnTemplate = serde_json::from_str(json).expect("template json");
        assert_eq!(t.jitter_upper, DEFAULT_JITTER_UPPER);
        assert_eq!(t.jitter_lower, DEFAULT_JITTER_LOWER);
        assert_eq!(t.direction, Direction::Left);
        assert_eq!(t.idle_action, IdleAction::Bob);
    }

    #[test]
    fn test_direction_axes() {
        assert!(Direction::Left.is_horizontal());
        assert!(!Direction::Up.is_horizontal());
        assert_eq!(Direction::Down.unit(), Vec2::NEG_Y);
        assert_eq!(Direction::Up.along(Vec2::new(3.0, 4.0)), 4.0);
    }
}
