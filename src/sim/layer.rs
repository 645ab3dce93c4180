//! Parallax layers
//!
//! A layer keeps a bounded pool of textured tiles scrolling across the
//! screen. New tiles are throttled by a countdown sized so consecutive tiles
//! sit one tile (plus a configurable gap) apart; tiles are recycled once they
//! have fully cleared the far edge. Layers may also sway on the cross axis.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::template::Direction;
use crate::consts::{CENTER_OFFSET_STEP, CENTER_OFFSET_STEPS, MAX_LAYERS_PER_NODE, NOMINAL_FRAME_TIME};
use crate::error::ConfigError;
use crate::resources::{Texture, TextureSet};
use crate::{Color, is_frozen};

/// Where tiles sit on the cross axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Center,
    #[default]
    Bottom,
}

fn default_capacity() -> usize {
    1
}

/// Authoring description of one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Atlas the texture group is first resolved from
    pub atlas: String,
    pub texture_group: String,
    /// Units/second
    pub scroll_speed: f32,
    /// Higher is nearer
    pub depth_order: f32,
    #[serde(default = "default_capacity")]
    pub max_concurrent_tiles: usize,
    #[serde(default)]
    pub color_tint: Color,
    #[serde(default)]
    pub color_tint_strength: f32,
    #[serde(default)]
    pub anchor: Anchor,
    /// Distance from the anchored edge; also the border strip thickness
    #[serde(default)]
    pub edge_inset: f32,
    #[serde(default)]
    pub scroll_direction: Direction,
    #[serde(default)]
    pub oscillation_amplitude: f32,
    #[serde(default)]
    pub oscillation_speed: f32,
    /// Extra spacing between tiles, as a fraction of the tile length
    #[serde(default)]
    pub spawn_gap_factor: f32,
    #[serde(default)]
    pub border_tint: Color,
}

impl LayerConfig {
    pub fn new(atlas: impl Into<String>, texture_group: impl Into<String>, scroll_speed: f32, depth_order: f32) -> Self {
        Self {
            atlas: atlas.into(),
            texture_group: texture_group.into(),
            scroll_speed,
            depth_order,
            max_concurrent_tiles: 1,
            color_tint: Color::CLEAR,
            color_tint_strength: 0.0,
            anchor: Anchor::Bottom,
            edge_inset: 0.0,
            scroll_direction: Direction::Left,
            oscillation_amplitude: 0.0,
            oscillation_speed: 0.0,
            spawn_gap_factor: 0.0,
            border_tint: Color::CLEAR,
        }
    }

    pub fn with_capacity(mut self, max_concurrent_tiles: usize) -> Self {
        self.max_concurrent_tiles = max_concurrent_tiles;
        self
    }

    pub fn with_tint(mut self, color: Color, strength: f32) -> Self {
        self.color_tint = color;
        self.color_tint_strength = strength;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor, edge_inset: f32) -> Self {
        self.anchor = anchor;
        self.edge_inset = edge_inset;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.scroll_direction = direction;
        self
    }

    pub fn with_oscillation(mut self, amplitude: f32, speed: f32) -> Self {
        self.oscillation_amplitude = amplitude;
        self.oscillation_speed = speed;
        self
    }

    pub fn with_gap(mut self, spawn_gap_factor: f32) -> Self {
        self.spawn_gap_factor = spawn_gap_factor;
        self
    }

    pub fn with_border(mut self, border_tint: Color) -> Self {
        self.border_tint = border_tint;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scroll_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed {
                what: format!("layer '{}'", self.texture_group),
                value: self.scroll_speed,
            });
        }
        if self.max_concurrent_tiles < 1 {
            return Err(ConfigError::NoTileCapacity {
                group: self.texture_group.clone(),
            });
        }
        if !(0.0..=1.0).contains(&self.color_tint_strength) {
            return Err(ConfigError::TintStrengthOutOfRange {
                group: self.texture_group.clone(),
                value: self.color_tint_strength,
            });
        }
        Ok(())
    }

    /// Local z of this layer's tiles
    pub fn tile_z(&self) -> f32 {
        self.depth_order * MAX_LAYERS_PER_NODE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: Color,
    pub strength: f32,
}

/// One scrolling sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub texture: Arc<Texture>,
    /// Location of the anchor point
    pub position: Vec2,
    /// Fraction of the size the position refers to ((0, 0) = bottom left)
    pub anchor_point: Vec2,
    /// Local z, before the layer offset
    pub z: f32,
    pub tint: Option<Tint>,
}

impl Tile {
    pub fn size(&self) -> Vec2 {
        self.texture.size
    }
}

/// A static colored strip along the anchored edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStrip {
    pub position: Vec2,
    pub size: Vec2,
    pub anchor_point: Vec2,
    pub color: Color,
    pub z: f32,
}

/// Cross-axis sway shared by every tile of a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    accumulated: f32,
    direction: f32,
    per_tick_offset: f32,
    lower: f32,
    upper: f32,
}

impl Oscillation {
    /// Centered layers swing `amplitude / 2` both ways; edge layers swing
    /// `[0, amplitude]` away from their edge
    pub fn new(amplitude: f32, anchor: Anchor) -> Self {
        let amplitude = amplitude.max(0.0);
        let (lower, upper) = match anchor {
            Anchor::Center => (-amplitude / 2.0, amplitude / 2.0),
            Anchor::Top | Anchor::Bottom => (0.0, amplitude),
        };
        Self {
            accumulated: 0.0,
            direction: 1.0,
            per_tick_offset: 0.0,
            lower,
            upper,
        }
    }

    pub fn offset(&self) -> f32 {
        self.accumulated
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.lower, self.upper)
    }

    /// Step toward the current bound; clamp and turn around on crossing one.
    /// Returns how far the offset actually moved.
    pub fn advance(&mut self, speed: f32, delta_time: f32, multiplier: f32) -> f32 {
        self.per_tick_offset = speed * delta_time;
        let before = self.accumulated;
        self.accumulated += self.direction * self.per_tick_offset * multiplier;
        if self.accumulated > self.upper {
            self.accumulated = self.upper;
            self.direction = -1.0;
        } else if self.accumulated < self.lower {
            self.accumulated = self.lower;
            self.direction = 1.0;
        }
        self.accumulated - before
    }
}

pub struct ParallaxLayer {
    config: LayerConfig,
    screen_size: Vec2,
    atlas: String,
    textures: TextureSet,
    tiles: Vec<Tile>,
    borders: Vec<BorderStrip>,
    spawn_countdown: f32,
    average_frame_time: f32,
    oscillation: Oscillation,
    rng: Pcg32,
    spawned: usize,
    recycled: usize,
}

impl ParallaxLayer {
    pub fn new(config: LayerConfig, screen_size: Vec2, textures: TextureSet, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(screen_size.x > 0.0 && screen_size.y > 0.0) {
            return Err(ConfigError::NonPositiveExtent {
                what: format!("screen for layer '{}'", config.texture_group),
                width: screen_size.x,
                height: screen_size.y,
            });
        }
        if textures.is_empty() {
            return Err(ConfigError::EmptyTextureGroup {
                atlas: config.atlas.clone(),
                group: config.texture_group.clone(),
            });
        }

        let borders = border_strips(&config, screen_size);
        let oscillation = Oscillation::new(config.oscillation_amplitude, config.anchor);
        Ok(Self {
            atlas: config.atlas.clone(),
            config,
            screen_size,
            textures,
            tiles: Vec::new(),
            borders,
            spawn_countdown: 0.0,
            average_frame_time: NOMINAL_FRAME_TIME,
            oscillation,
            rng: Pcg32::seed_from_u64(seed),
            spawned: 0,
            recycled: 0,
        })
    }

    /// Advance one tick. A frozen multiplier skips everything, including the
    /// frame-time filter and the spawn countdown.
    pub fn update(&mut self, delta_time: f32, multiplier: f32) {
        if is_frozen(multiplier) {
            return;
        }

        self.average_frame_time = ((self.average_frame_time + delta_time) / 2.0).max(NOMINAL_FRAME_TIME);

        if self.spawn_countdown > 0.0 {
            self.spawn_countdown -= delta_time;
        } else if self.tiles.len() < self.config.max_concurrent_tiles {
            let tile = self.next_tile();
            let length = self.config.scroll_direction.along(tile.size());
            self.spawn_countdown = spawn_gap(
                length,
                self.config.spawn_gap_factor,
                self.config.scroll_speed,
                self.average_frame_time,
            );
            self.tiles.push(tile);
            self.spawned += 1;
        }

        let sway = if self.config.oscillation_speed > f32::EPSILON {
            self.oscillation.advance(self.config.oscillation_speed, delta_time, multiplier)
        } else {
            0.0
        };

        let direction = self.config.scroll_direction;
        let scroll = direction.unit() * (self.config.scroll_speed * delta_time * multiplier);
        let cross = cross_axis(direction) * sway;
        let screen = self.screen_size;
        let before = self.tiles.len();
        self.tiles.retain_mut(|tile| {
            tile.position += cross + scroll;
            !tile_past_exit(direction, tile.position, tile.size(), screen)
        });
        self.recycled += before - self.tiles.len();
    }

    fn next_tile(&mut self) -> Tile {
        let index = self.rng.random_range(0..self.textures.len());
        let texture = self.textures[index].clone();
        let size = texture.size;
        let (position, anchor_point) = self.start_position(size);

        let tint = (self.config.color_tint_strength > f32::EPSILON).then_some(Tint {
            color: self.config.color_tint,
            strength: self.config.color_tint_strength,
        });

        Tile {
            texture,
            position,
            anchor_point,
            z: self.config.tile_z(),
            tint,
        }
    }

    /// Off-screen spot on the leading edge for a tile of `size`
    fn start_position(&mut self, size: Vec2) -> (Vec2, Vec2) {
        let screen = self.screen_size;
        let inset = self.config.edge_inset;
        let sway = self.oscillation.offset();

        match self.config.scroll_direction {
            Direction::Left | Direction::Right => {
                let (y, anchor_point) = match self.config.anchor {
                    Anchor::Top => (screen.y - inset, Vec2::new(0.5, 1.0)),
                    Anchor::Bottom => (inset, Vec2::new(0.5, 0.0)),
                    Anchor::Center => {
                        let steps = self.rng.random_range(0..CENTER_OFFSET_STEPS) as f32;
                        let sign = if self.rng.random_bool(0.5) { -1.0 } else { 1.0 };
                        let offset = sign * steps * CENTER_OFFSET_STEP * inset;
                        (screen.y / 2.0 + offset, Vec2::new(0.5, 0.5))
                    }
                };
                let x = if self.config.scroll_direction == Direction::Left {
                    screen.x + size.x
                } else {
                    -size.x
                };
                (Vec2::new(x, y + sway), anchor_point)
            }
            Direction::Up => (Vec2::new(screen.x / 2.0 + sway, -size.y), Vec2::splat(0.5)),
            Direction::Down => (Vec2::new(screen.x / 2.0 + sway, screen.y + size.y), Vec2::splat(0.5)),
        }
    }

    /// Swap the texture set for future tiles. Tiles already on screen keep
    /// theirs. An empty set is refused.
    pub fn set_textures(&mut self, atlas: &str, textures: TextureSet) -> bool {
        if textures.is_empty() {
            log::warn!(
                "Layer '{}': no textures in '{}', keeping '{}'",
                self.config.texture_group,
                atlas,
                self.atlas
            );
            return false;
        }
        self.atlas = atlas.to_string();
        self.textures = textures;
        true
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Atlas the current texture set came from
    pub fn atlas(&self) -> &str {
        &self.atlas
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn borders(&self) -> &[BorderStrip] {
        &self.borders
    }

    pub fn spawn_countdown(&self) -> f32 {
        self.spawn_countdown
    }

    pub fn average_frame_time(&self) -> f32 {
        self.average_frame_time
    }

    pub fn oscillation(&self) -> &Oscillation {
        &self.oscillation
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn recycled_count(&self) -> usize {
        self.recycled
    }
}

/// Seconds until the next tile: the time to scroll `length * (1 + gap)`.
///
/// Kept in its per-frame form; `avg_dt` cancels out.
pub fn spawn_gap(length: f32, gap: f32, speed: f32, avg_dt: f32) -> f32 {
    let per_frame = speed * avg_dt;
    length * (1.0 + gap) / per_frame * avg_dt
}

fn cross_axis(direction: Direction) -> Vec2 {
    if direction.is_horizontal() { Vec2::Y } else { Vec2::X }
}

fn tile_past_exit(direction: Direction, position: Vec2, size: Vec2, screen: Vec2) -> bool {
    match direction {
        Direction::Left => position.x < -size.x,
        Direction::Right => position.x > screen.x + size.x,
        Direction::Up => position.y > screen.y + size.y,
        Direction::Down => position.y < -size.y,
    }
}

fn border_strips(config: &LayerConfig, screen: Vec2) -> Vec<BorderStrip> {
    if config.border_tint.is_clear() {
        return Vec::new();
    }

    let inset = config.edge_inset;
    let strip = |position: Vec2, size: Vec2, anchor_point: Vec2| BorderStrip {
        position,
        size,
        anchor_point,
        color: config.border_tint,
        z: config.tile_z() + 1.0,
    };

    let (low, high) = if config.scroll_direction.is_horizontal() {
        let size = Vec2::new(screen.x, inset);
        (
            strip(Vec2::new(screen.x / 2.0, 0.0), size, Vec2::new(0.5, 0.0)),
            strip(Vec2::new(screen.x / 2.0, screen.y), size, Vec2::new(0.5, 1.0)),
        )
    } else {
        let size = Vec2::new(inset, screen.y);
        (
            strip(Vec2::new(0.0, screen.y / 2.0), size, Vec2::new(0.0, 0.5)),
            strip(Vec2::new(screen.x, screen.y / 2.0), size, Vec2::new(1.0, 0.5)),
        )
    };

    match config.anchor {
        Anchor::Bottom => vec![low],
        Anchor::Top => vec![high],
        Anchor::Center => vec![low, high],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn textures(sizes: &[(f32, f32)], atlas: &str) -> TextureSet {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                Arc::new(Texture {
                    atlas: atlas.into(),
                    name: format!("ground_{:02}", i + 1),
                    size: Vec2::new(w, h),
                })
            })
            .collect()
    }

    fn layer(config: LayerConfig) -> ParallaxLayer {
        ParallaxLayer::new(config, SCREEN, textures(&[(100.0, 40.0), (160.0, 60.0)], "Desert"), 17).expect("layer")
    }

    fn ground() -> LayerConfig {
        LayerConfig::new("Desert", "ground", 200.0, 1.0).with_capacity(3)
    }

    #[test]
    fn test_rejects_bad_config() {
        let t = textures(&[(100.0, 40.0)], "Desert");
        let zero = LayerConfig::new("Desert", "ground", 200.0, 1.0).with_capacity(0);
        assert!(matches!(
            ParallaxLayer::new(zero, SCREEN, t.clone(), 1),
            Err(ConfigError::NoTileCapacity { .. })
        ));

        let tint = ground().with_tint(Color::RED, 1.5);
        assert!(matches!(
            ParallaxLayer::new(tint, SCREEN, t.clone(), 1),
            Err(ConfigError::TintStrengthOutOfRange { .. })
        ));

        let still = LayerConfig::new("Desert", "ground", 0.0, 1.0);
        assert!(matches!(
            ParallaxLayer::new(still, SCREEN, t, 1),
            Err(ConfigError::NonPositiveSpeed { .. })
        ));

        assert!(matches!(
            ParallaxLayer::new(ground(), SCREEN, Vec::new(), 1),
            Err(ConfigError::EmptyTextureGroup { .. })
        ));
    }

    #[test]
    fn test_spawn_gap_cancels_frame_time() {
        for avg in [1.0 / 60.0, 1.0 / 30.0, 0.25] {
            let t = spawn_gap(100.0, 0.5, 200.0, avg);
            assert!((t - 0.75).abs() < 1e-5, "avg {} gave {}", avg, t);
        }
    }

    #[test]
    fn test_first_tick_spawns_and_sets_countdown() {
        let mut l = layer(ground().with_gap(0.2));
        l.update(1.0 / 60.0, 1.0);
        assert_eq!(l.tiles().len(), 1);
        let width = l.tiles()[0].size().x;
        assert!((l.spawn_countdown() - width * 1.2 / 200.0).abs() < 1e-5);
        assert_eq!(l.tiles()[0].z, 5.0);
    }

    #[test]
    fn test_left_tiles_enter_and_leave_fully_off_screen() {
        let mut l = layer(ground().with_capacity(1));
        l.update(0.001, 1.0);
        let tile = l.tiles()[0].clone();
        let w = tile.size().x;
        assert!((tile.position.x - (SCREEN.x + w - 0.2)).abs() < 1e-3);

        let mut ticks = 0;
        while l.recycled_count() == 0 {
            let last = l.tiles()[0].position.x;
            l.update(0.01, 1.0);
            ticks += 1;
            assert!(ticks < 10_000);
            if l.recycled_count() == 0 {
                assert!(l.tiles()[0].position.x >= -w, "tile kept past the edge at {}", last);
            }
        }
    }

    #[test]
    fn test_anchor_positions() {
        let mut top = layer(ground().with_anchor(Anchor::Top, 10.0));
        top.update(0.0, 1.0);
        assert_eq!(top.tiles()[0].position.y, SCREEN.y - 10.0);
        assert_eq!(top.tiles()[0].anchor_point, Vec2::new(0.5, 1.0));

        let mut bottom = layer(ground().with_anchor(Anchor::Bottom, 10.0));
        bottom.update(0.0, 1.0);
        assert_eq!(bottom.tiles()[0].position.y, 10.0);

        let mut center = layer(ground().with_anchor(Anchor::Center, 50.0).with_capacity(1));
        for _ in 0..200 {
            center.update(0.05, 1.0);
            if let Some(tile) = center.tiles().first() {
                let offset = (tile.position.y - SCREEN.y / 2.0).abs();
                assert!(offset <= 1.9 * 50.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_right_and_vertical_spawn_edges() {
        let mut right = layer(ground().with_direction(Direction::Right));
        right.update(0.0, 1.0);
        let t = &right.tiles()[0];
        assert_eq!(t.position.x, -t.size().x);

        let mut up = layer(ground().with_direction(Direction::Up));
        up.update(0.0, 1.0);
        let t = &up.tiles()[0];
        assert_eq!(t.position, Vec2::new(SCREEN.x / 2.0, -t.size().y));

        let mut down = layer(ground().with_direction(Direction::Down));
        down.update(0.0, 1.0);
        let t = &down.tiles()[0];
        assert_eq!(t.position.y, SCREEN.y + t.size().y);
    }

    #[test]
    fn test_tint_only_when_strength_set() {
        let mut plain = layer(ground());
        plain.update(0.0, 1.0);
        assert!(plain.tiles()[0].tint.is_none());

        let mut tinted = layer(ground().with_tint(Color::BLACK, 0.4));
        tinted.update(0.0, 1.0);
        assert_eq!(
            tinted.tiles()[0].tint,
            Some(Tint {
                color: Color::BLACK,
                strength: 0.4
            })
        );
    }

    #[test]
    fn test_border_strips() {
        let border = Color::from_rgb8(208, 100, 90);

        let l = layer(ground().with_anchor(Anchor::Bottom, 10.0).with_border(border));
        assert_eq!(l.borders().len(), 1);
        let b = l.borders()[0];
        assert_eq!(b.size, Vec2::new(SCREEN.x, 10.0));
        assert_eq!(b.position, Vec2::new(SCREEN.x / 2.0, 0.0));
        assert_eq!(b.z, 6.0);

        let l = layer(ground().with_anchor(Anchor::Center, 10.0).with_border(border));
        assert_eq!(l.borders().len(), 2);

        let l = layer(ground().with_anchor(Anchor::Top, 12.0).with_direction(Direction::Up).with_border(border));
        let b = l.borders()[0];
        assert_eq!(b.size, Vec2::new(12.0, SCREEN.y));
        assert_eq!(b.anchor_point, Vec2::new(1.0, 0.5));

        assert!(layer(ground()).borders().is_empty());
    }

    #[test]
    fn test_borders_do_not_use_tile_capacity() {
        let mut l = layer(
            ground()
                .with_capacity(1)
                .with_anchor(Anchor::Bottom, 10.0)
                .with_border(Color::WHITE),
        );
        l.update(0.0, 1.0);
        assert_eq!(l.tiles().len(), 1);
        let strip = l.borders()[0];
        for _ in 0..500 {
            l.update(0.02, 1.0);
        }
        assert_eq!(l.borders()[0], strip);
    }

    #[test]
    fn test_oscillation_reverses_at_bounds() {
        let mut osc = Oscillation::new(10.0, Anchor::Bottom);
        assert_eq!(osc.bounds(), (0.0, 10.0));

        let mut moved = 0.0;
        for _ in 0..6 {
            moved += osc.advance(2.0, 1.0, 1.0);
        }
        // 2, 4, 6, 8, 10, clamp at 10 and turn
        assert_eq!(osc.offset(), 10.0);
        assert_eq!(osc.direction(), -1.0);
        assert_eq!(moved, 10.0);

        let mut osc = Oscillation::new(10.0, Anchor::Center);
        assert_eq!(osc.bounds(), (-5.0, 5.0));
        for _ in 0..4 {
            osc.advance(2.0, 1.0, 1.0);
        }
        assert_eq!(osc.direction(), -1.0);
        // 3 -> 1, -1, -3, -5, -7 clamped to -5
        for _ in 0..5 {
            osc.advance(2.0, 1.0, 1.0);
        }
        assert_eq!(osc.offset(), -5.0);
        assert_eq!(osc.direction(), 1.0);
    }

    #[test]
    fn test_oscillation_moves_tiles_on_cross_axis() {
        let mut l = layer(ground().with_oscillation(10.0, 60.0).with_anchor(Anchor::Bottom, 0.0));
        l.update(1.0 / 60.0, 1.0);
        // Spawned at the offset before this tick's sway, then swayed with it
        let tile = &l.tiles()[0];
        assert!((tile.position.y - l.oscillation().offset()).abs() < 1e-4);

        for _ in 0..100 {
            l.update(1.0 / 60.0, 1.0);
            for tile in l.tiles() {
                assert!(tile.position.y >= -1e-3 && tile.position.y <= 10.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_zero_multiplier_freezes_layer() {
        let mut l = layer(ground().with_oscillation(10.0, 2.0));
        for _ in 0..30 {
            l.update(1.0 / 60.0, 1.0);
        }
        let tiles = l.tiles().to_vec();
        let countdown = l.spawn_countdown();
        let avg = l.average_frame_time();
        let osc = *l.oscillation();

        for _ in 0..100 {
            l.update(0.25, 0.0);
        }
        assert_eq!(l.tiles(), tiles.as_slice());
        assert_eq!(l.spawn_countdown(), countdown);
        assert_eq!(l.average_frame_time(), avg);
        assert_eq!(*l.oscillation(), osc);
    }

    #[test]
    fn test_soft_texture_switch() {
        let mut l = layer(ground().with_capacity(3));
        for _ in 0..40 {
            l.update(1.0 / 60.0, 1.0);
        }
        let old: Vec<_> = l.tiles().to_vec();
        assert!(!old.is_empty());

        assert!(!l.set_textures("Tundra", Vec::new()));
        assert_eq!(l.atlas(), "Desert");

        assert!(l.set_textures("Tundra", textures(&[(120.0, 50.0)], "Tundra")));
        assert_eq!(l.atlas(), "Tundra");
        for tile in l.tiles() {
            assert_eq!(tile.texture.atlas, "Desert");
        }

        let before = l.spawned_count();
        while l.spawned_count() == before {
            l.update(1.0 / 60.0, 1.0);
        }
        let newest = l.tiles().last().expect("new tile");
        assert_eq!(newest.texture.atlas, "Tundra");
    }

    proptest! {
        #[test]
        fn test_tile_pool_bounded(
            capacity in 1usize..5,
            gap in 0.0f32..2.0,
            ticks in proptest::collection::vec((0.0f32..0.1, 0.0f32..3.0), 1..400),
        ) {
            let mut l = layer(ground().with_capacity(capacity).with_gap(gap));
            for (dt, multiplier) in ticks {
                l.update(dt, multiplier);
                prop_assert!(l.tiles().len() <= capacity);
            }
        }

        #[test]
        fn test_oscillation_within_bounds(
            amplitude in 0.0f32..100.0,
            center in any::<bool>(),
            steps in proptest::collection::vec((0.0f32..50.0, 0.0f32..0.2, 0.0f32..3.0), 1..300),
        ) {
            let anchor = if center { Anchor::Center } else { Anchor::Top };
            let mut osc = Oscillation::new(amplitude, anchor);
            let (lower, upper) = osc.bounds();
            for (speed, dt, multiplier) in steps {
                osc.advance(speed, dt, multiplier);
                prop_assert!(osc.offset() >= lower && osc.offset() <= upper);
            }
        }

        #[test]
        fn test_pause_leaves_no_trace(
            warmup in 0usize..60,
            paused in 1usize..60,
            resumed in 1usize..120,
        ) {
            let config = ground().with_oscillation(20.0, 5.0).with_anchor(Anchor::Center, 30.0);
            let dt = 1.0 / 60.0;
            let mut a = layer(config.clone());
            let mut b = layer(config);
            for _ in 0..warmup {
                a.update(dt, 1.0);
                b.update(dt, 1.0);
            }
            for _ in 0..paused {
                a.update(dt, 0.0);
            }
            for _ in 0..resumed {
                a.update(dt, 1.0);
                b.update(dt, 1.0);
            }
            prop_assert_eq!(a.tiles(), b.tiles());
            prop_assert_eq!(a.spawn_countdown(), b.spawn_countdown());
            prop_assert_eq!(a.oscillation(), b.oscillation());
        }
    }
}
