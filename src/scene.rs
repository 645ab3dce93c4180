//! Draw list composition
//!
//! Flattens a [`GameState`] into sprites sorted back to front. Tiles and
//! strips carry their layer depth in their own z; the stack offset is added
//! here and nowhere else.

use std::sync::Arc;

use glam::Vec2;

use crate::Color;
use crate::resources::Texture;
use crate::sim::entity::{ParallaxObject, Spawned};
use crate::sim::state::GameState;

/// z of the shield drawn over the player
const SHIELD_Z: f32 = 2.0;
/// Shield size relative to the ship
const SHIELD_SCALE: f32 = 1.5;

/// One sprite (or flat colored rectangle when `texture` is `None`)
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub texture: Option<Arc<Texture>>,
    /// Flat color, or the tint blended into the texture
    pub color: Color,
    /// Blend factor for `color` over the texture (0 = untinted)
    pub tint: f32,
    pub position: Vec2,
    pub size: Vec2,
    pub anchor_point: Vec2,
    pub z: f32,
    pub alpha: f32,
}

fn entity_item(object: &ParallaxObject) -> DrawItem {
    DrawItem {
        texture: Some(object.current_texture().clone()),
        color: Color::WHITE,
        tint: 0.0,
        position: object.position() + object.render_offset(),
        size: object.extent(),
        anchor_point: Vec2::splat(0.5),
        z: 0.0,
        alpha: object.alpha(),
    }
}

/// Everything visible this frame, sorted by composed z (stable within a z)
pub fn draw_list(state: &GameState) -> Vec<DrawItem> {
    let mut items = Vec::new();

    let base = state.parallax.z_offset();
    for layer in state.parallax.layers() {
        for strip in layer.borders() {
            items.push(DrawItem {
                texture: None,
                color: strip.color,
                tint: 0.0,
                position: strip.position,
                size: strip.size,
                anchor_point: strip.anchor_point,
                z: base + strip.z,
                alpha: 1.0,
            });
        }
        for tile in layer.tiles() {
            let (color, tint) = tile.tint.map_or((Color::WHITE, 0.0), |t| (t.color, t.strength));
            items.push(DrawItem {
                texture: Some(tile.texture.clone()),
                color,
                tint,
                position: tile.position,
                size: tile.size(),
                anchor_point: tile.anchor_point,
                z: base + tile.z,
                alpha: 1.0,
            });
        }
    }

    items.extend(state.enemies.entities().iter().map(|e| entity_item(e.object())));
    items.extend(state.collectibles.entities().iter().map(|c| entity_item(c.object())));

    let player = &state.player;
    if player.is_alive() {
        let position = player.position + player.render_offset();
        let texture = player
            .boost_animation()
            .filter(|track| track.is_playing() || !track.is_at_start())
            .map(|track| track.current_frame().clone())
            .unwrap_or_else(|| state.player_texture.clone());
        items.push(DrawItem {
            texture: Some(texture),
            color: Color::WHITE,
            tint: 0.0,
            position,
            size: player.size,
            anchor_point: Vec2::splat(0.5),
            z: 0.0,
            alpha: 1.0,
        });
        if let Some(shield) = state.shield_texture.as_ref().filter(|_| player.shield) {
            items.push(DrawItem {
                texture: Some(shield.clone()),
                color: Color::WHITE,
                tint: 0.0,
                position,
                size: player.size * SHIELD_SCALE,
                anchor_point: Vec2::splat(0.5),
                z: SHIELD_Z,
                alpha: 1.0,
            });
        }
    }

    items.sort_by(|a, b| a.z.total_cmp(&b.z));
    items
}
