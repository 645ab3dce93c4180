//! Per-frame simulation tick
//!
//! Applies input, works out the frame's time multiplier and drives every
//! component with it, then resolves contacts.

use super::collision::{Body, BodyId, ContactEvent};
use super::entity::{Collidable, Contact, Updatable};
use super::state::{GameEvent, GamePhase, GameState};
use crate::is_frozen;
use crate::resources::TextureProvider;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Start (`true`) or stop (`false`) boosting
    pub boost: Option<bool>,
    /// Vertical player movement this tick
    pub move_y: Option<f32>,
    /// Atlas to switch the parallax background to
    pub switch_texture_set: Option<String>,
    /// Boost tuning trigger (name ending in 1-5)
    pub boost_profile: Option<String>,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, provider: &mut dyn TextureProvider, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    if let Some(atlas) = &input.switch_texture_set {
        let layers = state.parallax.switch_texture_set(atlas, provider);
        state.events.push(GameEvent::TextureSetSwitched {
            atlas: atlas.clone(),
            layers,
        });
    }

    if state.phase == GamePhase::Playing {
        if let Some(trigger) = &input.boost_profile {
            state.player.set_profile(trigger);
        }
        match input.boost {
            Some(true) => state.player.start_boost(),
            Some(false) => state.player.stop_boost(),
            None => {}
        }
        if let Some(dy) = input.move_y {
            state.player.move_by(dy);
        }
    }

    if !state.player.is_alive() && state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }

    let multiplier = state.multiplier();

    // Update game objects
    state.player.update(dt, multiplier);
    let target = state.player.is_alive().then_some(state.player.position);
    state.enemies.track(target);
    state.enemies.update(dt, multiplier);
    state.collectibles.update(dt, multiplier);
    state.parallax.update(dt, multiplier);

    if is_frozen(multiplier) {
        return;
    }
    state.time_ticks += 1;

    let bodies = state.bodies();
    for event in state.contacts.step(&bodies) {
        match event {
            ContactEvent::Began(a, b) => {
                // A ship destroyed earlier in this pass neither scores nor absorbs hits
                if involves_player(&a, &b) && !state.player.is_alive() {
                    continue;
                }
                dispatch_begin(state, &a, &b);
                dispatch_begin(state, &b, &a);
                score_contact(state, &a, &b);
            }
            ContactEvent::Ended(a, b) => {
                dispatch_end(state, &a, &b);
                dispatch_end(state, &b, &a);
            }
        }
    }
}

fn involves_player(a: &Body, b: &Body) -> bool {
    a.id == BodyId::Player || b.id == BodyId::Player
}

fn contact_of(body: &Body) -> Contact {
    Contact {
        category: body.category,
        position: body.center,
    }
}

fn collidable<'a>(state: &'a mut GameState, id: BodyId) -> Option<&'a mut dyn Collidable> {
    match id {
        BodyId::Player => Some(&mut state.player as &mut dyn Collidable),
        BodyId::Enemy(id) => state.enemies.entity_mut(id).map(|e| e as &mut dyn Collidable),
        BodyId::Collectible(id) => state.collectibles.entity_mut(id).map(|c| c as &mut dyn Collidable),
    }
}

fn dispatch_begin(state: &mut GameState, target: &Body, other: &Body) {
    if let Some(target) = collidable(state, target.id) {
        target.on_collision_begin(Some(&contact_of(other)));
    }
}

fn dispatch_end(state: &mut GameState, target: &Body, other: &Body) {
    if let Some(target) = collidable(state, target.id) {
        target.on_collision_end(Some(&contact_of(other)));
    }
}

/// Host-side bookkeeping for player contacts
fn score_contact(state: &mut GameState, a: &Body, b: &Body) {
    let other = match (a.id, b.id) {
        (BodyId::Player, other) | (other, BodyId::Player) => other,
        _ => return,
    };
    match other {
        BodyId::Collectible(_) => {
            state.score += 1;
            state.events.push(GameEvent::Collected { score: state.score });
        }
        BodyId::Enemy(_) => {
            state.events.push(GameEvent::PlayerHit {
                health: state.player.health,
            });
        }
        BodyId::Player => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::Level;
    use crate::resources::TextureCache;
    use crate::sim::entity::Spawned;
    use crate::sim::state::Hud;
    use glam::Vec2;

    fn setup() -> (GameState, TextureCache) {
        let level = Level::default();
        let mut cache = TextureCache::new(level.atlases.clone(), level.display_scale);
        let state = GameState::new(&level, &mut cache).expect("state");
        (state, cache)
    }

    #[test]
    fn test_tick_pause() {
        let (mut state, mut cache) = setup();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, &mut cache, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.events, vec![GameEvent::Paused]);

        let ticks = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);
        }
        assert_eq!(state.time_ticks, ticks);
        assert!(state.player.paused);

        tick(&mut state, &pause, &mut cache, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_boost_raises_multiplier() {
        let (mut state, mut cache) = setup();
        let input = TickInput {
            boost: Some(true),
            ..Default::default()
        };
        tick(&mut state, &input, &mut cache, SIM_DT);
        assert_eq!(state.multiplier(), 2.0);
        assert!(state.hud().boost < 100.0);

        let input = TickInput {
            boost: Some(false),
            ..Default::default()
        };
        tick(&mut state, &input, &mut cache, SIM_DT);
        assert_eq!(state.multiplier(), 1.0);
    }

    #[test]
    fn test_input_ignored_while_paused() {
        let (mut state, mut cache) = setup();
        state.phase = GamePhase::Paused;
        let input = TickInput {
            boost: Some(true),
            move_y: Some(100.0),
            ..Default::default()
        };
        let y = state.player.position.y;
        tick(&mut state, &input, &mut cache, SIM_DT);
        assert!(!state.player.is_boosting());
        assert_eq!(state.player.position.y, y);
    }

    #[test]
    fn test_game_over_when_health_gone() {
        let (mut state, mut cache) = setup();
        state.player.health = 0.0;
        tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);

        // Pause does nothing once over
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut cache, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_enemy_contact_hurts_player_and_fades_enemy() {
        let (mut state, mut cache) = setup();
        while state.enemies.entities().is_empty() {
            tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);
        }

        let id = state.enemies.entities()[0].id();
        let player_at = state.player.position;
        if let Some(enemy) = state.enemies.entity_mut(id) {
            enemy.object_mut().set_position(player_at + Vec2::new(10.0, 0.0));
        }
        tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);

        assert_eq!(state.player.health, 3.0);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
        let enemy = state.enemies.entities().iter().find(|e| e.id() == id);
        assert!(enemy.is_some_and(|e| e.object().is_fading()));

        // The fading enemy can't hit again
        tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);
        assert_eq!(state.player.health, 3.0);
    }

    #[test]
    fn test_no_pickup_after_fatal_hit() {
        let mut level = Level::default();
        for template in level.enemies.values_mut().chain(level.collectibles.values_mut()) {
            template.base_interval = 0.05;
        }
        let mut cache = TextureCache::new(level.atlases.clone(), level.display_scale);
        let mut state = GameState::new(&level, &mut cache).expect("state");
        while state.enemies.entities().is_empty() || state.collectibles.entities().is_empty() {
            tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);
        }

        let player_at = state.player.position;
        let enemy = state.enemies.entities()[0].id();
        let coin = state.collectibles.entities()[0].id();
        if let Some(e) = state.enemies.entity_mut(enemy) {
            e.object_mut().set_position(player_at + Vec2::new(5.0, 0.0));
        }
        if let Some(c) = state.collectibles.entity_mut(coin) {
            c.object_mut().set_position(player_at - Vec2::new(5.0, 0.0));
        }
        state.player.health = 1.0;
        tick(&mut state, &TickInput::default(), &mut cache, SIM_DT);

        assert!(!state.player.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.events, vec![GameEvent::PlayerHit { health: 0.0 }]);
        let coin = state.collectibles.entities().iter().find(|c| c.id() == coin);
        assert!(coin.is_some_and(|c| !c.object().is_fading()));
    }

    #[test]
    fn test_switch_texture_set_event() {
        let (mut state, mut cache) = setup();
        let input = TickInput {
            switch_texture_set: Some("Tundra".into()),
            ..Default::default()
        };
        tick(&mut state, &input, &mut cache, SIM_DT);
        assert!(state.events.contains(&GameEvent::TextureSetSwitched {
            atlas: "Tundra".into(),
            layers: 5,
        }));
    }

    type Snapshot = (Hud, Vec2, Vec<Vec2>, Vec<Vec<Vec2>>, u64);

    fn snapshot(state: &GameState) -> Snapshot {
        let entities = state
            .enemies
            .entities()
            .iter()
            .map(|e| e.object().position())
            .chain(state.collectibles.entities().iter().map(|c| c.object().position()))
            .collect();
        let tiles = state
            .parallax
            .layers()
            .iter()
            .map(|l| l.tiles().iter().map(|t| t.position).collect())
            .collect();
        (state.hud(), state.player.position, entities, tiles, state.time_ticks)
    }

    #[test]
    fn test_pause_leaves_no_trace() {
        let (mut paused, mut cache) = setup();
        let (mut straight, _) = setup();
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };

        // Warm up so entities and tiles are mid-flight when the pause lands
        for _ in 0..90 {
            tick(&mut paused, &TickInput::default(), &mut cache, SIM_DT);
            tick(&mut straight, &TickInput::default(), &mut cache, SIM_DT);
        }

        tick(&mut paused, &toggle, &mut cache, SIM_DT);
        for _ in 0..200 {
            tick(&mut paused, &TickInput::default(), &mut cache, SIM_DT);
        }
        tick(&mut paused, &toggle, &mut cache, SIM_DT);
        tick(&mut straight, &TickInput::default(), &mut cache, SIM_DT);

        for _ in 0..240 {
            tick(&mut paused, &TickInput::default(), &mut cache, SIM_DT);
            tick(&mut straight, &TickInput::default(), &mut cache, SIM_DT);
        }
        assert_eq!(snapshot(&paused), snapshot(&straight));
        assert_eq!(paused.enemies.spawned_count(), straight.enemies.spawned_count());
    }

    #[test]
    fn test_same_seed_same_run() {
        let (mut a, mut cache) = setup();
        let (mut b, _) = setup();
        let inputs = [
            TickInput {
                boost: Some(true),
                ..Default::default()
            },
            TickInput {
                move_y: Some(-40.0),
                ..Default::default()
            },
            TickInput::default(),
        ];
        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut a, input, &mut cache, SIM_DT);
            tick(&mut b, input, &mut cache, SIM_DT);
            assert_eq!(a.events, b.events);
        }
        assert_eq!(snapshot(&a), snapshot(&b));
        assert!(a.enemies.spawned_count() > 0);
    }

    #[test]
    fn test_different_seed_diverges() {
        let level = Level::default();
        let mut other = Level::default();
        other.seed ^= 0xFFFF;
        let mut cache = TextureCache::new(level.atlases.clone(), level.display_scale);
        let mut a = GameState::new(&level, &mut cache).expect("state");
        let mut b = GameState::new(&other, &mut cache).expect("state");
        for _ in 0..600 {
            tick(&mut a, &TickInput::default(), &mut cache, SIM_DT);
            tick(&mut b, &TickInput::default(), &mut cache, SIM_DT);
        }
        assert_ne!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_tile_pools_stay_bounded() {
        let (mut state, mut cache) = setup();
        for frame in 0..1800 {
            let input = TickInput {
                boost: Some(frame % 240 < 120),
                ..Default::default()
            };
            tick(&mut state, &input, &mut cache, SIM_DT);
            for layer in state.parallax.layers() {
                assert!(layer.tiles().len() <= layer.config().max_concurrent_tiles);
            }
        }
    }
}
