//! Starlight headless runner
//!
//! Plays a level at 60 Hz without a window: boosts for a while, pauses in
//! the middle, switches biome near the end, then logs a summary.
//!
//! Usage: `starlight [level.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Starlight (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => match starlight::Level::load(&path) {
            Ok(level) => level,
            Err(err) => {
                log::error!("Could not load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => starlight::Level::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    if let Err(err) = run(&level, seconds) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; hosts embed the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run(level: &starlight::Level, seconds: f32) -> Result<(), starlight::ConfigError> {
    use starlight::TextureCache;
    use starlight::consts::SIM_DT;
    use starlight::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    let mut cache = TextureCache::new(level.atlases.clone(), level.display_scale);
    let mut state = GameState::new(level, &mut cache)?;

    let total = (seconds / SIM_DT).round() as u64;
    let pause_at = total / 2;
    let resume_at = pause_at + total / 10;
    let boost_at = total / 5;
    let switch_at = total * 4 / 5;
    let mut collected = 0u32;
    let mut hits = 0u32;

    for frame in 0..total {
        let mut input = TickInput {
            pause: frame == pause_at || frame == resume_at,
            ..Default::default()
        };
        if frame == boost_at {
            input.boost = Some(true);
        }
        if frame == switch_at {
            input.switch_texture_set = Some("Tundra".to_string());
        }

        tick(&mut state, &input, &mut cache, SIM_DT);

        for event in &state.events {
            match event {
                GameEvent::Collected { .. } => collected += 1,
                GameEvent::PlayerHit { health } => {
                    hits += 1;
                    log::debug!("Hit at frame {} (health {})", frame, health);
                }
                _ => {}
            }
        }
        if state.phase == GamePhase::GameOver {
            log::info!("Run ended at frame {}", frame);
            break;
        }
    }

    let hud = state.hud();
    log::info!(
        "Simulated {} ticks: {} enemies and {} collectibles spawned, {} live",
        state.time_ticks,
        state.enemies.spawned_count(),
        state.collectibles.spawned_count(),
        state.entity_count()
    );
    for layer in state.parallax.layers() {
        log::info!(
            "  layer {:<14} {:>2} tiles, {:>3} spawned, {:>3} recycled ({})",
            layer.config().texture_group,
            layer.tiles().len(),
            layer.spawned_count(),
            layer.recycled_count(),
            layer.atlas()
        );
    }
    log::info!(
        "Score {} ({} pickups), {} hits, health {}/{}, boost {:.1}",
        hud.score,
        collected,
        hits,
        hud.health,
        hud.health_max,
        hud.boost
    );
    println!(
        "score={} health={} ticks={} draw_items={}",
        hud.score,
        hud.health,
        state.time_ticks,
        starlight::scene::draw_list(&state).len()
    );
    Ok(())
}
