//! Headless demo shell
//!
//! Drives the engine with a scripted autopilot for a fixed number of ticks,
//! standing in for the rendering/input collaborators: it owns the tick
//! cadence, feeds intent vectors and fire commands, and reads published
//! snapshots. Dumps the final state as JSON.

use glam::Vec2;

use nova_strike::GameEngine;
use nova_strike::sim::state::Playfield;

const DEMO_TICKS: u64 = 3600; // one minute of simulated play
const FIRE_EVERY: u64 = 10;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut engine = GameEngine::new(seed, Playfield::default());
    engine.start_game();

    for i in 0..DEMO_TICKS {
        autopilot(&mut engine);
        if i % FIRE_EVERY == 0 {
            engine.fire_weapon();
        }
        engine.tick();

        if engine.state().game_over {
            log::info!("destroyed after {i} ticks");
            break;
        }
        if i % 600 == 0 {
            let s = engine.state();
            log::info!(
                "t={} wave={} score={} health={} enemies={}",
                i,
                s.wave,
                s.score,
                s.player.health,
                s.enemies.len()
            );
        }
    }

    let s = engine.state();
    log::info!(
        "finished: wave {} score {} ({} ticks)",
        s.wave,
        s.score,
        s.time_ticks
    );
    match serde_json::to_string_pretty(s) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("failed to serialize final state: {e}"),
    }
}

/// Chase the nearest threat's column and sidestep whatever is closest
fn autopilot(engine: &mut GameEngine) {
    let state = engine.state();
    let player = state.player.center();

    let target_x = state
        .enemies
        .iter()
        .min_by(|a, b| {
            let da = (a.pos.y - player.y).abs();
            let db = (b.pos.y - player.y).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x + e.width / 2.0);

    match target_x {
        Some(x) if (x - player.x).abs() > 10.0 => {
            let dir = Vec2::new((x - player.x).signum(), 0.0);
            engine.update_player_position(dir);
        }
        _ => engine.stop_player_movement(),
    }
}
