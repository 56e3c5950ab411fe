//! Wave scheduling: composition, spawn cadence, completion and advancement
//!
//! Each wave is a descriptor of per-archetype spawn entries. The scheduler
//! runs as a state machine: Spawning (entries below target) → Draining
//! (fully spawned, live enemies remain) → Completed → next wave regenerated.

use glam::Vec2;
use rand::Rng;

use super::state::{
    EffectKind, Enemy, EnemyKind, GameState, MovementPattern, Projectile, SpawnEntry,
    WaveDescriptor,
};
use crate::consts::{ENEMY_SHOT_SPEED, WAVE_CLEAR_HEAL};

/// Compose the spawn schedule for wave `number`.
///
/// BASIC and FAST scale linearly; TANK unlocks at wave 2, ELITE at wave 3;
/// a single BOSS joins every fifth wave.
pub fn generate_wave(number: u32) -> WaveDescriptor {
    let n = number;
    let mut entries = vec![
        SpawnEntry::new(EnemyKind::Basic, 3 + n * 3 / 2, 1000.0),
        SpawnEntry::new(EnemyKind::Fast, n / 2, 1500.0),
    ];
    if n >= 2 {
        entries.push(SpawnEntry::new(EnemyKind::Tank, (n / 3).max(1), 2000.0));
    }
    if n >= 3 {
        entries.push(SpawnEntry::new(EnemyKind::Elite, (n / 4).max(1), 2500.0));
    }
    if n.is_multiple_of(5) {
        entries.push(SpawnEntry::new(EnemyKind::Boss, 1, 3000.0));
    }
    WaveDescriptor {
        number,
        entries,
        completed: false,
    }
}

/// Archetype-specific spawn edge
fn spawn_position(state: &mut GameState, kind: EnemyKind) -> Vec2 {
    let stats = kind.stats();
    let (w, h) = (state.bounds.width, state.bounds.height);
    match kind {
        EnemyKind::Basic | EnemyKind::Tank => {
            let x = state.rng.random_range(0.0..(w - stats.width).max(1.0));
            Vec2::new(x, -stats.height)
        }
        EnemyKind::Fast => {
            let y = state.rng.random_range(0.0..h / 2.0);
            let x = if state.rng.random_bool(0.5) {
                -stats.width
            } else {
                w
            };
            Vec2::new(x, y)
        }
        EnemyKind::Elite => match state.rng.random_range(0..4u8) {
            0 => Vec2::new(
                state.rng.random_range(0.0..(w - stats.width).max(1.0)),
                -stats.height,
            ),
            1 => Vec2::new(
                state.rng.random_range(0.0..(w - stats.width).max(1.0)),
                h,
            ),
            2 => Vec2::new(-stats.width, state.rng.random_range(0.0..h / 2.0)),
            _ => Vec2::new(w, state.rng.random_range(0.0..h / 2.0)),
        },
        EnemyKind::Boss => Vec2::new(w / 2.0 - stats.width / 2.0, -stats.height),
    }
}

fn movement_pattern(state: &mut GameState, kind: EnemyKind) -> MovementPattern {
    match kind {
        EnemyKind::Basic => {
            if state.rng.random_bool(0.3) {
                MovementPattern::Sine
            } else {
                MovementPattern::Linear
            }
        }
        EnemyKind::Fast => MovementPattern::Swoop,
        EnemyKind::Tank => MovementPattern::Linear,
        EnemyKind::Elite => MovementPattern::Tracking,
        EnemyKind::Boss => MovementPattern::Sine,
    }
}

/// Spawn step: each entry below target spawns one enemy once its cadence
/// interval has elapsed.
pub fn spawn_step(state: &mut GameState) {
    let now_ms = state.now_ms();

    for idx in 0..state.current_wave.entries.len() {
        let entry = &state.current_wave.entries[idx];
        if entry.fully_spawned() || now_ms - entry.last_spawn_ms < entry.spawn_delay_ms {
            continue;
        }
        let kind = entry.kind;

        let pos = spawn_position(state, kind);
        let pattern = movement_pattern(state, kind);
        let id = state.next_entity_id();
        let enemy = Enemy::spawn(id, kind, pos, pattern);
        let center = crate::aabb_center(enemy.pos, enemy.width, enemy.height);
        state.enemies.push(enemy);
        state.push_effect(EffectKind::Spawn, center);

        let entry = &mut state.current_wave.entries[idx];
        entry.total_spawned += 1;
        entry.last_spawn_ms = now_ms;
    }
}

/// Fire control for shooter archetypes: ELITE and BOSS launch an aimed shot
/// at the player on a fixed cadence.
pub fn fire_step(state: &mut GameState) {
    let player_center = state.player.center();
    let mut pending: Vec<(Vec2, Vec2, f32)> = Vec::new();

    for enemy in &mut state.enemies {
        let Some(interval) = enemy.kind.fire_interval() else {
            continue;
        };
        if enemy.fire_cooldown > 1 {
            enemy.fire_cooldown -= 1;
            continue;
        }
        enemy.fire_cooldown = interval;

        let muzzle = Vec2::new(
            enemy.pos.x + enemy.width / 2.0,
            enemy.pos.y + enemy.height,
        );
        let dir = (player_center - muzzle).normalize_or(Vec2::new(0.0, 1.0));
        pending.push((muzzle, dir * ENEMY_SHOT_SPEED, enemy.kind.shot_damage()));
    }

    for (pos, vel, damage) in pending {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::enemy_shot(id, pos, vel, damage));
    }
}

/// Completion and advancement: a wave is completed if and only if every
/// entry is fully spawned AND no live enemies remain. On completion the
/// WAVE_COMPLETE effect fires at playfield center, the player is healed,
/// and the next wave's descriptor enters Spawning.
pub fn check_wave_advance(state: &mut GameState) {
    let all_spawned = state
        .current_wave
        .entries
        .iter()
        .all(SpawnEntry::fully_spawned);
    if !all_spawned || !state.enemies.is_empty() {
        return;
    }

    state.current_wave.completed = true;
    state.push_effect(EffectKind::WaveComplete, state.bounds.center());
    state.player.health = (state.player.health + WAVE_CLEAR_HEAL).min(state.player.max_health);

    state.wave += 1;
    log::info!("wave {} cleared, advancing to {}", state.current_wave.number, state.wave);
    state.current_wave = generate_wave(state.wave);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;

    fn entry_for(wave: &WaveDescriptor, kind: EnemyKind) -> Option<&SpawnEntry> {
        wave.entries.iter().find(|e| e.kind == kind)
    }

    #[test]
    fn test_wave_composition_scaling() {
        let w1 = generate_wave(1);
        assert_eq!(entry_for(&w1, EnemyKind::Basic).unwrap().target_count, 4);
        assert_eq!(entry_for(&w1, EnemyKind::Fast).unwrap().target_count, 0);
        assert!(entry_for(&w1, EnemyKind::Tank).is_none());
        assert!(entry_for(&w1, EnemyKind::Elite).is_none());
        assert!(entry_for(&w1, EnemyKind::Boss).is_none());

        let w2 = generate_wave(2);
        assert!(entry_for(&w2, EnemyKind::Tank).is_some(), "tank unlocks at 2");

        let w3 = generate_wave(3);
        assert!(entry_for(&w3, EnemyKind::Elite).is_some(), "elite unlocks at 3");

        let w5 = generate_wave(5);
        assert_eq!(entry_for(&w5, EnemyKind::Boss).unwrap().target_count, 1);
        let w6 = generate_wave(6);
        assert!(entry_for(&w6, EnemyKind::Boss).is_none());

        // Linear growth of the basic contingent
        let w4 = generate_wave(4);
        assert!(
            entry_for(&w4, EnemyKind::Basic).unwrap().target_count
                > entry_for(&w1, EnemyKind::Basic).unwrap().target_count
        );
    }

    #[test]
    fn test_spawn_step_respects_cadence() {
        let mut state = GameState::new(3, Playfield::default());
        state.current_wave = WaveDescriptor {
            number: 1,
            entries: vec![SpawnEntry::new(EnemyKind::Basic, 2, 1000.0)],
            completed: false,
        };

        // now_ms = 0: 0 - 0 >= 1000 is false, nothing spawns
        spawn_step(&mut state);
        assert_eq!(state.enemies.len(), 0);

        // Past the cadence interval the first enemy appears
        state.time_ticks = 61; // ~1017 ms
        spawn_step(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.current_wave.entries[0].total_spawned, 1);

        // Re-running in the same tick must not double-spawn
        spawn_step(&mut state);
        assert_eq!(state.enemies.len(), 1);

        state.time_ticks = 122;
        spawn_step(&mut state);
        assert_eq!(state.enemies.len(), 2);

        // Target reached: no further spawns
        state.time_ticks = 400;
        spawn_step(&mut state);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_spawn_edges_by_kind() {
        let mut state = GameState::new(9, Playfield::default());
        let w = state.bounds.width;

        for _ in 0..20 {
            let pos = spawn_position(&mut state, EnemyKind::Basic);
            assert_eq!(pos.y, -30.0, "basic enters from the top edge");
            assert!(pos.x >= 0.0 && pos.x <= w - 30.0);

            let pos = spawn_position(&mut state, EnemyKind::Fast);
            assert!(
                pos.x == -30.0 || pos.x == w,
                "fast enters from a side edge, got {}",
                pos.x
            );

            let boss = spawn_position(&mut state, EnemyKind::Boss);
            assert_eq!(boss.x, w / 2.0 - 40.0, "boss is top-centered");
        }
    }

    #[test]
    fn test_wave_not_completed_with_live_enemies() {
        let mut state = GameState::new(3, Playfield::default());
        let mut entry = SpawnEntry::new(EnemyKind::Basic, 1, 1000.0);
        entry.total_spawned = 1;
        state.current_wave = WaveDescriptor {
            number: 1,
            entries: vec![entry],
            completed: false,
        };
        let id = state.next_entity_id();
        state.enemies.push(Enemy::spawn(
            id,
            EnemyKind::Basic,
            Vec2::new(10.0, 10.0),
            MovementPattern::Linear,
        ));

        check_wave_advance(&mut state);
        assert_eq!(state.wave, 1, "live enemies block completion");

        state.enemies.clear();
        check_wave_advance(&mut state);
        assert_eq!(state.wave, 2);
        assert!(!state.current_wave.completed, "fresh descriptor is spawning");
        assert!(
            state
                .visual_effects
                .iter()
                .any(|e| e.kind == EffectKind::WaveComplete)
        );
    }

    #[test]
    fn test_wave_not_completed_mid_spawning() {
        let mut state = GameState::new(3, Playfield::default());
        state.current_wave = WaveDescriptor {
            number: 1,
            entries: vec![SpawnEntry::new(EnemyKind::Basic, 5, 1000.0)],
            completed: false,
        };
        // No live enemies, but the entry is not fully spawned
        check_wave_advance(&mut state);
        assert_eq!(state.wave, 1);
        assert!(!state.current_wave.completed);
    }

    #[test]
    fn test_wave_clear_heals_capped() {
        let mut state = GameState::new(3, Playfield::default());
        state.player.health = 90.0;
        state.current_wave = WaveDescriptor {
            number: 1,
            entries: Vec::new(),
            completed: false,
        };
        check_wave_advance(&mut state);
        assert_eq!(state.player.health, 100.0);
    }

    #[test]
    fn test_fire_step_elite_shoots_at_player() {
        let mut state = GameState::new(3, Playfield::default());
        let id = state.next_entity_id();
        let mut elite = Enemy::spawn(
            id,
            EnemyKind::Elite,
            Vec2::new(100.0, 50.0),
            MovementPattern::Tracking,
        );
        elite.fire_cooldown = 1;
        state.enemies.push(elite);

        fire_step(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        let shot = &state.projectiles[0];
        assert!((shot.vel.length() - ENEMY_SHOT_SPEED).abs() < 1e-3);
        // Player is below and to the right of the muzzle
        assert!(shot.vel.y > 0.0);
        // Cooldown reset to the archetype interval
        assert_eq!(state.enemies[0].fire_cooldown, 150);

        // Next tick: cooldown just counts down
        fire_step(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.enemies[0].fire_cooldown, 149);
    }

    #[test]
    fn test_non_shooters_never_fire() {
        let mut state = GameState::new(3, Playfield::default());
        for kind in [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank] {
            let id = state.next_entity_id();
            state.enemies.push(Enemy::spawn(
                id,
                kind,
                Vec2::new(100.0, 50.0),
                MovementPattern::Linear,
            ));
        }
        for _ in 0..300 {
            fire_step(&mut state);
        }
        assert!(state.projectiles.is_empty());
    }
}
