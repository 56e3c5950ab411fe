//! Per-pattern enemy movement resolver
//!
//! Pure functions of (enemy, elapsed time, player position). The tick loop
//! applies the returned velocity and clamps the horizontal position.

use glam::Vec2;

use super::state::{Enemy, MovementPattern};
use crate::consts::ENEMY_DRIFT_MARGIN;

/// Compute an enemy's velocity for this tick.
///
/// `time_secs` is the simulation clock in seconds (phase for sine/swoop);
/// `player_center` is the current player midpoint (tracking target).
pub fn resolve_movement(enemy: &Enemy, time_secs: f32, player_center: Vec2) -> Vec2 {
    match enemy.pattern {
        MovementPattern::Linear => Vec2::new(0.0, enemy.speed),
        MovementPattern::Sine => Vec2::new((time_secs * 2.0).sin() * 2.0, enemy.speed),
        MovementPattern::Swoop => Vec2::new(
            (time_secs * 2.0).cos() * 3.0,
            enemy.speed + (time_secs * 2.0).sin() * 2.0,
        ),
        MovementPattern::Tracking => {
            let to_player = player_center - crate::aabb_center(enemy.pos, enemy.width, enemy.height);
            // Zero-vector guard: hold course when exactly on top of the player
            if to_player.length_squared() < f32::EPSILON {
                Vec2::ZERO
            } else {
                to_player.normalize() * enemy.speed
            }
        }
    }
}

/// Advance an enemy by its resolved velocity and clamp it to the playfield's
/// horizontal drift margin, so despawn-by-bounds logic elsewhere stays sane.
pub fn step_enemy(enemy: &mut Enemy, time_secs: f32, player_center: Vec2, field_width: f32) {
    enemy.vel = resolve_movement(enemy, time_secs, player_center);
    enemy.pos += enemy.vel;
    enemy.pos.x = crate::clamp_span(
        enemy.pos.x,
        -ENEMY_DRIFT_MARGIN,
        field_width + ENEMY_DRIFT_MARGIN - enemy.width,
    );
}
