//! Fixed timestep simulation tick
//!
//! One tick advances the world in strict order: player movement, enemy
//! movement, projectile/power-up advancement, visual-effect decay, power-up
//! expiry, wave spawning and fire control, collision resolution, wave
//! advancement. While paused or after game-over the tick is a no-op.

use super::collision::resolve_collisions;
use super::effects::step_expiry;
use super::movement::step_enemy;
use super::state::GameState;
use super::wave::{check_wave_advance, fire_step, spawn_step};
use crate::consts::{
    EFFECT_OPACITY_DECAY, EFFECT_SCALE_GROWTH, ENEMY_DRIFT_MARGIN, PROJECTILE_DESPAWN_MARGIN,
};

/// Advance the game state by one fixed step (~16 ms).
pub fn tick(state: &mut GameState) {
    if state.is_paused || state.game_over {
        return;
    }
    state.time_ticks += 1;

    // (a) Player velocity applied, then clamped to the playfield
    state.player.pos += state.player.vel;
    state.player.pos.x = crate::clamp_span(
        state.player.pos.x,
        0.0,
        state.bounds.width - state.player.width,
    );
    state.player.pos.y = crate::clamp_span(
        state.player.pos.y,
        0.0,
        state.bounds.height - state.player.height,
    );

    // (b) Enemy movement by pattern
    let time_secs = state.now_secs();
    let player_center = state.player.center();
    let field_width = state.bounds.width;
    for enemy in &mut state.enemies {
        step_enemy(enemy, time_secs, player_center, field_width);
    }
    // Enemies that drift past the bottom margin despawn (no points)
    let despawn_y = state.bounds.height + ENEMY_DRIFT_MARGIN;
    state.enemies.retain(|e| e.pos.y <= despawn_y);

    // (c) Projectiles and power-ups advance by their velocity; leavers purged
    let (w, h) = (state.bounds.width, state.bounds.height);
    state.projectiles.retain_mut(|p| {
        p.pos += p.vel;
        p.pos.x >= -PROJECTILE_DESPAWN_MARGIN
            && p.pos.x <= w + PROJECTILE_DESPAWN_MARGIN
            && p.pos.y >= -PROJECTILE_DESPAWN_MARGIN
            && p.pos.y <= h + PROJECTILE_DESPAWN_MARGIN
    });
    state.power_ups.retain_mut(|p| {
        p.pos += p.vel;
        p.pos.y <= h
    });

    // (d) Visual effects fade out and grow until they expire
    for effect in &mut state.visual_effects {
        effect.opacity -= EFFECT_OPACITY_DECAY;
        effect.scale *= EFFECT_SCALE_GROWTH;
    }
    state.visual_effects.retain(|e| e.opacity > 0.0);

    // Timed power-up reversion (deadline model, never deferred callbacks)
    step_expiry(state);

    // (e) Wave spawning and enemy fire control
    spawn_step(state);
    fire_step(state);

    // (f) Collisions, damage, drops, game-over
    resolve_collisions(state);

    // (g) Wave completion and advancement
    check_wave_advance(state);
}
