//! Collision detection and damage resolution
//!
//! Geometry is plain axis-aligned bounding-box overlap with a configurable
//! tolerance buffer. Resolution runs once per tick in a fixed order:
//! player shots vs enemies, then enemy contact (skipping enemies already
//! killed by a shot this tick), then enemy shots vs the player, then
//! power-up pickup. Dead and consumed entities are purged at the end.

use glam::Vec2;
use rand::Rng;

use super::effects::apply_power_up;
use super::state::{EffectKind, Enemy, GameState, PowerUp, PowerUpKind, Projectile, ProjectileOrigin};
use crate::aabb_center;
use crate::consts::{CONTACT_DAMAGE, ENEMY_HITBOX_TOLERANCE};

/// An axis-aligned bounding box, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self { pos, width, height }
    }

    pub fn center(&self) -> Vec2 {
        aabb_center(self.pos, self.width, self.height)
    }
}

impl From<&Enemy> for Aabb {
    fn from(e: &Enemy) -> Self {
        Aabb::new(e.pos, e.width, e.height)
    }
}

impl From<&Projectile> for Aabb {
    fn from(p: &Projectile) -> Self {
        Aabb::new(p.pos, p.width, p.height)
    }
}

impl From<&PowerUp> for Aabb {
    fn from(p: &PowerUp) -> Self {
        Aabb::new(p.pos, p.width, p.height)
    }
}

/// AABB overlap test. A positive `tolerance` shrinks `b` by that many pixels
/// on every side, demanding a deeper overlap before reporting a hit — used
/// for enemy-involved pairs, whose sprites are narrower than their box.
pub fn aabb_overlap(a: &Aabb, b: &Aabb, tolerance: f32) -> bool {
    a.pos.x < b.pos.x + b.width - tolerance
        && a.pos.x + a.width > b.pos.x + tolerance
        && a.pos.y < b.pos.y + b.height - tolerance
        && a.pos.y + a.height > b.pos.y + tolerance
}

/// Run the full collision and damage pass for one tick.
pub fn resolve_collisions(state: &mut GameState) {
    let mut pending_effects: Vec<(EffectKind, Vec2)> = Vec::new();
    let mut pending_drops: Vec<(PowerUpKind, Vec2)> = Vec::new();

    // 1) Player shots vs enemies. A shot is consumed by its first hit.
    for p_idx in 0..state.projectiles.len() {
        if !state.projectiles[p_idx].active
            || state.projectiles[p_idx].origin != ProjectileOrigin::Player
        {
            continue;
        }
        let shot_box = Aabb::from(&state.projectiles[p_idx]);

        for e_idx in 0..state.enemies.len() {
            if state.enemies[e_idx].health <= 0.0 {
                continue;
            }
            let enemy_box = Aabb::from(&state.enemies[e_idx]);
            if !aabb_overlap(&shot_box, &enemy_box, ENEMY_HITBOX_TOLERANCE) {
                continue;
            }

            state.projectiles[p_idx].active = false;
            let damage = state.projectiles[p_idx].damage;
            let enemy = &mut state.enemies[e_idx];
            enemy.health -= damage;
            pending_effects.push((EffectKind::Hit, enemy_box.center()));

            if enemy.health <= 0.0 {
                state.score += enemy.points as u64;
                pending_effects.push((EffectKind::Explosion, enemy_box.center()));
                log::debug!(
                    "enemy {:?} destroyed, +{} points (score {})",
                    enemy.kind,
                    enemy.points,
                    state.score
                );
                if state.rng.random_bool(state.enemies[e_idx].drop_chance) {
                    let kind = match state.rng.random_range(0..4) {
                        0 => PowerUpKind::Health,
                        1 => PowerUpKind::Shield,
                        2 => PowerUpKind::Weapon,
                        _ => PowerUpKind::Speed,
                    };
                    pending_drops.push((kind, enemy_box.center()));
                }
            }
            break;
        }
    }

    // 2) Direct enemy contact. Enemies already killed by a shot this tick
    //    are skipped: one death, one removal, no double credit.
    let player_box = Aabb::new(state.player.pos, state.player.width, state.player.height);
    for enemy in &mut state.enemies {
        if enemy.health <= 0.0 {
            continue;
        }
        let enemy_box = Aabb::new(enemy.pos, enemy.width, enemy.height);
        if aabb_overlap(&player_box, &enemy_box, ENEMY_HITBOX_TOLERANCE) {
            // Contact destroys the enemy without awarding points
            enemy.health = 0.0;
            state.player.health = (state.player.health - CONTACT_DAMAGE).max(0.0);
            pending_effects.push((EffectKind::Explosion, enemy_box.center()));
            pending_effects.push((EffectKind::Hit, player_box.center()));
        }
    }

    // 3) Enemy shots vs the player. An active shield absorbs fully.
    for shot in &mut state.projectiles {
        if !shot.active || shot.origin != ProjectileOrigin::Enemy {
            continue;
        }
        let shot_box = Aabb::new(shot.pos, shot.width, shot.height);
        if aabb_overlap(&shot_box, &player_box, 0.0) {
            shot.active = false;
            if !state.player.shield_active {
                state.player.health = (state.player.health - shot.damage).max(0.0);
                pending_effects.push((EffectKind::Hit, player_box.center()));
            }
        }
    }

    // 4) Power-up pickup (deferred application, borrow-friendly)
    let mut collected: Vec<(PowerUpKind, f32, f32)> = Vec::new();
    for power_up in &mut state.power_ups {
        if !power_up.active {
            continue;
        }
        let pu_box = Aabb::new(power_up.pos, power_up.width, power_up.height);
        if aabb_overlap(&pu_box, &player_box, 0.0) {
            power_up.active = false;
            collected.push((power_up.kind, power_up.value, power_up.duration_ms));
            pending_effects.push((EffectKind::PowerUp, pu_box.center()));
        }
    }
    for (kind, value, duration_ms) in collected {
        apply_power_up(state, kind, value, duration_ms);
    }

    for (kind, pos) in pending_effects {
        state.push_effect(kind, pos);
    }
    for (kind, pos) in pending_drops {
        let id = state.next_entity_id();
        let size = crate::consts::POWERUP_SIZE;
        let top_left = pos - Vec2::new(size / 2.0, size / 2.0);
        state.power_ups.push(PowerUp::drop_at(id, kind, top_left));
    }

    // Purge dead enemies, consumed shots and collected power-ups
    state.enemies.retain(|e| e.health > 0.0);
    state.projectiles.retain(|p| p.active);
    state.power_ups.retain(|p| p.active);

    // Terminal transition: the loop becomes a no-op until an explicit restart
    if state.player.health <= 0.0 && !state.game_over {
        state.game_over = true;
        log::info!(
            "game over at wave {} with score {}",
            state.wave,
            state.score
        );
    }
}
