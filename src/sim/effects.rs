//! Timed power-up effects
//!
//! Timed stat modifiers are tracked as per-kind expiry deadlines checked
//! inside the tick, never as deferred callbacks. A re-pickup extends the
//! deadline to the later of the two, so stacked effects never truncate each
//! other, and pausing (which freezes the tick counter) freezes the timers.

use super::state::{GameState, PowerUpKind};
use crate::consts::{TICK_MS, WEAPON_LEVEL_MAX, WEAPON_LEVEL_MIN};

fn deadline_after(state: &GameState, duration_ms: f32) -> u64 {
    state.time_ticks + (duration_ms / TICK_MS).ceil() as u64
}

fn extend(slot: &mut Option<u64>, deadline: u64) {
    *slot = Some(slot.map_or(deadline, |old| old.max(deadline)));
}

/// Apply a collected power-up to the player.
///
/// HEALTH is instantaneous (capped at max health); SHIELD, WEAPON and SPEED
/// take effect immediately and record an expiry deadline.
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind, value: f32, duration_ms: f32) {
    match kind {
        PowerUpKind::Health => {
            state.player.health = (state.player.health + value).min(state.player.max_health);
        }
        PowerUpKind::Shield => {
            state.player.shield_active = true;
            let deadline = deadline_after(state, duration_ms);
            extend(&mut state.effects.shield_until, deadline);
        }
        PowerUpKind::Weapon => {
            let old = state.player.weapon_level;
            state.player.weapon_level = (old + value as u8).min(WEAPON_LEVEL_MAX);
            // Track only the levels actually gained; the cap absorbs the rest
            state.effects.weapon_bonus += state.player.weapon_level - old;
            let deadline = deadline_after(state, duration_ms);
            extend(&mut state.effects.weapon_until, deadline);
        }
        PowerUpKind::Speed => {
            state.player.speed_boost = value;
            let deadline = deadline_after(state, duration_ms);
            extend(&mut state.effects.speed_until, deadline);
        }
    }
    log::debug!("power-up {:?} applied (value {value})", kind);
}

/// Revert any effect whose deadline has passed. Called once per active tick.
pub fn step_expiry(state: &mut GameState) {
    let now = state.time_ticks;

    if state.effects.shield_until.is_some_and(|t| now >= t) {
        state.player.shield_active = false;
        state.effects.shield_until = None;
    }
    if state.effects.weapon_until.is_some_and(|t| now >= t) {
        state.player.weapon_level = state
            .player
            .weapon_level
            .saturating_sub(state.effects.weapon_bonus)
            .max(WEAPON_LEVEL_MIN);
        state.effects.weapon_bonus = 0;
        state.effects.weapon_until = None;
    }
    if state.effects.speed_until.is_some_and(|t| now >= t) {
        state.player.speed_boost = 1.0;
        state.effects.speed_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;

    fn state() -> GameState {
        GameState::new(1, Playfield::default())
    }

    #[test]
    fn test_health_capped_at_max() {
        let mut state = state();
        state.player.health = 80.0;
        apply_power_up(&mut state, PowerUpKind::Health, 30.0, 0.0);
        assert_eq!(state.player.health, 100.0, "capped, not 110");
    }

    #[test]
    fn test_shield_sets_flag_and_deadline() {
        let mut state = state();
        apply_power_up(&mut state, PowerUpKind::Shield, 1.0, 5000.0);
        assert!(state.player.shield_active);
        let deadline = state.effects.shield_until.unwrap();
        assert_eq!(deadline, (5000.0_f32 / TICK_MS).ceil() as u64);
    }

    #[test]
    fn test_second_shield_extends_never_truncates() {
        let mut state = state();
        apply_power_up(&mut state, PowerUpKind::Shield, 1.0, 5000.0);
        let first = state.effects.shield_until.unwrap();

        // 100 ticks later, a second pickup: deadline moves out
        state.time_ticks = 100;
        apply_power_up(&mut state, PowerUpKind::Shield, 1.0, 5000.0);
        let second = state.effects.shield_until.unwrap();
        assert!(second > first);

        // Expiry at the first deadline must NOT clear the shield
        state.time_ticks = first;
        step_expiry(&mut state);
        assert!(state.player.shield_active);

        state.time_ticks = second;
        step_expiry(&mut state);
        assert!(!state.player.shield_active);
    }

    #[test]
    fn test_weapon_increments_capped_and_reverts() {
        let mut state = state();
        apply_power_up(&mut state, PowerUpKind::Weapon, 1.0, 8000.0);
        assert_eq!(state.player.weapon_level, 2);
        apply_power_up(&mut state, PowerUpKind::Weapon, 1.0, 8000.0);
        assert_eq!(state.player.weapon_level, 3);
        // Third pickup is absorbed by the cap
        apply_power_up(&mut state, PowerUpKind::Weapon, 1.0, 8000.0);
        assert_eq!(state.player.weapon_level, 3);
        assert_eq!(state.effects.weapon_bonus, 2);

        state.time_ticks = state.effects.weapon_until.unwrap();
        step_expiry(&mut state);
        assert_eq!(state.player.weapon_level, 1, "reverts to base, floored at 1");
        assert_eq!(state.effects.weapon_bonus, 0);
    }

    #[test]
    fn test_speed_boost_and_reset() {
        let mut state = state();
        apply_power_up(&mut state, PowerUpKind::Speed, 1.5, 6000.0);
        assert_eq!(state.player.speed_boost, 1.5);

        state.time_ticks = state.effects.speed_until.unwrap();
        step_expiry(&mut state);
        assert_eq!(state.player.speed_boost, 1.0);
    }

    #[test]
    fn test_expiry_noop_before_deadline() {
        let mut state = state();
        apply_power_up(&mut state, PowerUpKind::Shield, 1.0, 5000.0);
        state.time_ticks = 10;
        step_expiry(&mut state);
        assert!(state.player.shield_active);
    }
}
