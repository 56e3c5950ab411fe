//! Nova Strike - deterministic simulation core for a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves, game state)
//! - `engine`: State-owning context with command entry points and observers
//!
//! Rendering, input capture and UI chrome are external collaborators: they
//! read published state snapshots and feed normalized intent vectors and
//! fire commands into the engine.

pub mod engine;
pub mod sim;

pub use engine::{GameEngine, ListenerId};
pub use sim::state::GameState;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick rate (60 Hz)
    pub const TICK_HZ: f32 = 60.0;
    /// Milliseconds per tick (durations from the tuning tables are in ms)
    pub const TICK_MS: f32 = 1000.0 / TICK_HZ;

    /// Default playfield dimensions (owned by the rendering surface)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Vertical offset of the player's spawn row from the bottom edge
    pub const PLAYER_SPAWN_MARGIN: f32 = 50.0;
    pub const WEAPON_LEVEL_MIN: u8 = 1;
    pub const WEAPON_LEVEL_MAX: u8 = 3;

    /// Projectile defaults
    pub const PLAYER_SHOT_WIDTH: f32 = 4.0;
    pub const PLAYER_SHOT_HEIGHT: f32 = 12.0;
    pub const PLAYER_SHOT_SPEED: f32 = 8.0;
    pub const PLAYER_SHOT_DAMAGE: f32 = 10.0;
    pub const ENEMY_SHOT_WIDTH: f32 = 6.0;
    pub const ENEMY_SHOT_HEIGHT: f32 = 12.0;
    pub const ENEMY_SHOT_SPEED: f32 = 5.0;

    /// Damage dealt to the player by direct enemy contact
    pub const CONTACT_DAMAGE: f32 = 20.0;

    /// Collision tolerance buffer for enemy-involved pairs (enemy sprites
    /// are narrower than their bounding box)
    pub const ENEMY_HITBOX_TOLERANCE: f32 = 4.0;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 1.0;

    /// Visual effect decay per tick
    pub const EFFECT_OPACITY_DECAY: f32 = 0.02;
    pub const EFFECT_SCALE_GROWTH: f32 = 1.03;

    /// Projectiles despawn this far beyond the playfield bounds
    pub const PROJECTILE_DESPAWN_MARGIN: f32 = 20.0;
    /// Enemies may drift this far off the horizontal edges before clamping
    pub const ENEMY_DRIFT_MARGIN: f32 = 100.0;

    /// Health restored when a wave is cleared
    pub const WAVE_CLEAR_HEAL: f32 = 25.0;
}

/// Clamp `v` to `[lo, hi]`, tolerating a degenerate range where `hi < lo`
/// (e.g. a playfield narrower than the entity)
#[inline]
pub fn clamp_span(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi.max(lo))
}

/// Center point of an AABB given its top-left corner and size
#[inline]
pub fn aabb_center(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x + width / 2.0, pos.y + height / 2.0)
}
