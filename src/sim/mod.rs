//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod movement;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Aabb, aabb_overlap, resolve_collisions};
pub use effects::apply_power_up;
pub use movement::resolve_movement;
pub use state::{
    ActiveEffects, Direction, EffectKind, Enemy, EnemyKind, GameState, MovementPattern, Playfield,
    PlayerShip, PowerUp, PowerUpKind, Projectile, ProjectileOrigin, SpawnEntry, VisualEffect,
    WaveDescriptor,
};
pub use tick::tick;
pub use wave::generate_wave;
