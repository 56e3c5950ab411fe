//! Game state and core simulation types
//!
//! The aggregate root is [`GameState`]: it exclusively owns every entity
//! collection, and is advanced only by [`crate::sim::tick::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Movement intent, as produced by keyboard/touch input translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Elite,
    Boss,
}

/// Per-archetype tuning values
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub speed: f32,
    pub points: u32,
    pub drop_chance: f64,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                width: 30.0,
                height: 30.0,
                health: 20.0,
                speed: 2.0,
                points: 100,
                drop_chance: 0.2,
            },
            EnemyKind::Fast => EnemyStats {
                width: 30.0,
                height: 30.0,
                health: 10.0,
                speed: 4.0,
                points: 150,
                drop_chance: 0.3,
            },
            EnemyKind::Tank => EnemyStats {
                width: 40.0,
                height: 40.0,
                health: 40.0,
                speed: 1.0,
                points: 200,
                drop_chance: 0.4,
            },
            EnemyKind::Elite => EnemyStats {
                width: 35.0,
                height: 35.0,
                health: 60.0,
                speed: 2.5,
                points: 350,
                drop_chance: 0.6,
            },
            EnemyKind::Boss => EnemyStats {
                width: 80.0,
                height: 60.0,
                health: 300.0,
                speed: 1.0,
                points: 1000,
                drop_chance: 1.0,
            },
        }
    }

    /// Ticks between aimed shots; None = does not fire
    pub fn fire_interval(self) -> Option<u32> {
        match self {
            EnemyKind::Elite => Some(150),
            EnemyKind::Boss => Some(90),
            _ => None,
        }
    }

    /// Damage of this archetype's projectiles
    pub fn shot_damage(self) -> f32 {
        match self {
            EnemyKind::Boss => 15.0,
            _ => 10.0,
        }
    }
}

/// Per-tick displacement rule for an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    Linear,
    Sine,
    Swoop,
    Tracking,
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub points: u32,
    pub drop_chance: f64,
    pub pattern: MovementPattern,
    /// Ticks until the next aimed shot (0 = not a shooter)
    #[serde(default)]
    pub fire_cooldown: u32,
}

impl Enemy {
    pub fn spawn(id: u32, kind: EnemyKind, pos: Vec2, pattern: MovementPattern) -> Self {
        let stats = kind.stats();
        // Stagger shooter cooldowns by spawn order so volleys don't align
        let fire_cooldown = kind
            .fire_interval()
            .map(|base| base + (id % 30))
            .unwrap_or(0);
        Self {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, stats.speed),
            width: stats.width,
            height: stats.height,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            points: stats.points,
            drop_chance: stats.drop_chance,
            pattern,
            fire_cooldown,
        }
    }
}

/// Who fired a projectile (decides which collision pairs it participates in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOrigin {
    Player,
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub damage: f32,
    pub origin: ProjectileOrigin,
    /// Cleared on collision consumption; purged at end of the resolution pass
    pub active: bool,
}

impl Projectile {
    /// A single player shot travelling straight up from `pos` (top-left)
    pub fn player_shot(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            width: PLAYER_SHOT_WIDTH,
            height: PLAYER_SHOT_HEIGHT,
            damage: PLAYER_SHOT_DAMAGE,
            origin: ProjectileOrigin::Player,
            active: true,
        }
    }

    /// An aimed enemy shot
    pub fn enemy_shot(id: u32, pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            width: ENEMY_SHOT_WIDTH,
            height: ENEMY_SHOT_HEIGHT,
            damage,
            origin: ProjectileOrigin::Enemy,
            active: true,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    Weapon,
    Speed,
}

impl PowerUpKind {
    /// Magnitude of the effect (health points, weapon levels, speed factor)
    pub fn value(self) -> f32 {
        match self {
            PowerUpKind::Health => 25.0,
            PowerUpKind::Shield => 1.0,
            PowerUpKind::Weapon => 1.0,
            PowerUpKind::Speed => 1.5,
        }
    }

    /// Effect duration in milliseconds; 0 = instantaneous
    pub fn duration_ms(self) -> f32 {
        match self {
            PowerUpKind::Health => 0.0,
            PowerUpKind::Shield => 5000.0,
            PowerUpKind::Weapon => 8000.0,
            PowerUpKind::Speed => 6000.0,
        }
    }
}

/// A power-up entity, dropped by dying enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub value: f32,
    pub duration_ms: f32,
    pub active: bool,
}

impl PowerUp {
    pub fn drop_at(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            width: POWERUP_SIZE,
            height: POWERUP_SIZE,
            value: kind.value(),
            duration_ms: kind.duration_ms(),
            active: true,
        }
    }
}

/// Visual effect types (consumed by the renderer, never gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    PowerUp,
    Hit,
    Spawn,
    WaveComplete,
}

impl EffectKind {
    /// Packed RGB color key for the renderer's palette
    pub fn color(self) -> u32 {
        match self {
            EffectKind::Explosion => 0xFF5722,
            EffectKind::PowerUp => 0x4CAF50,
            EffectKind::Hit => 0xFFEB3B,
            EffectKind::Spawn => 0x2196F3,
            EffectKind::WaveComplete => 0x9C27B0,
        }
    }

    pub fn duration_ms(self) -> f32 {
        match self {
            EffectKind::Explosion => 500.0,
            EffectKind::PowerUp => 400.0,
            EffectKind::Hit => 200.0,
            EffectKind::Spawn => 300.0,
            EffectKind::WaveComplete => 1000.0,
        }
    }
}

/// A transient visual effect. Holds a value-copied position, never a live
/// entity reference, so it cannot dangle across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub color: u32,
    pub scale: f32,
    pub opacity: f32,
    pub duration_ms: f32,
    pub start_tick: u64,
}

impl VisualEffect {
    pub fn new(kind: EffectKind, pos: Vec2, start_tick: u64) -> Self {
        Self {
            kind,
            pos,
            color: kind.color(),
            scale: 1.0,
            opacity: 1.0,
            duration_ms: kind.duration_ms(),
            start_tick,
        }
    }
}

/// One enemy-type entry in a wave's spawn schedule.
///
/// The tracking fields default to zero so a descriptor missing them (or one
/// hand-built by tests) self-heals on first read instead of faulting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub target_count: u32,
    pub spawn_delay_ms: f32,
    #[serde(default)]
    pub total_spawned: u32,
    #[serde(default)]
    pub last_spawn_ms: f32,
}

impl SpawnEntry {
    pub fn new(kind: EnemyKind, target_count: u32, spawn_delay_ms: f32) -> Self {
        Self {
            kind,
            target_count,
            spawn_delay_ms,
            total_spawned: 0,
            last_spawn_ms: 0.0,
        }
    }

    pub fn fully_spawned(&self) -> bool {
        self.total_spawned >= self.target_count
    }
}

/// Spawn cadence and composition of the current wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDescriptor {
    pub number: u32,
    pub entries: Vec<SpawnEntry>,
    pub completed: bool,
}

/// The player's ship. Created once per game; game-over is a flag on the
/// state, never removal of the ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShip {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub weapon_level: u8,
    pub shield_active: bool,
    pub speed_boost: f32,
}

impl PlayerShip {
    pub fn spawn(bounds: &Playfield) -> Self {
        Self {
            pos: Vec2::new(
                bounds.width / 2.0 - PLAYER_WIDTH / 2.0,
                bounds.height - PLAYER_SPAWN_MARGIN,
            ),
            vel: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            weapon_level: WEAPON_LEVEL_MIN,
            shield_active: false,
            speed_boost: 1.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        crate::aabb_center(self.pos, self.width, self.height)
    }
}

/// Expiry deadlines for timed power-up effects, keyed by effect kind.
///
/// A re-pickup extends the deadline to the later of the two; reversion
/// happens inside the tick by comparing against `time_ticks`, so stacked
/// pickups can never truncate each other and pausing freezes the timers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield_until: Option<u64>,
    pub weapon_until: Option<u64>,
    /// Levels added by pickups, to revert on expiry (clamping can absorb some)
    pub weapon_bonus: u8,
    pub speed_until: Option<u64>,
}

/// Playfield bounds, owned by the rendering surface and re-read on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG stream; reconstructed from `seed` on deserialize
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    /// Current wave number (mirrors `current_wave.number`)
    pub wave: u32,
    pub game_over: bool,
    pub is_paused: bool,
    pub player: PlayerShip,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    /// Transient, renderer-facing; not part of the persisted state
    #[serde(skip)]
    pub visual_effects: Vec<VisualEffect>,
    pub current_wave: WaveDescriptor,
    pub effects: ActiveEffects,
    pub bounds: Playfield,
    next_id: u32,
}

impl GameState {
    /// Fresh initial state: full-health player at bottom-center, wave 1
    /// descriptor in Spawning, all transient collections empty.
    pub fn new(seed: u64, bounds: Playfield) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            score: 0,
            wave: 1,
            game_over: false,
            is_paused: false,
            player: PlayerShip::spawn(&bounds),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            visual_effects: Vec::new(),
            current_wave: super::wave::generate_wave(1),
            effects: ActiveEffects::default(),
            bounds,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current simulation time in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.time_ticks as f32 * TICK_MS
    }

    /// Current simulation time in seconds (drives sine/swoop phases)
    pub fn now_secs(&self) -> f32 {
        self.time_ticks as f32 / TICK_HZ
    }

    pub fn push_effect(&mut self, kind: EffectKind, pos: Vec2) {
        let tick = self.time_ticks;
        self.visual_effects.push(VisualEffect::new(kind, pos, tick));
    }

    /// Set player velocity from a discrete directional intent
    pub fn set_player_direction(&mut self, direction: Direction) {
        let speed = PLAYER_SPEED * self.player.speed_boost;
        self.player.vel = match direction {
            Direction::Up => Vec2::new(0.0, -speed),
            Direction::Down => Vec2::new(0.0, speed),
            Direction::Left => Vec2::new(-speed, 0.0),
            Direction::Right => Vec2::new(speed, 0.0),
        };
    }

    /// Set player velocity from a continuous analog vector (joystick).
    /// The vector is expected normalized; it is scaled by speed and boost.
    pub fn set_player_intent(&mut self, direction: Vec2) {
        let dir = direction.clamp_length_max(1.0);
        self.player.vel = dir * PLAYER_SPEED * self.player.speed_boost;
    }

    pub fn stop_player(&mut self) {
        self.player.vel = Vec2::ZERO;
    }

    /// Spawn 1-3 player projectiles according to the current weapon level.
    ///
    /// Level 1: single centered shot. Level 2: two shots at ±8 px, vertical
    /// only. Level 3: center shot plus two angled outward at the same
    /// vertical speed.
    pub fn fire_weapon(&mut self) {
        if self.game_over || self.is_paused {
            return;
        }
        let muzzle = Vec2::new(
            self.player.pos.x + self.player.width / 2.0 - PLAYER_SHOT_WIDTH / 2.0,
            self.player.pos.y,
        );
        let shots: &[(f32, Vec2)] = match self.player.weapon_level {
            1 => &[(0.0, Vec2::new(0.0, -PLAYER_SHOT_SPEED))],
            2 => &[
                (-8.0, Vec2::new(0.0, -PLAYER_SHOT_SPEED)),
                (8.0, Vec2::new(0.0, -PLAYER_SHOT_SPEED)),
            ],
            _ => &[
                (0.0, Vec2::new(0.0, -PLAYER_SHOT_SPEED)),
                (-12.0, Vec2::new(-2.0, -PLAYER_SHOT_SPEED)),
                (12.0, Vec2::new(2.0, -PLAYER_SHOT_SPEED)),
            ],
        };

        for &(dx, vel) in shots {
            let id = self.next_entity_id();
            self.projectiles
                .push(Projectile::player_shot(id, muzzle + Vec2::new(dx, 0.0), vel));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_fresh() {
        let state = GameState::new(7, Playfield::default());
        assert_eq!(state.score, 0);
        assert_eq!(state.wave, 1);
        assert!(!state.game_over);
        assert!(!state.is_paused);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(state.visual_effects.is_empty());
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_player_spawns_bottom_center() {
        let bounds = Playfield::default();
        let player = PlayerShip::spawn(&bounds);
        assert_eq!(player.pos.x, bounds.width / 2.0 - player.width / 2.0);
        assert_eq!(player.pos.y, bounds.height - PLAYER_SPAWN_MARGIN);
    }

    #[test]
    fn test_fire_weapon_level_1() {
        let mut state = GameState::new(1, Playfield::default());
        state.fire_weapon();
        assert_eq!(state.projectiles.len(), 1);
        let shot = &state.projectiles[0];
        assert_eq!(shot.vel, Vec2::new(0.0, -PLAYER_SHOT_SPEED));
        assert_eq!(shot.origin, ProjectileOrigin::Player);
        // Centered on the player's horizontal midpoint
        let shot_center = shot.pos.x + shot.width / 2.0;
        let player_center = state.player.pos.x + state.player.width / 2.0;
        assert!((shot_center - player_center).abs() < 1e-4);
    }

    #[test]
    fn test_fire_weapon_level_2_symmetric_vertical() {
        let mut state = GameState::new(1, Playfield::default());
        state.player.weapon_level = 2;
        state.fire_weapon();
        assert_eq!(state.projectiles.len(), 2);
        let player_center = state.player.pos.x + state.player.width / 2.0;
        let offsets: Vec<f32> = state
            .projectiles
            .iter()
            .map(|p| (p.pos.x + p.width / 2.0) - player_center)
            .collect();
        assert!((offsets[0] + offsets[1]).abs() < 1e-4, "offsets symmetric");
        for p in &state.projectiles {
            assert_eq!(p.vel.x, 0.0, "level 2 shots are purely vertical");
        }
    }

    #[test]
    fn test_fire_weapon_level_3_spread() {
        let mut state = GameState::new(1, Playfield::default());
        state.player.weapon_level = 3;
        state.fire_weapon();
        assert_eq!(state.projectiles.len(), 3);
        let vys: Vec<f32> = state.projectiles.iter().map(|p| p.vel.y).collect();
        assert!(vys.iter().all(|&vy| vy == -PLAYER_SHOT_SPEED));
        let vxs: Vec<f32> = state.projectiles.iter().map(|p| p.vel.x).collect();
        assert!(vxs.contains(&0.0) && vxs.contains(&-2.0) && vxs.contains(&2.0));
    }

    #[test]
    fn test_fire_weapon_noop_when_over() {
        let mut state = GameState::new(1, Playfield::default());
        state.game_over = true;
        state.fire_weapon();
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_intent_vector_scaled_by_boost() {
        let mut state = GameState::new(1, Playfield::default());
        state.player.speed_boost = 1.5;
        state.set_player_intent(Vec2::new(1.0, 0.0));
        assert_eq!(state.player.vel.x, PLAYER_SPEED * 1.5);

        // Over-long vectors are clamped to unit length before scaling
        state.set_player_intent(Vec2::new(3.0, 0.0));
        assert_eq!(state.player.vel.x, PLAYER_SPEED * 1.5);
    }

    #[test]
    fn test_enemy_stats_table() {
        assert_eq!(EnemyKind::Basic.stats().points, 100);
        assert_eq!(EnemyKind::Fast.stats().speed, 4.0);
        assert_eq!(EnemyKind::Tank.stats().health, 40.0);
        assert_eq!(EnemyKind::Boss.stats().drop_chance, 1.0);
        assert!(EnemyKind::Basic.fire_interval().is_none());
        assert!(EnemyKind::Boss.fire_interval().is_some());
    }
}
