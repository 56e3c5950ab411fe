//! State-owning game engine
//!
//! Explicit context object instantiated by the caller: it owns the single
//! live [`GameState`], exposes the command entry points, and publishes a
//! snapshot to registered observers after every tick and every command
//! mutation. There is no global lookup; drop the engine and everything goes
//! with it.

use glam::Vec2;

use crate::sim::state::{Direction, GameState, Playfield};
use crate::sim::tick::tick;

/// Handle returned by [`GameEngine::subscribe`]; pass it back to
/// [`GameEngine::unsubscribe`] to deregister. Registrations survive
/// restarts, so the embedding shell never re-subscribes (and never leaks
/// duplicate listeners) across games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&GameState)>;

/// The simulation engine. The embedding shell owns the fixed-interval timer
/// and calls [`GameEngine::tick`] every ~16 ms; input translation feeds the
/// command methods between ticks.
pub struct GameEngine {
    state: GameState,
    seed: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl GameEngine {
    pub fn new(seed: u64, bounds: Playfield) -> Self {
        Self {
            state: GameState::new(seed, bounds),
            seed,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Pull-based accessor for the latest snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Register an observer; it is called with the full state snapshot after
    /// every tick and every externally triggered mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Deregister an observer. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn publish(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Reset to a fresh initial state and begin ticking. Valid at any time,
    /// including after game-over; observer registrations are untouched.
    pub fn start_game(&mut self) {
        let bounds = self.state.bounds;
        self.state = GameState::new(self.seed, bounds);
        log::info!("game started (seed {})", self.seed);
        self.publish();
    }

    /// Advance one fixed simulation step and publish the result
    pub fn tick(&mut self) {
        tick(&mut self.state);
        self.publish();
    }

    /// Set player velocity from a discrete directional intent
    pub fn move_player(&mut self, direction: Direction) {
        self.state.set_player_direction(direction);
        self.publish();
    }

    /// Set player velocity from a continuous analog vector (virtual
    /// joystick); magnitude is clamped to 1 then scaled by speed and boost
    pub fn update_player_position(&mut self, direction: Vec2) {
        self.state.set_player_intent(direction);
        self.publish();
    }

    pub fn stop_player_movement(&mut self) {
        self.state.stop_player();
        self.publish();
    }

    /// Spawn 1-3 projectiles per the current weapon level
    pub fn fire_weapon(&mut self) {
        self.state.fire_weapon();
        self.publish();
    }

    /// Toggle pause. Paused ticks are no-ops; timed effects freeze with the
    /// tick counter.
    pub fn pause_game(&mut self) {
        self.state.is_paused = !self.state.is_paused;
        log::debug!("pause toggled: {}", self.state.is_paused);
        self.publish();
    }

    /// Adopt new playfield bounds from the rendering surface. The player is
    /// re-clamped so it cannot be stranded outside a shrunken field.
    pub fn resize_playfield(&mut self, width: f32, height: f32) {
        self.state.bounds = Playfield { width, height };
        self.state.player.pos.x = crate::clamp_span(
            self.state.player.pos.x,
            0.0,
            width - self.state.player.width,
        );
        self.state.player.pos.y = crate::clamp_span(
            self.state.player.pos.y,
            0.0,
            height - self.state.player.height,
        );
        self.publish();
    }
}
