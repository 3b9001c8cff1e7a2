//! Shinobi Fighter - a two-fighter arcade brawler
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, strikes, scripted opponent, match state)
//! - `renderer`: Procedural drawing through an abstract 2D surface
//! - `platform`: Collaborator interfaces (input, HUD, overlay, frame scheduling)
//!   and the browser adapter
//! - `game`: Session driver tying the simulation to its collaborators
//! - `settings`: Key bindings and overlay texts

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use game::Game;
pub use settings::{KeyBindings, Messages, Settings};

/// Game configuration constants (per-frame units)
pub mod consts {
    /// Downward acceleration applied every frame
    pub const GRAVITY: f32 = 0.55;
    /// Ground line as a fraction of the arena height
    pub const GROUND_RATIO: f32 = 0.72;

    /// Fighter bounding box (all fighters share it)
    pub const FIGHTER_WIDTH: f32 = 36.0;
    pub const FIGHTER_HEIGHT: f32 = 56.0;
    pub const MAX_HEALTH: u32 = 100;

    /// Spawn anchors as a fraction of the arena width
    pub const PLAYER_SPAWN_RATIO: f32 = 0.15;
    pub const OPPONENT_SPAWN_RATIO: f32 = 0.65;

    /// Player movement
    pub const WALK_SPEED: f32 = 4.0;
    pub const JUMP_VELOCITY: f32 = -13.0;

    /// Basic strike
    pub const ATTACK_RANGE: f32 = 70.0;
    pub const ATTACK_DAMAGE: u32 = 10;
    pub const ATTACK_COOLDOWN: u32 = 25;

    /// Special strike (also locks the basic strike for `SPECIAL_ATTACK_LOCK`)
    pub const SPECIAL_RANGE: f32 = 110.0;
    pub const SPECIAL_DAMAGE: u32 = 25;
    pub const SPECIAL_COOLDOWN: u32 = 60;
    pub const SPECIAL_ATTACK_LOCK: u32 = 30;

    /// Hurt flash duration (visual only)
    pub const HURT_FLASH: u32 = 15;
    /// Vertical reach as a fraction of the attacker's height
    pub const VERTICAL_REACH_RATIO: f32 = 0.8;

    /// Scripted opponent distance bands and speeds
    pub const AI_CHASE_DISTANCE: f32 = 120.0;
    pub const AI_RETREAT_DISTANCE: f32 = 50.0;
    pub const AI_CHASE_SPEED: f32 = 2.2;
    pub const AI_RETREAT_SPEED: f32 = 1.5;
    pub const AI_DRIFT_SPEED: f32 = 1.0;

    /// Scripted opponent action periods (ticks) and gates
    pub const AI_ATTACK_PERIOD: u64 = 40;
    pub const AI_ATTACK_DISTANCE: f32 = 90.0;
    pub const AI_SPECIAL_PERIOD: u64 = 90;
    pub const AI_SPECIAL_DISTANCE: f32 = 130.0;
    pub const AI_JUMP_PERIOD: u64 = 55;
    pub const AI_JUMP_CHANCE: f64 = 0.4;
}
