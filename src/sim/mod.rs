//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of drawing and
//! platform code:
//! - One call = one display frame (all rates are per frame)
//! - Randomness only through an injected `RngCore`
//! - Fighters update in a fixed order (player, then opponent)

pub mod arena;
pub mod combat;
pub mod control;
pub mod fighter;
pub mod state;

pub use arena::Arena;
pub use combat::{Strike, StrikeOutcome, is_hitting};
pub use control::{Controller, Intent, KeySource, KeyboardPilot, ScriptedPolicy};
pub use fighter::{Facing, Fighter, Role};
pub use state::{Match, MatchPhase, Outcome};
