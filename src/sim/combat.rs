//! Strike resolution
//!
//! Hit detection is a directional proximity test between body centers: the
//! target must be strictly in front of the attacker, within reach, and roughly
//! level with it. Bodies never block each other; only strikes interact.

use serde::{Deserialize, Serialize};

use super::fighter::Fighter;
use crate::consts::*;

/// The two strikes every fighter has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strike {
    Basic,
    Special,
}

impl Strike {
    pub fn range(self) -> f32 {
        match self {
            Strike::Basic => ATTACK_RANGE,
            Strike::Special => SPECIAL_RANGE,
        }
    }

    pub fn damage(self) -> u32 {
        match self {
            Strike::Basic => ATTACK_DAMAGE,
            Strike::Special => SPECIAL_DAMAGE,
        }
    }
}

/// Result of asking a fighter to strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// The strike's own timer was still running; nothing happened
    OnCooldown,
    /// The strike started and damaged `hits` targets
    Swung { hits: usize },
}

/// Whether `target` is inside `attacker`'s reach of `range`
pub fn is_hitting(attacker: &Fighter, target: &Fighter, range: f32) -> bool {
    let a = attacker.center();
    let t = target.center();
    let dx = (t.x - a.x) * attacker.facing.sign();
    let dy = (t.y - a.y).abs();
    dx > 0.0 && dx < range && dy < attacker.height() * VERTICAL_REACH_RATIO
}

impl Fighter {
    /// Basic strike: arms the attack cooldown and damages every target in reach
    pub fn attack(&mut self, targets: &mut [Fighter]) -> StrikeOutcome {
        if self.attack_timer > 0 {
            return StrikeOutcome::OnCooldown;
        }
        self.attack_timer = ATTACK_COOLDOWN;
        let hits = self.land(Strike::Basic, targets);
        StrikeOutcome::Swung { hits }
    }

    /// Special strike: arms its own cooldown and re-arms the basic strike's
    pub fn special(&mut self, targets: &mut [Fighter]) -> StrikeOutcome {
        if self.special_timer > 0 {
            return StrikeOutcome::OnCooldown;
        }
        self.special_timer = SPECIAL_COOLDOWN;
        self.attack_timer = SPECIAL_ATTACK_LOCK;
        let hits = self.land(Strike::Special, targets);
        StrikeOutcome::Swung { hits }
    }

    fn land(&self, strike: Strike, targets: &mut [Fighter]) -> usize {
        let mut hits = 0;
        for target in targets.iter_mut() {
            if is_hitting(self, target, strike.range()) {
                target.take_damage(strike.damage());
                hits += 1;
                log::debug!(
                    "{:?} {:?} strike hit {:?} (health {})",
                    self.role,
                    strike,
                    target.role,
                    target.health
                );
            }
        }
        hits
    }
}
