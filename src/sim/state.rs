//! Match state machine
//!
//! One `Match` is the whole session: the current phase, the running score and
//! the two live fighters. Restarting replaces the fighters but keeps the score.

use rand::RngCore;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::control::{KeyboardPilot, KeySource, ScriptedPolicy};
use super::fighter::{Fighter, Role};
use crate::settings::KeyBindings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the first start command
    Start,
    /// Simulation running
    Playing,
    /// Opponent defeated; waiting for restart
    Win,
    /// Player defeated; waiting for restart
    Lose,
}

impl MatchPhase {
    /// Whether a start/restart command is accepted in this phase
    pub fn accepts_restart(self) -> bool {
        !matches!(self, MatchPhase::Playing)
    }
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

pub struct Match<R = Pcg32> {
    phase: MatchPhase,
    /// Matches won this session
    score: u32,
    /// Frames simulated in the current match
    frame: u64,
    pub player: Fighter,
    pub opponent: Fighter,
    policy: ScriptedPolicy<R>,
}

impl Match<Pcg32> {
    /// New session with a seeded opponent
    pub fn seeded(arena: &Arena, seed: u64) -> Self {
        Self::new(arena, ScriptedPolicy::seeded(seed))
    }
}

impl<R: RngCore> Match<R> {
    /// New session in the `Start` phase, fighters at their spawn points
    pub fn new(arena: &Arena, policy: ScriptedPolicy<R>) -> Self {
        Self {
            phase: MatchPhase::Start,
            score: 0,
            frame: 0,
            player: Fighter::spawn(Role::PlayerControlled, arena),
            opponent: Fighter::spawn(Role::PolicyControlled, arena),
            policy,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_playing(&self) -> bool {
        self.phase == MatchPhase::Playing
    }

    pub fn policy_mut(&mut self) -> &mut ScriptedPolicy<R> {
        &mut self.policy
    }

    /// Start or restart: respawn both fighters and enter `Playing`.
    ///
    /// Ignored while a match is in progress. Returns whether it took effect.
    pub fn restart(&mut self, arena: &Arena) -> bool {
        if !self.phase.accepts_restart() {
            log::warn!("restart ignored while playing");
            return false;
        }
        self.player = Fighter::spawn(Role::PlayerControlled, arena);
        self.opponent = Fighter::spawn(Role::PolicyControlled, arena);
        self.frame = 0;
        self.phase = MatchPhase::Playing;
        log::info!("match started (score {})", self.score);
        true
    }

    /// Update both fighters for one frame: the player from the key map, then
    /// the opponent from its policy. No-op outside `Playing`.
    pub fn step_fighters<K: KeySource + ?Sized>(
        &mut self,
        keys: &K,
        bindings: &KeyBindings,
        arena: &Arena,
    ) {
        if !self.is_playing() {
            return;
        }
        self.frame += 1;

        let mut pilot = KeyboardPilot::new(keys, bindings);
        let targets = std::slice::from_mut(&mut self.opponent);
        self.player.update(&mut pilot, targets, arena);
        let targets = std::slice::from_mut(&mut self.player);
        self.opponent.update(&mut self.policy, targets, arena);

        log::trace!(
            "frame {}: player {:?} hp {} / opponent {:?} hp {}",
            self.frame,
            self.player.pos,
            self.player.health,
            self.opponent.pos,
            self.opponent.health
        );
    }

    /// Termination check. The opponent is checked first, so a double knockout
    /// counts as a win.
    pub fn resolve(&mut self) -> Option<Outcome> {
        if !self.is_playing() {
            return None;
        }
        if self.opponent.is_defeated() {
            self.score += 1;
            self.phase = MatchPhase::Win;
            log::info!("match won after {} frames (score {})", self.frame, self.score);
            return Some(Outcome::Win);
        }
        if self.player.is_defeated() {
            self.phase = MatchPhase::Lose;
            log::info!("match lost after {} frames (score {})", self.frame, self.score);
            return Some(Outcome::Lose);
        }
        None
    }

    /// One full simulation frame without any drawing
    pub fn tick<K: KeySource + ?Sized>(
        &mut self,
        keys: &K,
        bindings: &KeyBindings,
        arena: &Arena,
    ) -> Option<Outcome> {
        self.step_fighters(keys, bindings, arena);
        self.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Keys(HashSet<String>);

    impl KeySource for Keys {
        fn is_down(&self, key: &str) -> bool {
            self.0.contains(key)
        }
    }

    fn arena() -> Arena {
        Arena::new(800.0, 500.0).unwrap()
    }

    #[test]
    fn test_starts_waiting() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        assert_eq!(m.phase(), MatchPhase::Start);

        // Ticking before start does nothing
        assert_eq!(m.tick(&Keys::default(), &KeyBindings::default(), &arena), None);
        assert_eq!(m.frame(), 0);

        assert!(m.restart(&arena));
        assert_eq!(m.phase(), MatchPhase::Playing);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.player.health = 40;
        assert!(!m.restart(&arena));
        assert_eq!(m.player.health, 40);
    }

    #[test]
    fn test_opponent_knockout_wins() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.opponent.health = 0;

        let outcome = m.tick(&Keys::default(), &KeyBindings::default(), &arena);
        assert_eq!(outcome, Some(Outcome::Win));
        assert_eq!(m.phase(), MatchPhase::Win);
        assert_eq!(m.score(), 1);
    }

    #[test]
    fn test_double_knockout_counts_as_win() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.opponent.health = 0;
        m.player.health = 0;

        assert_eq!(m.resolve(), Some(Outcome::Win));
        assert_eq!(m.score(), 1);
    }

    #[test]
    fn test_simultaneous_knockout_in_one_tick_counts_as_win() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.player.health = ATTACK_DAMAGE;
        m.opponent.health = ATTACK_DAMAGE;
        m.opponent.pos.x = m.player.pos.x + 50.0;
        // The opponent's clock lands on its attack period this frame
        m.opponent.ai_counter = AI_ATTACK_PERIOD - 1;

        let mut keys = Keys::default();
        keys.0.insert("z".to_string());
        let outcome = m.tick(&keys, &KeyBindings::default(), &arena);

        assert_eq!(m.player.health, 0);
        assert_eq!(m.opponent.health, 0);
        assert_eq!(outcome, Some(Outcome::Win));
        assert_eq!(m.phase(), MatchPhase::Win);
        assert_eq!(m.score(), 1);
    }

    #[test]
    fn test_loss_keeps_score_and_restart_resets_fighters() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.opponent.health = 0;
        m.resolve();
        assert_eq!(m.score(), 1);

        m.restart(&arena);
        m.player.health = 0;
        m.player.pos.x = 700.0;
        assert_eq!(m.resolve(), Some(Outcome::Lose));
        assert_eq!(m.phase(), MatchPhase::Lose);
        assert_eq!(m.score(), 1);

        // Terminal: further ticks change nothing
        assert_eq!(m.tick(&Keys::default(), &KeyBindings::default(), &arena), None);

        assert!(m.restart(&arena));
        assert_eq!(m.phase(), MatchPhase::Playing);
        assert_eq!(m.player.health, MAX_HEALTH);
        assert_eq!(m.opponent.health, MAX_HEALTH);
        assert_eq!(m.player.pos, Fighter::spawn(Role::PlayerControlled, &arena).pos);
        assert_eq!(m.opponent.pos, Fighter::spawn(Role::PolicyControlled, &arena).pos);
        assert_eq!(m.score(), 1);
    }

    #[test]
    fn test_player_strike_lands_through_tick() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 1);
        m.restart(&arena);
        m.opponent.pos.x = m.player.pos.x + 50.0;

        let mut keys = Keys::default();
        keys.0.insert("z".to_string());
        m.tick(&keys, &KeyBindings::default(), &arena);

        assert_eq!(m.opponent.health, MAX_HEALTH - ATTACK_DAMAGE);
        assert_eq!(m.player.attack_timer, ATTACK_COOLDOWN);

        // Held key: no second hit until the cooldown runs out
        for _ in 0..(ATTACK_COOLDOWN - 1) {
            m.player.pos.x = m.opponent.pos.x - 50.0;
            m.tick(&keys, &KeyBindings::default(), &arena);
        }
        assert_eq!(m.opponent.health, MAX_HEALTH - ATTACK_DAMAGE);
    }

    #[test]
    fn test_scripted_opponent_eventually_wins_against_idle_player() {
        let arena = arena();
        let mut m = Match::seeded(&arena, 42);
        m.restart(&arena);
        let keys = Keys::default();
        let bindings = KeyBindings::default();

        let mut outcome = None;
        for _ in 0..20_000 {
            outcome = m.tick(&keys, &bindings, &arena);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(Outcome::Lose));
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn test_same_seed_same_match() {
        let arena = arena();
        let keys = Keys::default();
        let bindings = KeyBindings::default();
        let mut a = Match::seeded(&arena, 99);
        let mut b = Match::seeded(&arena, 99);
        a.restart(&arena);
        b.restart(&arena);
        for _ in 0..500 {
            a.tick(&keys, &bindings, &arena);
            b.tick(&keys, &bindings, &arena);
        }
        assert_eq!(a.player.health, b.player.health);
        assert_eq!(a.opponent.pos, b.opponent.pos);
        assert_eq!(a.opponent.vel, b.opponent.vel);
    }
}
