//! Fighter controllers
//!
//! A controller turns "what the world looks like right now" into an
//! [`Intent`] for one frame. The human side reads a live key map through
//! [`KeyboardPilot`]; the opponent runs [`ScriptedPolicy`]. Both produce the
//! same intent shape, so a fighter never needs to know who is driving it.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::fighter::{Facing, Fighter};
use crate::consts::*;
use crate::settings::KeyBindings;

/// Movement and action requests for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// New horizontal velocity; `None` keeps the current one
    pub vx: Option<f32>,
    /// New facing; `None` keeps the current one
    pub facing: Option<Facing>,
    pub jump: bool,
    pub attack: bool,
    pub special: bool,
}

impl Intent {
    /// Change nothing, request nothing
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Source of intent for one fighter
pub trait Controller {
    /// Whether the fighter's decision clock (`ai_counter`) advances before
    /// each decision
    fn paced(&self) -> bool {
        false
    }

    fn decide(&mut self, me: &Fighter, targets: &[Fighter]) -> Intent;
}

/// Read-only view of the pressed-key map
pub trait KeySource {
    fn is_down(&self, key: &str) -> bool;

    fn any_down(&self, keys: &[String]) -> bool {
        keys.iter().any(|k| self.is_down(k))
    }
}

/// Human controls: intent is re-derived from the keys held at the instant of
/// the read, with no momentum carried between frames.
pub struct KeyboardPilot<'a, K: KeySource + ?Sized> {
    keys: &'a K,
    bindings: &'a KeyBindings,
}

impl<'a, K: KeySource + ?Sized> KeyboardPilot<'a, K> {
    pub fn new(keys: &'a K, bindings: &'a KeyBindings) -> Self {
        Self { keys, bindings }
    }
}

impl<K: KeySource + ?Sized> Controller for KeyboardPilot<'_, K> {
    fn decide(&mut self, me: &Fighter, _targets: &[Fighter]) -> Intent {
        let mut intent = Intent {
            vx: Some(0.0),
            ..Intent::idle()
        };

        if self.keys.any_down(&self.bindings.left) {
            intent.vx = Some(-WALK_SPEED);
            intent.facing = Some(Facing::Left);
        }
        // Checked second, so right wins when both are held
        if self.keys.any_down(&self.bindings.right) {
            intent.vx = Some(WALK_SPEED);
            intent.facing = Some(Facing::Right);
        }

        intent.jump = me.on_ground && self.keys.any_down(&self.bindings.jump);
        intent.attack = self.keys.any_down(&self.bindings.attack);
        intent.special = self.keys.any_down(&self.bindings.special);
        intent
    }
}

/// Scripted opponent.
///
/// Keeps to distance bands around its nearest target and fires actions on
/// fixed tick periods of the fighter's decision clock. Only the jump is
/// random; swap in any `RngCore` to make it reproducible.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy<R = Pcg32> {
    rng: R,
}

impl ScriptedPolicy<Pcg32> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> ScriptedPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: RngCore> Controller for ScriptedPolicy<R> {
    fn paced(&self) -> bool {
        true
    }

    fn decide(&mut self, me: &Fighter, targets: &[Fighter]) -> Intent {
        let here = me.center().x;
        let Some(target) = targets.iter().min_by(|a, b| {
            (a.center().x - here)
                .abs()
                .partial_cmp(&(b.center().x - here).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        }) else {
            return Intent::idle();
        };

        let dx = target.center().x - here;
        let facing = Facing::toward(dx);
        let dist = dx.abs();

        let speed = if dist > AI_CHASE_DISTANCE {
            AI_CHASE_SPEED
        } else if dist < AI_RETREAT_DISTANCE {
            -AI_RETREAT_SPEED
        } else {
            AI_DRIFT_SPEED
        };

        let tick = me.ai_counter;
        let attack = tick % AI_ATTACK_PERIOD == 0 && dist < AI_ATTACK_DISTANCE;
        let special = tick % AI_SPECIAL_PERIOD == 0 && dist < AI_SPECIAL_DISTANCE;
        let jump = tick % AI_JUMP_PERIOD == 0 && self.rng.random_bool(AI_JUMP_CHANCE);

        if attack || special || jump {
            log::debug!(
                "policy tick {}: dist={:.1} attack={} special={} jump={}",
                tick,
                dist,
                attack,
                special,
                jump
            );
        }

        Intent {
            vx: Some(facing.sign() * speed),
            facing: Some(facing),
            jump,
            attack,
            special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Arena;
    use crate::sim::fighter::Role;
    use glam::Vec2;
    use std::collections::HashSet;

    /// RNG returning one constant; 0 always passes a chance roll, MAX never does
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(self.0 as u8);
        }
    }

    struct Keys(HashSet<&'static str>);

    impl KeySource for Keys {
        fn is_down(&self, key: &str) -> bool {
            self.0.contains(key)
        }
    }

    fn keys(pressed: &[&'static str]) -> Keys {
        Keys(pressed.iter().copied().collect())
    }

    fn at(role: Role, x: f32) -> Fighter {
        let mut f = Fighter::new(role, Vec2::new(x, 300.0), Facing::Left);
        f.on_ground = true;
        f
    }

    #[test]
    fn test_keyboard_directions() {
        let bindings = KeyBindings::default();
        let me = at(Role::PlayerControlled, 100.0);

        let held = keys(&["ArrowLeft"]);
        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert_eq!(intent.vx, Some(-WALK_SPEED));
        assert_eq!(intent.facing, Some(Facing::Left));

        let held = keys(&["d"]);
        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert_eq!(intent.vx, Some(WALK_SPEED));
        assert_eq!(intent.facing, Some(Facing::Right));

        let held = keys(&[]);
        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert_eq!(intent.vx, Some(0.0));
        assert_eq!(intent.facing, None);
    }

    #[test]
    fn test_right_overrides_left() {
        let bindings = KeyBindings::default();
        let me = at(Role::PlayerControlled, 100.0);
        let held = keys(&["ArrowLeft", "ArrowRight"]);
        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert_eq!(intent.vx, Some(WALK_SPEED));
        assert_eq!(intent.facing, Some(Facing::Right));
    }

    #[test]
    fn test_keyboard_jump_needs_ground() {
        let bindings = KeyBindings::default();
        let mut me = at(Role::PlayerControlled, 100.0);
        let held = keys(&[" ", "z", "x"]);

        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert!(intent.jump && intent.attack && intent.special);

        me.on_ground = false;
        let intent = KeyboardPilot::new(&held, &bindings).decide(&me, &[]);
        assert!(!intent.jump);
    }

    #[test]
    fn test_policy_distance_bands() {
        let mut policy = ScriptedPolicy::new(ConstRng(u64::MAX));
        let mut me = at(Role::PolicyControlled, 400.0);
        me.ai_counter = 1;

        // Far: chase at 2.2 toward the target on the left
        let far = [at(Role::PlayerControlled, 200.0)];
        let intent = policy.decide(&me, &far);
        assert_eq!(intent.facing, Some(Facing::Left));
        assert_eq!(intent.vx, Some(-AI_CHASE_SPEED));

        // Close: retreat at 1.5 away from it
        let close = [at(Role::PlayerControlled, 440.0)];
        let intent = policy.decide(&me, &close);
        assert_eq!(intent.facing, Some(Facing::Right));
        assert_eq!(intent.vx, Some(-AI_RETREAT_SPEED));

        // Mid band: drift in at 1.0
        let mid = [at(Role::PlayerControlled, 480.0)];
        let intent = policy.decide(&me, &mid);
        assert_eq!(intent.vx, Some(AI_DRIFT_SPEED));
    }

    #[test]
    fn test_policy_fires_on_period_boundaries() {
        let mut policy = ScriptedPolicy::new(ConstRng(u64::MAX));
        let mut me = at(Role::PolicyControlled, 400.0);
        let target = [at(Role::PlayerControlled, 320.0)];

        me.ai_counter = 39;
        assert!(!policy.decide(&me, &target).attack);
        me.ai_counter = 40;
        assert!(policy.decide(&me, &target).attack);

        me.ai_counter = 90;
        let intent = policy.decide(&me, &target);
        assert!(intent.special);
        assert!(!intent.attack);

        // 360 is a multiple of both: both fire in the same frame
        me.ai_counter = 360;
        let intent = policy.decide(&me, &target);
        assert!(intent.attack && intent.special);
    }

    #[test]
    fn test_policy_attack_gated_by_distance() {
        let mut policy = ScriptedPolicy::new(ConstRng(u64::MAX));
        let mut me = at(Role::PolicyControlled, 400.0);
        me.ai_counter = 360;
        // dist = 100: too far for the basic strike, close enough for the special
        let target = [at(Role::PlayerControlled, 300.0)];
        let intent = policy.decide(&me, &target);
        assert!(!intent.attack);
        assert!(intent.special);
    }

    #[test]
    fn test_policy_jump_uses_random_source() {
        let target = [at(Role::PlayerControlled, 100.0)];
        let mut me = at(Role::PolicyControlled, 400.0);
        me.ai_counter = 55;

        let mut always = ScriptedPolicy::new(ConstRng(0));
        assert!(always.decide(&me, &target).jump);

        let mut never = ScriptedPolicy::new(ConstRng(u64::MAX));
        assert!(!never.decide(&me, &target).jump);

        // Off-period ticks never jump
        me.ai_counter = 56;
        assert!(!always.decide(&me, &target).jump);
    }

    #[test]
    fn test_policy_without_targets_is_idle() {
        let mut policy = ScriptedPolicy::seeded(7);
        let me = at(Role::PolicyControlled, 400.0);
        assert_eq!(policy.decide(&me, &[]), Intent::idle());
    }

    #[test]
    fn test_policy_advances_clock_through_update() {
        let arena = Arena::new(800.0, 500.0).unwrap();
        let mut policy = ScriptedPolicy::seeded(7);
        let mut me = Fighter::spawn(Role::PolicyControlled, &arena);
        let mut targets = [Fighter::spawn(Role::PlayerControlled, &arena)];
        for _ in 0..3 {
            me.update(&mut policy, &mut targets, &arena);
        }
        assert_eq!(me.ai_counter, 3);
    }

    #[test]
    fn test_policy_faces_nearest_target() {
        let mut policy = ScriptedPolicy::new(ConstRng(u64::MAX));
        let me = at(Role::PolicyControlled, 400.0);
        let targets = [at(Role::PlayerControlled, 100.0), at(Role::PlayerControlled, 500.0)];
        assert_eq!(policy.decide(&me, &targets).facing, Some(Facing::Right));
    }
}
