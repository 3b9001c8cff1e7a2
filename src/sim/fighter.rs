//! Fighter entity: movement, physics and timers
//!
//! Strikes live in `combat`; intent production lives in `control`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::control::{Controller, Intent};
use crate::consts::*;

/// Horizontal orientation. Strikes reach in this direction and sprites mirror by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for Left, +1.0 for Right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Face along a horizontal offset; zero counts as Left
    #[inline]
    pub fn toward(dx: f32) -> Self {
        if dx > 0.0 { Facing::Right } else { Facing::Left }
    }
}

/// Who feeds this fighter's intent. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    PlayerControlled,
    PolicyControlled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    /// Top-left anchor of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub health: u32,
    pub max_health: u32,
    pub on_ground: bool,
    /// Basic strike cooldown (ticks)
    pub attack_timer: u32,
    /// Special strike cooldown (ticks)
    pub special_timer: u32,
    /// Hurt flash (ticks, visual only)
    pub hurt_timer: u32,
    pub role: Role,
    /// Decision clock, advanced only for scripted fighters
    pub ai_counter: u64,
}

impl Fighter {
    pub fn new(role: Role, pos: Vec2, facing: Facing) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(FIGHTER_WIDTH, FIGHTER_HEIGHT),
            facing,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            on_ground: false,
            attack_timer: 0,
            special_timer: 0,
            hurt_timer: 0,
            role,
            ai_counter: 0,
        }
    }

    /// Create a fighter at its role's spawn point, resting on the ground and
    /// facing the other spawn.
    pub fn spawn(role: Role, arena: &Arena) -> Self {
        let (ratio, facing) = match role {
            Role::PlayerControlled => (PLAYER_SPAWN_RATIO, Facing::Right),
            Role::PolicyControlled => (OPPONENT_SPAWN_RATIO, Facing::Left),
        };
        let x = (arena.width() * ratio).min(arena.max_x(FIGHTER_WIDTH));
        let y = arena.ground_y(FIGHTER_HEIGHT);
        Self::new(role, Vec2::new(x, y), facing)
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Fraction of health left, in [0, 1]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Jump if grounded. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = JUMP_VELOCITY;
        self.on_ground = false;
        true
    }

    /// Lose health (saturating at zero) and start the hurt flash.
    ///
    /// The flash grants no invulnerability; the next hit lands normally.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        self.hurt_timer = HURT_FLASH;
    }

    /// Advance this fighter by one frame.
    ///
    /// Order: timers count down, the controller produces an intent, the intent
    /// is applied (strikes resolve against `opponents` immediately), then
    /// physics integrates and clamps to the arena.
    pub fn update(
        &mut self,
        controller: &mut dyn Controller,
        opponents: &mut [Fighter],
        arena: &Arena,
    ) {
        self.tick_timers();

        if controller.paced() {
            self.ai_counter = self.ai_counter.wrapping_add(1);
        }
        let intent = controller.decide(self, opponents);
        self.apply_intent(&intent, opponents);

        self.integrate(arena);
    }

    fn tick_timers(&mut self) {
        self.attack_timer = self.attack_timer.saturating_sub(1);
        self.hurt_timer = self.hurt_timer.saturating_sub(1);
        self.special_timer = self.special_timer.saturating_sub(1);
    }

    fn apply_intent(&mut self, intent: &Intent, opponents: &mut [Fighter]) {
        if let Some(vx) = intent.vx {
            self.vel.x = vx;
        }
        if let Some(facing) = intent.facing {
            self.facing = facing;
        }
        if intent.jump {
            self.jump();
        }
        if intent.attack {
            self.attack(opponents);
        }
        if intent.special {
            self.special(opponents);
        }
    }

    /// Gravity, Euler step, then clamp into the arena
    pub fn integrate(&mut self, arena: &Arena) {
        self.vel.y += GRAVITY;
        self.pos += self.vel;

        let ground = arena.ground_y(self.size.y);
        if self.pos.y >= ground {
            self.pos.y = ground;
            self.vel.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        // Ceiling only matters in very short arenas
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.max(0.0);
        }

        self.pos.x = self.pos.x.clamp(0.0, arena.max_x(self.size.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(800.0, 500.0).unwrap()
    }

    /// Controller replaying a fixed intent every frame
    struct Fixed(Intent);

    impl Controller for Fixed {
        fn decide(&mut self, _me: &Fighter, _targets: &[Fighter]) -> Intent {
            self.0
        }
    }

    fn grounded(arena: &Arena, x: f32) -> Fighter {
        let mut f = Fighter::new(
            Role::PlayerControlled,
            Vec2::new(x, arena.ground_y(FIGHTER_HEIGHT)),
            Facing::Right,
        );
        f.on_ground = true;
        f
    }

    #[test]
    fn test_spawn_positions() {
        let arena = arena();
        let player = Fighter::spawn(Role::PlayerControlled, &arena);
        let enemy = Fighter::spawn(Role::PolicyControlled, &arena);

        assert!(player.pos.abs_diff_eq(Vec2::new(120.0, 304.0), 1e-3));
        assert!(enemy.pos.abs_diff_eq(Vec2::new(520.0, 304.0), 1e-3));
        assert_eq!(player.pos.y, arena.ground_y(FIGHTER_HEIGHT));
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(enemy.facing, Facing::Left);
        assert_eq!(player.health, 100);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_landing_clamps_to_ground() {
        let arena = arena();
        let ground = arena.ground_y(FIGHTER_HEIGHT);
        let mut f = grounded(&arena, 100.0);
        f.pos.y = ground - 1.0;
        f.vel.y = 5.0;
        f.on_ground = false;

        f.update(&mut Fixed(Intent::idle()), &mut [], &arena);

        assert_eq!(f.pos.y, ground);
        assert_eq!(f.vel.y, 0.0);
        assert!(f.on_ground);
    }

    #[test]
    fn test_gravity_applies_every_frame() {
        let arena = arena();
        let mut f = grounded(&arena, 100.0);
        f.pos.y = 0.0;
        f.vel.y = 0.0;
        f.integrate(&arena);
        assert!((f.vel.y - GRAVITY).abs() < 1e-6);
        assert!((f.pos.y - GRAVITY).abs() < 1e-6);
        assert!(!f.on_ground);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let arena = arena();
        let mut f = grounded(&arena, 100.0);
        assert!(f.jump());
        assert_eq!(f.vel.y, JUMP_VELOCITY);
        assert!(!f.on_ground);
        // Airborne: no double jump
        assert!(!f.jump());

        // Land again, then jump works
        for _ in 0..200 {
            f.integrate(&arena);
        }
        assert!(f.on_ground);
        assert!(f.jump());
    }

    #[test]
    fn test_horizontal_clamp() {
        let arena = arena();
        let mut f = grounded(&arena, 2.0);
        f.vel.x = -4.0;
        f.integrate(&arena);
        assert_eq!(f.pos.x, 0.0);

        f.pos.x = arena.max_x(FIGHTER_WIDTH) - 1.0;
        f.vel.x = 4.0;
        f.integrate(&arena);
        assert_eq!(f.pos.x, arena.max_x(FIGHTER_WIDTH));
    }

    #[test]
    fn test_ceiling_clamp_in_short_arena() {
        let arena = Arena::new(400.0, 90.0).unwrap();
        let mut f = grounded(&arena, 10.0);
        f.jump();
        for _ in 0..60 {
            f.integrate(&arena);
            assert!(f.pos.y >= 0.0);
            assert!(f.pos.y <= arena.ground_y(FIGHTER_HEIGHT));
        }
    }

    #[test]
    fn test_take_damage_saturates() {
        let arena = arena();
        let mut f = grounded(&arena, 100.0);
        f.take_damage(30);
        assert_eq!(f.health, 70);
        assert_eq!(f.hurt_timer, HURT_FLASH);
        f.take_damage(500);
        assert_eq!(f.health, 0);
        assert!(f.is_defeated());
        assert_eq!(f.health_ratio(), 0.0);
    }

    #[test]
    fn test_timers_count_down_once_per_frame() {
        let arena = arena();
        let mut f = grounded(&arena, 100.0);
        f.attack_timer = 2;
        f.special_timer = 1;
        f.hurt_timer = 0;

        f.update(&mut Fixed(Intent::idle()), &mut [], &arena);
        assert_eq!((f.attack_timer, f.special_timer, f.hurt_timer), (1, 0, 0));

        f.update(&mut Fixed(Intent::idle()), &mut [], &arena);
        assert_eq!((f.attack_timer, f.special_timer, f.hurt_timer), (0, 0, 0));
    }

    #[test]
    fn test_unpaced_controller_leaves_ai_counter() {
        let arena = arena();
        let mut f = grounded(&arena, 100.0);
        f.update(&mut Fixed(Intent::idle()), &mut [], &arena);
        assert_eq!(f.ai_counter, 0);
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::toward(3.0), Facing::Right);
        assert_eq!(Facing::toward(-3.0), Facing::Left);
        assert_eq!(Facing::toward(0.0), Facing::Left);
    }
}
