//! Shape generation for the arena and fighters

use glam::Vec2;

use super::{Color, RenderSurface};
use crate::consts::GROUND_RATIO;
use crate::sim::{Fighter, Role};

const SKY_TOP: Color = Color::rgb(13, 13, 43);
const SKY_BOTTOM: Color = Color::rgb(26, 26, 78);
const MOON: Color = Color::rgba(255, 248, 200, 0.9);
const STAR: Color = Color::rgba(255, 255, 255, 0.7);
const MOUNTAINS: Color = Color::rgb(22, 33, 62);
const GROUND_TOP: Color = Color::rgb(45, 45, 68);
const GROUND_BOTTOM: Color = Color::rgb(26, 26, 46);
const GROUND_LINE: Color = Color::rgba(255, 213, 79, 0.27);

const ACCENT: Color = Color::rgb(255, 213, 79);
const EYE: Color = Color::rgb(17, 17, 17);
const STRIKE_TRAIL: Color = Color::rgba(255, 255, 255, 0.35);

/// Star positions as fractions of (width, height)
const STARS: [(f32, f32); 8] = [
    (0.10, 0.08),
    (0.25, 0.05),
    (0.40, 0.12),
    (0.55, 0.04),
    (0.70, 0.09),
    (0.15, 0.18),
    (0.62, 0.15),
    (0.90, 0.22),
];

/// Mountain ridge as (x fraction of width, y fraction of the ground line)
const RIDGE: [(f32, f32); 8] = [
    (0.00, 1.00),
    (0.10, 0.55),
    (0.25, 0.75),
    (0.40, 0.45),
    (0.55, 0.65),
    (0.70, 0.40),
    (0.85, 0.60),
    (1.00, 0.50),
];

/// Strike trail shows for the first frames of the attack cooldown
const STRIKE_VISIBLE_ABOVE: u32 = 15;
/// Special ring shows for the first half of the special cooldown
const SPECIAL_VISIBLE_ABOVE: u32 = 30;

/// Night sky, moon, stars, mountains and ground
pub fn draw_background(surface: &mut dyn RenderSurface, w: f32, h: f32) {
    let ground = h * GROUND_RATIO;

    surface.fill_vertical_gradient(0.0, 0.0, w, ground, SKY_TOP, SKY_BOTTOM);
    surface.fill_arc(Vec2::new(w * 0.85, h * 0.12), 24.0, MOON);
    for (rx, ry) in STARS {
        surface.fill_arc(Vec2::new(rx * w, ry * h), 1.5, STAR);
    }

    let mut ridge: Vec<Vec2> = RIDGE
        .iter()
        .map(|&(rx, ry)| Vec2::new(rx * w, ry * ground))
        .collect();
    ridge.push(Vec2::new(w, ground));
    surface.fill_polygon(&ridge, MOUNTAINS);

    surface.fill_vertical_gradient(0.0, ground, w, h - ground, GROUND_TOP, GROUND_BOTTOM);
    surface.draw_line(Vec2::new(0.0, ground), Vec2::new(w, ground), 2.0, GROUND_LINE);
}

fn palette(role: Role) -> (Color, Color, Color, Color) {
    // (body, head, headband, special ring)
    match role {
        Role::PlayerControlled => (
            Color::rgb(0, 230, 118),
            Color::rgb(128, 203, 196),
            ACCENT,
            ACCENT,
        ),
        Role::PolicyControlled => (
            Color::rgb(255, 82, 82),
            Color::rgb(239, 154, 154),
            Color::rgb(255, 112, 67),
            Color::rgb(255, 87, 34),
        ),
    }
}

/// Draw a fighter in its own frame: origin at the body center, x mirrored by
/// facing so the sprite always "looks" along +x.
pub fn draw_fighter(surface: &mut dyn RenderSurface, fighter: &Fighter) {
    let (body, head, band, ring) = palette(fighter.role);
    let hurt = fighter.hurt_timer > 0;
    let w = fighter.width();
    let h = fighter.height();
    let center = fighter.center();

    surface.save();
    surface.translate(center.x, center.y);
    surface.scale(fighter.facing.sign(), 1.0);

    surface.fill_rect(-w / 2.0, -h / 2.0, w, h, if hurt { Color::WHITE } else { body });
    surface.fill_arc(
        Vec2::new(0.0, -h / 2.0 - 10.0),
        10.0,
        if hurt { Color::WHITE } else { head },
    );
    surface.fill_rect(3.0, -h / 2.0 - 14.0, 3.0, 3.0, EYE);
    surface.fill_rect(-10.0, -h / 2.0 - 13.0, 20.0, 4.0, band);

    if fighter.attack_timer > STRIKE_VISIBLE_ABOVE {
        surface.fill_rect(w / 2.0, -8.0, 24.0, 16.0, STRIKE_TRAIL);
    }
    if fighter.special_timer > SPECIAL_VISIBLE_ABOVE {
        surface.stroke_arc(Vec2::ZERO, w * 0.9, 3.0, ring);
    }

    surface.restore();
}
