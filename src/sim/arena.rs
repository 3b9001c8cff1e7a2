//! Arena geometry
//!
//! The arena is re-queried from the drawing surface every frame so the
//! playfield follows window resizes. Physics cannot run without valid bounds,
//! so construction validates and fails instead of clamping.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Validate surface dimensions and build the arena
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(GameError::InvalidArena { width, height });
        }
        if width < FIGHTER_WIDTH || height * GROUND_RATIO < FIGHTER_HEIGHT {
            return Err(GameError::ArenaTooSmall { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Y coordinate of the ground line
    pub fn ground_line(&self) -> f32 {
        self.height * GROUND_RATIO
    }

    /// Resting y for the top-left anchor of a body of the given height
    pub fn ground_y(&self, body_height: f32) -> f32 {
        self.ground_line() - body_height
    }

    /// Largest x for the top-left anchor of a body of the given width
    pub fn max_x(&self, body_width: f32) -> f32 {
        self.width - body_width
    }
}
