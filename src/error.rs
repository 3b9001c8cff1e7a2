//! Crate error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid arena dimensions: {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    #[error("arena {width}x{height} cannot hold a fighter above the ground line")]
    ArenaTooSmall { width: f32, height: f32 },

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
