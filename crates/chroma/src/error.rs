//! # Game Error Types

use thiserror::Error;

/// Errors that can occur while loading or running a game.
#[derive(Error, Debug)]
pub enum GameError {
    /// The stage file is not valid TOML for the expected schema.
    #[error("failed to parse stage file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The stage file parsed but describes an unusable stage.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
