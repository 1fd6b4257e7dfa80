//! Error types for configuration, generation and player actions.

use thiserror::Error;

use crate::locations::LocationKind;
use crate::maze::MazeError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("maze width and height must be positive, got {width}x{height}")]
    NonPositiveDimensions { width: i64, height: i64 },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    /// The outer placement loop ran out of rounds for one location type.
    #[error("could not place location {kind} after {rounds} rounds")]
    PlacementExhausted { kind: LocationKind, rounds: usize },
}

/// Player-level failures. None of them change the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no player named '{0}'")]
    UnknownPlayer(String),
    #[error("a player named '{0}' already exists")]
    DuplicatePlayer(String),
    #[error("player names must be a single non-empty word, got '{0}'")]
    InvalidPlayerName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::NonPositiveDimensions { width: 0, height: 5 };
        assert_eq!(err.to_string(), "maze width and height must be positive, got 0x5");

        let err = GenerationError::PlacementExhausted { kind: LocationKind::Arsenal, rounds: 3 };
        assert_eq!(err.to_string(), "could not place location ARSENAL after 3 rounds");

        let err = SessionError::InvalidPlayerName("two words".to_string());
        assert_eq!(err.to_string(), "player names must be a single non-empty word, got 'two words'");
    }
}
