// src/error.rs

/// Failures surfaced to the caller. None of these are retried or replaced
/// with a default value inside the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Tile-count invariant violated (too many copies, too many tiles or melds).
    #[error("invalid hand: {0}")]
    InvalidHand(String),
    /// Tile kind or instance id outside its domain.
    #[error("invalid tile: {0}")]
    InvalidTile(String),
    /// A discard was requested for a hand with no tiles.
    #[error("no tile in hand to discard")]
    EmptyHand,
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = EvalError::InvalidTile("kind id 40".into());
        assert_eq!(e.to_string(), "invalid tile: kind id 40");
        assert_eq!(EvalError::EmptyHand.to_string(), "no tile in hand to discard");
    }
}
