//! Error type for rule operations.

use crate::rules::GameStatus;
use chess_core::{ParseError, SquareError};
use thiserror::Error;

/// Errors returned when a caller asks the engine for something the rules
/// do not allow. Invariant violations inside the engine are bugs and panic
/// instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error(transparent)]
    InvalidSquare(#[from] SquareError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no move to undo")]
    NoMoveToUndo,

    #[error("game has already ended: {0}")]
    GameOver(GameStatus),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DrawReason;

    #[test]
    fn messages() {
        assert_eq!(RulesError::NoMoveToUndo.to_string(), "no move to undo");
        assert_eq!(
            RulesError::IllegalMove("e2e5".into()).to_string(),
            "illegal move: e2e5"
        );
        assert_eq!(
            RulesError::GameOver(GameStatus::Draw(DrawReason::Stalemate)).to_string(),
            "game has already ended: draw by stalemate"
        );
    }

    #[test]
    fn wraps_core_errors() {
        let err: RulesError = SquareError::OutOfRange(64).into();
        assert!(matches!(err, RulesError::InvalidSquare(_)));
        let err: RulesError = ParseError::PromotionLetter('k').into();
        assert!(matches!(err, RulesError::Parse(_)));
    }
}
