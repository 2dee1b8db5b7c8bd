//! Rule set abstraction and game status.
//!
//! The [`RuleSet`] trait is the interface outside callers drive the engine
//! through: list legal moves, apply and revert them, ask for the status.
//! [`StandardChess`] is the FIDE implementation; the free functions in this
//! module are shorthands for it.

mod standard;

pub use standard::{is_insufficient_material, StandardChess};

use crate::{Board, MoveList, RulesError};
use chess_core::{Color, Move, PieceKind, Square};
use std::fmt;

/// Why a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// No legal moves and not in check.
    Stalemate,
    /// 100 half-moves without a capture or pawn move.
    FiftyMoveRule,
    /// The same position for the third time.
    ThreefoldRepetition,
    /// Neither side can possibly mate.
    InsufficientMaterial,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::InsufficientMaterial => "insufficient material",
        };
        f.write_str(text)
    }
}

/// State of the game in the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Active,
    /// The given color is mated and has lost.
    Checkmate(Color),
    Draw(DrawReason),
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Active
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(self, GameStatus::Draw(_))
    }

    /// The winning color, if the game ended in mate.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate(loser) => Some(loser.opposite()),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Active => f.write_str("in progress"),
            GameStatus::Checkmate(loser) => {
                write!(f, "{} is checkmated, {} wins", loser, loser.opposite())
            }
            GameStatus::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

/// The operations a caller needs to run a game under some set of rules.
///
/// Methods take `&mut Board` wherever moves are probed; the board is always
/// returned to the state it was passed in.
///
/// # Example
///
/// ```
/// use chess_engine::{RuleSet, StandardChess};
///
/// let mut board = StandardChess.initial_board();
/// let moves = StandardChess.legal_moves(&mut board);
/// assert_eq!(moves.len(), 20);
/// ```
pub trait RuleSet {
    fn initial_board(&self) -> Board;

    fn legal_moves(&self, board: &mut Board) -> MoveList;

    fn is_legal(&self, board: &mut Board, m: Move) -> bool;

    /// Applies a move the caller knows to be legal.
    fn make_move(&self, board: &mut Board, m: Move);

    /// Reverts the last move and returns it.
    fn unmake_move(&self, board: &mut Board) -> Result<Move, RulesError>;

    /// Applies `m` if legal, otherwise leaves the board untouched.
    fn try_make_move(&self, board: &mut Board, m: Move) -> Result<(), RulesError> {
        if self.is_legal(board, m) {
            self.make_move(board, m);
            Ok(())
        } else {
            Err(RulesError::IllegalMove(m.to_text()))
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, board: &Board) -> bool;

    fn status(&self, board: &mut Board) -> GameStatus;

    fn is_game_over(&self, board: &mut Board) -> bool {
        self.status(board).is_over()
    }

    fn is_draw(&self, board: &mut Board) -> bool {
        self.status(board).is_draw()
    }

    fn is_insufficient_material(&self, board: &Board) -> bool;
}

/// Legal moves under standard rules.
pub fn legal_moves(board: &mut Board) -> MoveList {
    StandardChess.legal_moves(board)
}

/// Applies a legal move.
pub fn make_move(board: &mut Board, m: Move) {
    StandardChess.make_move(board, m)
}

/// Reverts the last move.
pub fn unmake_move(board: &mut Board) -> Result<Move, RulesError> {
    StandardChess.unmake_move(board)
}

/// Status under standard rules.
pub fn status(board: &mut Board) -> GameStatus {
    StandardChess.status(board)
}

/// Occupant of `sq`.
pub fn piece_at(board: &Board, sq: Square) -> Option<(PieceKind, Color)> {
    board.piece_at(sq)
}
