//! Standard chess rules implementation.

use super::{DrawReason, GameStatus, RuleSet};
use crate::movegen::{generate_legal_moves, has_legal_move, is_king_in_check, is_legal};
use crate::{Bitboard, Board, MoveList, RulesError};
use chess_core::{Move, PieceKind};

/// Standard chess rules (FIDE), with the fifty-move and threefold
/// repetition draws applied automatically rather than on claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_board(&self) -> Board {
        Board::startpos()
    }

    fn legal_moves(&self, board: &mut Board) -> MoveList {
        generate_legal_moves(board)
    }

    fn is_legal(&self, board: &mut Board, m: Move) -> bool {
        is_legal(board, m)
    }

    fn make_move(&self, board: &mut Board, m: Move) {
        board.make_move(m);
    }

    fn unmake_move(&self, board: &mut Board) -> Result<Move, RulesError> {
        board.unmake_move()
    }

    fn is_check(&self, board: &Board) -> bool {
        is_king_in_check(board, board.side_to_move())
    }

    /// Mate and stalemate are decided first, so a mating move that also
    /// completes fifty moves or a third repetition still wins. The draw
    /// rules follow in order: dead material, fifty moves, repetition.
    fn status(&self, board: &mut Board) -> GameStatus {
        if !has_legal_move(board) {
            return if self.is_check(board) {
                GameStatus::Checkmate(board.side_to_move())
            } else {
                GameStatus::Draw(DrawReason::Stalemate)
            };
        }
        if is_insufficient_material(board) {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if board.halfmove_clock() >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }
        if board.repetition_count() >= 3 {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        GameStatus::Active
    }

    fn is_insufficient_material(&self, board: &Board) -> bool {
        is_insufficient_material(board)
    }
}

/// True when no sequence of legal moves can produce mate: king against
/// king, king and one minor piece against king, or kings and bishops only
/// with every bishop on the same square color.
pub fn is_insufficient_material(board: &Board) -> bool {
    let heavy = board.pieces_of_kind(PieceKind::Pawn)
        | board.pieces_of_kind(PieceKind::Rook)
        | board.pieces_of_kind(PieceKind::Queen);
    if heavy.is_not_empty() {
        return false;
    }

    let knights = board.pieces_of_kind(PieceKind::Knight);
    let bishops = board.pieces_of_kind(PieceKind::Bishop);
    if (knights | bishops).count() <= 1 {
        return true;
    }

    knights.is_empty()
        && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
            || (bishops & Bitboard::DARK_SQUARES).is_empty())
}
