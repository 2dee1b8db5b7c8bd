//! Reversible move application.

use super::Board;
use crate::RulesError;
use chess_core::{CastlingRights, Color, Move, MoveFlag, PieceKind, Square};
use std::ops::Deref;
use tracing::trace;

/// State a move destroys, saved so it can be put back.
///
/// Placement is restored from the move itself; the full-move number is
/// recomputed from the side that moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    mv: Move,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

impl UndoRecord {
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Castling rights before the move.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// En-passant target before the move.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-move clock before the move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
}

impl Board {
    /// Applies `mv` for the side to move.
    ///
    /// The move must come from this board's move generator. Anything else is
    /// a caller bug; debug builds check the mover's piece and the board
    /// invariants afterwards.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opposite();
        debug_assert_eq!(
            self.piece_at(mv.from()),
            Some((mv.piece(), us)),
            "{mv:?} does not match {self:?}"
        );

        self.undo_stack.push(UndoRecord {
            mv,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        });

        if let Some(captured) = mv.captured() {
            self.remove(captured, them, mv.capture_square());
        }
        self.remove(mv.piece(), us, mv.from());
        self.put(mv.placed_piece(), us, mv.to());

        if let Some(side) = mv.flag().castle_side() {
            self.remove(PieceKind::Rook, us, side.rook_home(us));
            self.put(PieceKind::Rook, us, side.rook_target(us));
        }

        if mv.piece() == PieceKind::King {
            self.castling.remove_color(us);
        }
        self.castling.remove_for_rook_square(mv.from());
        self.castling.remove_for_rook_square(mv.to());

        self.en_passant = if mv.flag() == MoveFlag::DoublePush {
            Some(Square::from_index_masked(
                (mv.from().index() + mv.to().index()) / 2,
            ))
        } else {
            None
        };

        if mv.piece() == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;

        self.key_history.push(self.position_key());
        debug_assert!(self.is_consistent(), "inconsistent after {mv:?}: {self:?}");
    }

    /// Takes back the most recent move and returns it.
    pub fn unmake_move(&mut self) -> Result<Move, RulesError> {
        let record = self.undo_stack.pop().ok_or(RulesError::NoMoveToUndo)?;
        self.key_history.pop();

        let mv = record.mv;
        let us = self.side_to_move.opposite();
        let them = self.side_to_move;
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        if let Some(side) = mv.flag().castle_side() {
            self.remove(PieceKind::Rook, us, side.rook_target(us));
            self.put(PieceKind::Rook, us, side.rook_home(us));
        }
        self.remove(mv.placed_piece(), us, mv.to());
        self.put(mv.piece(), us, mv.from());
        if let Some(captured) = mv.captured() {
            self.put(captured, them, mv.capture_square());
        }

        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;

        debug_assert!(self.is_consistent(), "inconsistent after undoing {mv:?}");
        Ok(mv)
    }

    /// Makes `mv` and returns a guard that takes it back when dropped.
    pub fn probe(&mut self, mv: Move) -> MoveGuard<'_> {
        MoveGuard::new(self, mv)
    }
}

/// A move made for inspection only.
///
/// The board is readable through the guard; dropping the guard unmakes the
/// move, on every exit path. Guards nest through [`MoveGuard::probe`], and
/// the borrow checker keeps the nesting last-in first-out.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
}

impl<'a> MoveGuard<'a> {
    pub fn new(board: &'a mut Board, mv: Move) -> Self {
        board.make_move(mv);
        MoveGuard { board }
    }

    /// Probes a follow-up move from the guarded position.
    pub fn probe(&mut self, mv: Move) -> MoveGuard<'_> {
        MoveGuard::new(self.board, mv)
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        let undone = self.board.unmake_move();
        trace!(?undone, "probe released");
        debug_assert!(undone.is_ok());
    }
}
