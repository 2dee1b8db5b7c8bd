//! Board state.
//!
//! [`Board`] owns the twelve piece bitboards, the per-color occupancy caches
//! and the scalar state (side to move, castling rights, en-passant target,
//! move counters). It also owns the undo stack and the history of position
//! keys, so moves can be taken back and repetitions counted without any
//! outside bookkeeping.

mod key;
mod make;

pub use key::PositionKey;
pub use make::{MoveGuard, UndoRecord};

use crate::movegen::is_king_in_check;
use crate::Bitboard;
use chess_core::{CastleSide, CastlingRights, Color, Fen, FenError, Move, PieceKind, Square};
use std::fmt;

/// A chess position plus the history needed to unwind it.
///
/// Occupancy caches are only touched by the private `put`/`remove` helpers,
/// which keeps them equal to the union of the piece sets at all times.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [[Bitboard; 6]; 2],
    occupancy: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    undo_stack: Vec<UndoRecord>,
    key_history: Vec<PositionKey>,
}

impl Board {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_record(Fen::default())
    }

    /// Builds a board from a FEN string.
    ///
    /// Castling rights whose king or rook is not on its home square are
    /// dropped, as is an en-passant square no pawn could have just created.
    /// A position where the side not to move is in check is rejected.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::try_from(Fen::parse(fen)?)
    }

    /// The current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// The current position as a typed FEN record.
    pub fn to_fen_record(&self) -> Fen {
        let mut placement = [None; 64];
        for (index, slot) in placement.iter_mut().enumerate() {
            *slot = self.piece_at(Square::from_index_masked(index as u8));
        }
        Fen {
            placement,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            undo_stack: Vec::new(),
            key_history: Vec::new(),
        }
    }

    fn from_record(fen: Fen) -> Self {
        let mut board = Board::empty();
        for (index, slot) in fen.placement.iter().enumerate() {
            if let Some((kind, color)) = *slot {
                board.put(kind, color, Square::from_index_masked(index as u8));
            }
        }
        board.side_to_move = fen.side_to_move;
        board.castling = fen.castling;
        board.en_passant = fen.en_passant;
        board.halfmove_clock = fen.halfmove_clock;
        board.fullmove_number = fen.fullmove_number;
        board.sanitize_castling();
        board.sanitize_en_passant();
        board.key_history.push(board.position_key());
        board
    }

    /// Piece and color on `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(PieceKind, Color)> {
        let color = if self.occupancy[Color::White.index()].contains(sq) {
            Color::White
        } else if self.occupancy[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        self.kind_at(sq).map(|kind| (kind, color))
    }

    /// Kind of the piece on `sq`, regardless of color.
    pub fn kind_at(&self, sq: Square) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|kind| {
            (self.pieces[0][kind.index()] | self.pieces[1][kind.index()]).contains(sq)
        })
    }

    /// Squares holding `kind` pieces of `color`.
    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Squares holding `kind` pieces of either color.
    #[inline]
    pub fn pieces_of_kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[0][kind.index()] | self.pieces[1][kind.index()]
    }

    /// All squares occupied by `color`.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn white_occupied(&self) -> Bitboard {
        self.occupancy[Color::White.index()]
    }

    #[inline]
    pub fn black_occupied(&self) -> Bitboard {
        self.occupancy[Color::Black.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Square of `color`'s king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(PieceKind::King, color).scan_lowest()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Starts at 1 and increases after each Black move.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Number of moves that can currently be undone.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Moves made on this board since it was built, oldest first.
    pub fn move_history(&self) -> impl DoubleEndedIterator<Item = Move> + '_ {
        self.undo_stack.iter().map(|record| record.mv())
    }

    /// Undo records for the moves made so far, oldest first.
    ///
    /// Each record holds the state from just before its move: castling
    /// rights, en-passant target and half-move clock.
    pub fn undo_history(&self) -> &[UndoRecord] {
        &self.undo_stack
    }

    /// The most recently made move.
    pub fn last_move(&self) -> Option<Move> {
        self.undo_stack.last().map(|record| record.mv())
    }

    /// Key of the current position.
    pub fn position_key(&self) -> PositionKey {
        PositionKey::new(
            self.pieces,
            self.side_to_move,
            self.castling,
            self.en_passant,
        )
    }

    /// How many times the current position has occurred, counting now.
    ///
    /// Only the positions since the last capture or pawn move are searched;
    /// nothing earlier can match.
    pub fn repetition_count(&self) -> usize {
        let Some(current) = self.key_history.last() else {
            return 0;
        };
        let window = (self.halfmove_clock as usize + 1).min(self.key_history.len());
        self.key_history[self.key_history.len() - window..]
            .iter()
            .filter(|key| *key == current)
            .count()
    }

    /// Checks the representation invariants: the twelve piece sets are
    /// pairwise disjoint, each occupancy cache is the union of its color's
    /// sets, and each side has exactly one king.
    pub fn is_consistent(&self) -> bool {
        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let set = self.pieces(kind, color);
                if (seen & set).is_not_empty() {
                    return false;
                }
                seen |= set;
                union |= set;
            }
            if union != self.occupancy(color) {
                return false;
            }
            if self.pieces(PieceKind::King, color).count() != 1 {
                return false;
            }
        }
        true
    }

    #[inline]
    fn put(&mut self, kind: PieceKind, color: Color, sq: Square) {
        debug_assert!(!self.occupied().contains(sq), "{sq} already occupied");
        self.pieces[color.index()][kind.index()].set(sq);
        self.occupancy[color.index()].set(sq);
    }

    #[inline]
    fn remove(&mut self, kind: PieceKind, color: Color, sq: Square) {
        debug_assert!(
            self.pieces(kind, color).contains(sq),
            "no {color} {kind} on {sq}"
        );
        self.pieces[color.index()][kind.index()].clear(sq);
        self.occupancy[color.index()].clear(sq);
    }

    fn sanitize_castling(&mut self) {
        for color in Color::ALL {
            let king_home = self
                .pieces(PieceKind::King, color)
                .contains(CastleSide::king_home(color));
            for side in CastleSide::BOTH {
                let rook_home = self
                    .pieces(PieceKind::Rook, color)
                    .contains(side.rook_home(color));
                if !(king_home && rook_home) {
                    self.castling.remove(color, side);
                }
            }
        }
    }

    fn sanitize_en_passant(&mut self) {
        let Some(target) = self.en_passant else {
            return;
        };
        // The pawn that just double-pushed belongs to the side not to move.
        let mover = self.side_to_move.opposite();
        let step: i8 = match mover {
            Color::White => 1,
            Color::Black => -1,
        };
        let pawn_there = target
            .offset_rank(step)
            .is_some_and(|sq| self.pieces(PieceKind::Pawn, mover).contains(sq));
        let origin_empty = target
            .offset_rank(-step)
            .is_some_and(|sq| !self.occupied().contains(sq));
        if !pawn_there || !origin_empty || self.occupied().contains(target) {
            self.en_passant = None;
        }
    }
}

impl TryFrom<Fen> for Board {
    type Error = FenError;

    fn try_from(fen: Fen) -> Result<Self, FenError> {
        let board = Board::from_record(fen);
        let waiting = board.side_to_move.opposite();
        if is_king_in_check(&board, waiting) {
            return Err(FenError::OpponentInCheck(waiting));
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

/// Text diagram with rank 8 at the top, followed by the FEN.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let sq = Square::from_index_masked(rank * 8 + file);
                let c = match self.piece_at(sq) {
                    Some((kind, color)) => kind.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
