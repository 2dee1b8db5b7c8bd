//! Move generation.
//!
//! [`generate_pseudo_legal_moves`] produces every move that obeys piece
//! movement, captures, promotion, en passant and castling, without checking
//! whether the mover's own king is left attacked. The [`legal`] submodule
//! filters that list by playing each move and looking at the king.

pub mod attacks;
pub mod legal;
pub mod perft;

use crate::{Bitboard, Board};
use chess_core::{CastleSide, Color, Move, MoveFlag, PieceKind};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, pawn_pushes, queen_attacks,
    ray_attacks, rook_attacks,
};
pub use legal::{
    generate_legal_moves, has_legal_move, is_king_in_check, is_legal, is_square_attacked,
};
pub use perft::{perft, perft_divide};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocation during generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true, in order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every pseudo-legal move for the side to move.
///
/// Castling is the one exception to "pseudo": it is only emitted when the
/// king's square, the square it crosses and its destination are all safe.
pub fn generate_pseudo_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();

    generate_pawn_moves(board, &mut moves);
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(board, kind, &mut moves);
    }
    generate_castling_moves(board, &mut moves);

    moves
}

/// Pushes a pawn move, expanded into the four promotions (queen first) when
/// it reaches the last rank.
fn push_pawn_move(moves: &mut MoveList, m: Move, us: Color) {
    if m.to().rank().index() == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(m.with_promotion(kind));
        }
    } else {
        moves.push(m);
    }
}

fn generate_pawn_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.opposite();
    let occupied = board.occupied();
    let their_pieces = board.occupancy(them);

    for from in board.pieces(PieceKind::Pawn, us) {
        for to in pawn_pushes(from, us, occupied) {
            let flag = if from.rank().index().abs_diff(to.rank().index()) == 2 {
                MoveFlag::DoublePush
            } else {
                MoveFlag::Normal
            };
            push_pawn_move(moves, Move::new(from, to, PieceKind::Pawn, flag), us);
        }

        let targets = pawn_attacks(from, us);
        for to in targets & their_pieces {
            let m = Move::new(from, to, PieceKind::Pawn, MoveFlag::Normal)
                .with_captured(board.kind_at(to));
            push_pawn_move(moves, m, us);
        }

        if let Some(ep) = board.en_passant() {
            if targets.contains(ep) {
                moves.push(
                    Move::new(from, ep, PieceKind::Pawn, MoveFlag::EnPassant)
                        .with_capture(PieceKind::Pawn),
                );
            }
        }
    }
}

fn generate_piece_moves(board: &Board, kind: PieceKind, moves: &mut MoveList) {
    let us = board.side_to_move();
    let our_pieces = board.occupancy(us);
    let occupied = board.occupied();

    for from in board.pieces(kind, us) {
        for to in attacks::attacks(kind, us, from, occupied) & !our_pieces {
            moves.push(Move::new(from, to, kind, MoveFlag::Normal).with_captured(board.kind_at(to)));
        }
    }
}

fn generate_castling_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.opposite();
    let king_home = CastleSide::king_home(us);
    let occupied = board.occupied();

    if !board.pieces(PieceKind::King, us).contains(king_home) {
        return;
    }

    for side in CastleSide::BOTH {
        if !board.castling().has(us, side) {
            continue;
        }
        let rook_home = side.rook_home(us);
        if !board.pieces(PieceKind::Rook, us).contains(rook_home) {
            continue;
        }
        if (Bitboard::between_on_rank(king_home, rook_home) & occupied).is_not_empty() {
            continue;
        }

        let king_to = side.king_target(us);
        let king_path = Bitboard::between_on_rank(king_home, king_to)
            | Bitboard::from_square(king_home)
            | Bitboard::from_square(king_to);
        if king_path
            .into_iter()
            .any(|sq| is_square_attacked(board, sq, them))
        {
            continue;
        }

        let flag = match side {
            CastleSide::Kingside => MoveFlag::CastleKingside,
            CastleSide::Queenside => MoveFlag::CastleQueenside,
        };
        moves.push(Move::new(king_home, king_to, PieceKind::King, flag));
    }
}
