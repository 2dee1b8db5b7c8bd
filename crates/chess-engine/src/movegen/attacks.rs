//! Attack sets for every piece type.
//!
//! Knight, king and pawn attacks are looked up in tables built at compile
//! time from offset lists. Sliding pieces march along their rays with the
//! masked bitboard shifts and stop at the first occupied square, which is
//! included so captures fall out of the same set.

use crate::{Bitboard, Direction};
use chess_core::{Color, PieceKind, Rank, Square};

/// (rank delta, file delta) pairs.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const WHITE_PAWN_OFFSETS: [(i8, i8); 2] = [(1, -1), (1, 1)];
const BLACK_PAWN_OFFSETS: [(i8, i8); 2] = [(-1, -1), (-1, 1)];

const KNIGHT_ATTACKS: [Bitboard; 64] = offset_table(&KNIGHT_OFFSETS);
const KING_ATTACKS: [Bitboard; 64] = offset_table(&KING_OFFSETS);

/// Indexed `[color][square]`.
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    offset_table(&WHITE_PAWN_OFFSETS),
    offset_table(&BLACK_PAWN_OFFSETS),
];

/// Builds a per-square table of the targets reachable with one of `offsets`,
/// skipping any that would leave the board.
const fn offset_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (dr, df) = offsets[i];
            let r = rank + dr;
            let f = file + df;
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Diagonal capture targets of a `color` pawn on `sq`.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Squares along one ray from `from`, up to and including the first blocker.
pub fn ray_attacks(from: Square, occupied: Bitboard, direction: Direction) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    let mut ray = Bitboard::from_square(from).shift(direction);
    while ray.is_not_empty() {
        attacks |= ray;
        if (ray & occupied).is_not_empty() {
            break;
        }
        ray = ray.shift(direction);
    }
    attacks
}

fn slider_attacks(from: Square, occupied: Bitboard, directions: &[Direction]) -> Bitboard {
    directions
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(from, occupied, dir))
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, &Direction::DIAGONAL)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, &Direction::ORTHOGONAL)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Forward pushes of a `color` pawn on `sq`: one step if empty, and a
/// second from the start rank if both squares are empty.
pub fn pawn_pushes(sq: Square, color: Color, occupied: Bitboard) -> Bitboard {
    let empty = !occupied;
    let from = Bitboard::from_square(sq);
    let (single, start_rank) = match color {
        Color::White => (from.north() & empty, Bitboard::rank(Rank::R3)),
        Color::Black => (from.south() & empty, Bitboard::rank(Rank::R6)),
    };
    let double = match color {
        Color::White => (single & start_rank).north() & empty,
        Color::Black => (single & start_rank).south() & empty,
    };
    single | double
}

/// Squares a `kind` piece of `color` on `from` attacks, given `occupied`.
///
/// For pawns this is the capture pattern only; pushes are not attacks.
pub fn attacks(kind: PieceKind, color: Color, from: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(from, color),
        PieceKind::Knight => knight_attacks(from),
        PieceKind::Bishop => bishop_attacks(from, occupied),
        PieceKind::Rook => rook_attacks(from, occupied),
        PieceKind::Queen => queen_attacks(from, occupied),
        PieceKind::King => king_attacks(from),
    }
}
