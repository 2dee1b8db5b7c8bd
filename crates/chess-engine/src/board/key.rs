//! Exact position identity for repetition detection.

use crate::Bitboard;
use chess_core::{CastlingRights, Color, PieceKind, Square};
use std::fmt;

/// Everything that decides whether two positions are the same for the
/// repetition rule: placement, side to move, castling rights and en-passant
/// target. Move counters are left out.
///
/// The key stores the raw piece sets, so equal keys mean equal positions;
/// there are no hash collisions to worry about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl PositionKey {
    pub(crate) fn new(
        pieces: [[Bitboard; 6]; 2],
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Self {
        PositionKey {
            pieces: pieces.map(|sets| sets.map(|bb| bb.0)),
            side_to_move,
            castling,
            en_passant,
        }
    }

    fn piece_at(&self, sq: Square) -> Option<(PieceKind, Color)> {
        Color::ALL.into_iter().find_map(|color| {
            PieceKind::ALL
                .into_iter()
                .find(|kind| self.pieces[color.index()][kind.index()] & sq.bit() != 0)
                .map(|kind| (kind, color))
        })
    }
}

/// The first four FEN fields.
impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_index_masked(rank * 8 + file)) {
                    Some((kind, color)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", kind.to_fen_char(color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move.to_fen_char(), self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{}", sq),
            None => write!(f, "-"),
        }
    }
}
