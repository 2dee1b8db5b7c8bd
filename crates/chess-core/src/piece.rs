//! Piece kinds.

use crate::Color;
use std::fmt;

/// The six kinds of chess piece.
///
/// A piece on the board is a `(PieceKind, Color)` pair plus the square it
/// stands on; there is no per-piece state beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All kinds, in index order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in generation order, queen first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Array index (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in FEN and move text.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN letter into kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Self::from_char(c.to_ascii_lowercase()) {
            Some(kind) => Some((kind, color)),
            None => None,
        }
    }

    /// Parses a lowercase piece letter.
    pub const fn from_char(c: char) -> Option<PieceKind> {
        match c {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// True for bishop, rook and queen.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// True for the kinds a pawn may promote to.
    #[inline]
    pub const fn is_promotable(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_chars_roundtrip() {
        for kind in PieceKind::ALL {
            for color in Color::ALL {
                let c = kind.to_fen_char(color);
                assert_eq!(PieceKind::from_fen_char(c), Some((kind, color)));
            }
        }
        assert_eq!(PieceKind::Knight.to_fen_char(Color::White), 'N');
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn promotion_order_is_queen_first() {
        assert_eq!(PieceKind::PROMOTIONS[0], PieceKind::Queen);
        assert!(PieceKind::PROMOTIONS.iter().all(|k| k.is_promotable()));
        assert!(!PieceKind::Pawn.is_promotable());
        assert!(!PieceKind::King.is_promotable());
    }

    #[test]
    fn sliders() {
        let sliders: Vec<_> = PieceKind::ALL.into_iter().filter(|k| k.is_slider()).collect();
        assert_eq!(
            sliders,
            vec![PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        );
    }
}
