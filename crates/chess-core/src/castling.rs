//! Castling rights.

use crate::{Color, Square};
use std::fmt;

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Home square of the rook that castles on this wing.
    #[inline]
    pub const fn rook_home(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => Square::H1,
            (Color::White, CastleSide::Queenside) => Square::A1,
            (Color::Black, CastleSide::Kingside) => Square::H8,
            (Color::Black, CastleSide::Queenside) => Square::A8,
        }
    }

    /// Square the rook lands on after castling.
    #[inline]
    pub const fn rook_target(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => Square::F1,
            (Color::White, CastleSide::Queenside) => Square::D1,
            (Color::Black, CastleSide::Kingside) => Square::F8,
            (Color::Black, CastleSide::Queenside) => Square::D8,
        }
    }

    /// Square the king lands on after castling.
    #[inline]
    pub const fn king_target(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => Square::G1,
            (Color::White, CastleSide::Queenside) => Square::C1,
            (Color::Black, CastleSide::Kingside) => Square::G8,
            (Color::Black, CastleSide::Queenside) => Square::C8,
        }
    }

    /// Home square of the king.
    #[inline]
    pub const fn king_home(color: Color) -> Square {
        match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }
}

/// The four castling flags.
///
/// Rights are only ever removed during play; nothing in the move applier
/// grants one back (undo restores a snapshot instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Returns a copy with the given right added. Used when building
    /// positions, never by the move applier.
    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> Self {
        CastlingRights(self.0 | Self::flag(color, side))
    }

    /// Removes one right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// Removes whichever right is tied to a rook standing on `sq`.
    ///
    /// Called for both the departure and the arrival square of every move,
    /// which covers rooks leaving home and rooks captured at home.
    #[inline]
    pub fn remove_for_rook_square(&mut self, sq: Square) {
        for color in Color::ALL {
            for side in CastleSide::BOTH {
                if side.rook_home(color) == sq {
                    self.remove(color, side);
                }
            }
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`).
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut rights = Self::NONE;
        for c in field.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                _ => return None,
            };
            rights = rights.with(color, side);
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (color, side, c) in [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ] {
            if self.has(color, side) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
