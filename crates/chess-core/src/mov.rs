//! Move representation and move text.

use crate::{CastleSide, PieceKind, Square, SquareError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a move differs from a plain displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Plain move or capture (promotions included).
    Normal = 0,
    /// Pawn advancing two squares from its start rank.
    DoublePush = 1,
    /// O-O.
    CastleKingside = 2,
    /// O-O-O.
    CastleQueenside = 3,
    /// Pawn capture onto the en-passant target square.
    EnPassant = 4,
}

impl MoveFlag {
    /// The castling wing, if this is a castling flag.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            MoveFlag::CastleKingside => Some(CastleSide::Kingside),
            MoveFlag::CastleQueenside => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// A fully described move.
///
/// Carries everything the applier needs to perform and reverse it, so it
/// never refers back to the board it was generated on. Replay it through
/// `make_move` rather than reinterpreting its fields against another board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: PieceKind,
    captured: Option<PieceKind>,
    promotion: Option<PieceKind>,
    flag: MoveFlag,
}

impl Move {
    /// Placeholder used to fill fixed-size move buffers. Not a real move.
    pub const NULL: Move = Move::new(Square::A1, Square::A1, PieceKind::Pawn, MoveFlag::Normal);

    /// A move without capture or promotion.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: PieceKind, flag: MoveFlag) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            flag,
        }
    }

    /// Adds the kind of the piece this move removes.
    #[inline]
    pub const fn with_capture(mut self, captured: PieceKind) -> Self {
        self.captured = Some(captured);
        self
    }

    /// Same as [`with_capture`](Self::with_capture) for an optional occupant.
    #[inline]
    pub const fn with_captured(mut self, captured: Option<PieceKind>) -> Self {
        self.captured = captured;
        self
    }

    /// Turns a pawn move into a promotion to `kind`.
    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Kind of the moving piece before the move (a pawn, for promotions).
    #[inline]
    pub const fn piece(self) -> PieceKind {
        self.piece
    }

    #[inline]
    pub const fn captured(self) -> Option<PieceKind> {
        self.captured
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.flag.castle_side().is_some()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Square of the captured piece. Equals `to()` except for en passant,
    /// where the victim sits beside the mover: destination file, source rank.
    #[inline]
    pub const fn capture_square(self) -> Square {
        if self.is_en_passant() {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// Kind left on the destination square.
    #[inline]
    pub const fn placed_piece(self) -> PieceKind {
        match self.promotion {
            Some(kind) => kind,
            None => self.piece,
        }
    }

    /// The textual form: `"e2e4"`, `"e7e8q"`.
    pub fn to_text(self) -> String {
        self.to_string()
    }

    /// True if `text` designates this move.
    pub fn matches(self, text: &MoveText) -> bool {
        self.from == text.from && self.to == text.to && self.promotion == text.promotion
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?}", self, self.piece)?;
        if let Some(captured) = self.captured {
            write!(f, " x{:?}", captured)?;
        }
        if self.flag != MoveFlag::Normal {
            write!(f, " {:?}", self.flag)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// Errors from reading move text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("move text '{0}' must be 4 or 5 characters")]
    Length(String),

    #[error("move text has an invalid square: {0}")]
    Square(#[from] SquareError),

    #[error("invalid promotion letter '{0}', expected one of q, r, b, n")]
    PromotionLetter(char),

    #[error("move {0} promotes a pawn but names no promotion piece")]
    MissingPromotion(String),

    #[error("move {0} names a promotion piece but is not a promotion")]
    UnexpectedPromotion(String),
}

/// The board-independent content of a move string.
///
/// `MoveText` only checks the shape of the text. Turning it into a [`Move`]
/// needs a board, which the engine's `parse_move` provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveText {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveText {
    /// Parses `"e2e4"` or `"e7e8q"`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseError::Length(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(kind) if kind.is_promotable() => Some(kind),
                _ => return Err(ParseError::PromotionLetter(c)),
            },
        };
        Ok(MoveText {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for MoveText {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveText::parse(s)
    }
}

impl fmt::Display for MoveText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}
