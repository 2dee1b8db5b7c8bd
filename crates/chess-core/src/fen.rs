//! FEN (Forsyth-Edwards Notation) reading and writing.

use crate::{CastlingRights, Color, PieceKind, Rank, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    PiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    ActiveColor(String),

    #[error("invalid castling rights: {0}")]
    CastlingRights(String),

    #[error("invalid en passant square: {0}")]
    EnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("{0} is in check with the other side to move")]
    OpponentInCheck(Color),
}

/// A parsed FEN record with typed fields.
///
/// Only the syntax and the per-field invariants (one king each, no pawns on
/// the back ranks, en-passant square on the right rank) are checked here.
/// The engine turns this into a playable board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Occupant of each square, indexed like [`Square::index`].
    pub placement: [Option<(PieceKind, Color)>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. The two move counters may be omitted, in which
    /// case they default to `0 1`.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 4 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::ActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| FenError::CastlingRights(fields[2].to_string()))?;

        let en_passant = parse_en_passant(fields[3], side_to_move)?;

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            let halfmove = fields[4]
                .parse::<u32>()
                .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;
            let fullmove = fields[5]
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| FenError::FullmoveNumber(fields[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_placement(field: &str) -> Result<[Option<(PieceKind, Color)>; 64], FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::PiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut placement = [None; 64];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
            } else if let Some(piece) = PieceKind::from_fen_char(c) {
                if file < 8 {
                    placement[(rank * 8 + file) as usize] = Some(piece);
                }
                file += 1;
            } else {
                return Err(FenError::PiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank + 1
                )));
            }
            if file > 8 {
                break;
            }
        }
        if file != 8 {
            return Err(FenError::PiecePlacement(format!(
                "rank {} does not describe exactly 8 squares",
                rank + 1
            )));
        }
    }

    for color in Color::ALL {
        let count = placement
            .iter()
            .filter(|p| **p == Some((PieceKind::King, color)))
            .count();
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }

    let back_rank_pawn = placement.iter().enumerate().any(|(i, p)| {
        matches!(p, Some((PieceKind::Pawn, _))) && (i < 8 || i >= 56)
    });
    if back_rank_pawn {
        return Err(FenError::PiecePlacement(
            "pawn on the first or eighth rank".to_string(),
        ));
    }

    Ok(placement)
}

fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let square =
        Square::from_algebraic(field).map_err(|_| FenError::EnPassantSquare(field.to_string()))?;
    // The target is behind a pawn that just double-pushed, so it sits on the
    // mover's sixth rank.
    let expected = match side_to_move {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    if square.rank() != expected {
        return Err(FenError::EnPassantSquare(field.to_string()));
    }
    Ok(Some(square))
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.placement[(rank * 8 + file) as usize] {
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
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.placement[Square::E1.index() as usize], Some((PieceKind::King, Color::White)));
        assert_eq!(fen.placement[Square::D8.index() as usize], Some((PieceKind::Queen, Color::Black)));
        assert_eq!(fen.placement.iter().flatten().count(), 32);
    }

    #[test]
    fn roundtrip() {
        for original in [
            Fen::STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "8/8/8/8/8/8/8/R3K2k w Q - 99 70",
        ] {
            assert_eq!(Fen::parse(original).unwrap().to_string(), original);
        }
    }

    #[test]
    fn counters_are_optional() {
        let fen = Fen::parse("k7/8/8/8/8/8/8/7K b - -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn field_count() {
        assert_eq!(Fen::parse("invalid"), Err(FenError::FieldCount(1)));
        assert_eq!(
            Fen::parse("k7/8/8/8/8/8/8/7K w - - 0"),
            Err(FenError::FieldCount(5))
        );
    }

    #[test]
    fn bad_placement() {
        for placement in [
            "8/8/8/8/8/8/8",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR",
            "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR",
            "knbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "P3k3/8/8/8/8/8/8/4K3",
        ] {
            let fen = format!("{} w - - 0 1", placement);
            assert!(Fen::parse(&fen).is_err(), "{placement} accepted");
        }
    }

    #[test]
    fn king_count() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount {
                color: Color::Black,
                count: 0
            })
        );
    }

    #[test]
    fn bad_scalar_fields() {
        let base = "4k3/8/8/8/8/8/8/4K3";
        assert!(matches!(Fen::parse(&format!("{base} x - - 0 1")), Err(FenError::ActiveColor(_))));
        assert!(matches!(Fen::parse(&format!("{base} w XYZ - 0 1")), Err(FenError::CastlingRights(_))));
        assert!(matches!(Fen::parse(&format!("{base} w - e4 0 1")), Err(FenError::EnPassantSquare(_))));
        assert!(matches!(Fen::parse(&format!("{base} w - e3 0 1")), Err(FenError::EnPassantSquare(_))));
        assert!(matches!(Fen::parse(&format!("{base} w - abc 0 1")), Err(FenError::EnPassantSquare(_))));
        assert!(matches!(Fen::parse(&format!("{base} w - - abc 1")), Err(FenError::HalfmoveClock(_))));
        assert!(matches!(Fen::parse(&format!("{base} w - - 0 0")), Err(FenError::FullmoveNumber(_))));
        assert!(Fen::parse(&format!("{base} b - e3 0 1")).is_ok());
    }

    #[test]
    fn error_messages_name_the_input() {
        assert!(FenError::FieldCount(3).to_string().contains('3'));
        assert!(FenError::ActiveColor("x".into()).to_string().contains("'x'"));
        let kings = FenError::KingCount { color: Color::White, count: 2 };
        assert_eq!(kings.to_string(), "White must have exactly one king, found 2");
    }
}
