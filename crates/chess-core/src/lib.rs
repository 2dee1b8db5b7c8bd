//! Core types for the chess rules engine.
//!
//! This crate holds the value types shared by the engine and its callers:
//! - [`PieceKind`] and [`Color`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`CastlingRights`] for the four castling flags
//! - [`Move`] for fully described moves and [`MoveText`] for `e2e4`-style text
//! - [`Fen`] for reading and writing positions
//!
//! Nothing in here knows how pieces move; that lives in `chess-engine`.

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveFlag, MoveText, ParseError};
pub use piece::PieceKind;
pub use square::{File, Rank, Square, SquareError};
