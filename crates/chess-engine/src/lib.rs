//! Chess rules engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with edge-masked directional shifts
//! - [`Board`] - position state with reversible [`Board::make_move`] /
//!   [`Board::unmake_move`] and an owned undo history
//! - Pseudo-legal and legal move generation, attack queries and perft
//! - [`GameStatus`] - checkmate, stalemate and the draw rules
//! - [`Game`] - a play/undo session that tracks its status
//!
//! # Architecture
//!
//! Each piece kind and color has its own bitboard. Leaper attacks come from
//! compile-time tables; slider attacks march along rays and stop at the
//! first blocker. Legality is decided by playing a pseudo-legal move,
//! checking the mover's king, and taking the move back through a
//! [`MoveGuard`], so the board is never left half-updated.
//!
//! A [`Board`] is a single mutable resource. Probing mutates and restores
//! it, so concurrent users must each work on their own clone.
//!
//! # Example
//!
//! ```
//! use chess_engine::{status, Game, GameStatus, RuleSet, StandardChess};
//!
//! let mut board = StandardChess.initial_board();
//! let moves = StandardChess.legal_moves(&mut board);
//! assert_eq!(moves.len(), 20);
//! assert_eq!(status(&mut board), GameStatus::Active);
//!
//! let mut game = Game::new();
//! for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.play_text(text).unwrap();
//! }
//! assert!(game.is_game_over());
//! ```

mod bitboard;
mod board;
mod error;
mod game;
pub mod movegen;
pub mod notation;
pub mod rules;

pub use bitboard::{Bitboard, BitboardIter, Direction};
pub use board::{Board, MoveGuard, PositionKey, UndoRecord};
pub use error::RulesError;
pub use game::Game;
pub use movegen::{
    generate_legal_moves, generate_pseudo_legal_moves, has_legal_move, is_king_in_check,
    is_square_attacked, perft, perft_divide, MoveList,
};
pub use notation::parse_move;
pub use rules::{
    is_insufficient_material, legal_moves, make_move, piece_at, status, unmake_move, DrawReason,
    GameStatus, RuleSet, StandardChess,
};
