//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a fixed depth.
//! Comparing against published counts checks generation, legality and the
//! make/unmake pair all at once.

use super::generate_legal_moves;
use crate::Board;
use chess_core::Move;
use tracing::trace;

/// Counts leaf nodes at `depth`. The board is unchanged on return.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        board.make_move(*m);
        nodes += perft(board, depth - 1);
        let undone = board.unmake_move();
        debug_assert_eq!(undone, Ok(*m));
    }
    nodes
}

/// Perft split by root move, sorted by move text.
///
/// Useful for narrowing a wrong total down to the move whose subtree is off.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = generate_legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        board.make_move(*m);
        let nodes = perft(board, depth - 1);
        let undone = board.unmake_move();
        debug_assert_eq!(undone, Ok(*m));
        trace!(mv = %m, nodes, "divide");
        results.push((*m, nodes));
    }

    results.sort_by_key(|(m, _)| m.to_text());
    results
}
