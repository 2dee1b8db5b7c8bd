//! Attack queries and the legality filter.

use super::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::{generate_pseudo_legal_moves, MoveList};
use crate::Board;
use chess_core::{Color, Move, PieceKind, Square};

/// Returns true if any piece of `by_color` attacks `sq`.
///
/// Runs the attack patterns backwards from `sq`: a knight on a square a
/// knight's jump away attacks it, a rook on a rook ray does, and so on.
pub fn is_square_attacked(board: &Board, sq: Square, by_color: Color) -> bool {
    let occupied = board.occupied();

    // A pawn of `by_color` attacks sq if a pawn of the other color on sq
    // would attack that pawn's square.
    if (pawn_attacks(sq, by_color.opposite()) & board.pieces(PieceKind::Pawn, by_color))
        .is_not_empty()
    {
        return true;
    }
    if (knight_attacks(sq) & board.pieces(PieceKind::Knight, by_color)).is_not_empty() {
        return true;
    }
    if (king_attacks(sq) & board.pieces(PieceKind::King, by_color)).is_not_empty() {
        return true;
    }

    let queens = board.pieces(PieceKind::Queen, by_color);
    let diagonal = board.pieces(PieceKind::Bishop, by_color) | queens;
    if (bishop_attacks(sq, occupied) & diagonal).is_not_empty() {
        return true;
    }
    let orthogonal = board.pieces(PieceKind::Rook, by_color) | queens;
    (rook_attacks(sq, occupied) & orthogonal).is_not_empty()
}

/// Returns true if `color`'s king is attacked.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Generates every legal move for the side to move.
///
/// Each pseudo-legal move is played through a [`MoveGuard`](crate::MoveGuard)
/// and kept if the mover's king is safe afterwards. The board is back to its
/// original state when this returns.
pub fn generate_legal_moves(board: &mut Board) -> MoveList {
    let mut moves = generate_pseudo_legal_moves(board);
    let us = board.side_to_move();
    moves.retain(|m| leaves_king_safe(board, *m, us));
    moves
}

/// Returns true as soon as one legal move is found.
pub fn has_legal_move(board: &mut Board) -> bool {
    let us = board.side_to_move();
    generate_pseudo_legal_moves(board)
        .iter()
        .any(|m| leaves_king_safe(board, *m, us))
}

/// Returns true if `m` is legal on `board`.
pub fn is_legal(board: &mut Board, m: Move) -> bool {
    let us = board.side_to_move();
    generate_pseudo_legal_moves(board).contains(&m) && leaves_king_safe(board, m, us)
}

fn leaves_king_safe(board: &mut Board, m: Move, us: Color) -> bool {
    let probe = board.probe(m);
    !is_king_in_check(&probe, us)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveFlag;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn attacked_squares_at_start() {
        let board = Board::startpos();
        assert!(is_square_attacked(&board, sq("e3"), Color::White));
        assert!(is_square_attacked(&board, sq("f3"), Color::White));
        assert!(!is_square_attacked(&board, sq("e4"), Color::White));
        assert!(is_square_attacked(&board, sq("c6"), Color::Black));
        assert!(!is_king_in_check(&board, Color::White));
        assert!(!is_king_in_check(&board, Color::Black));
    }

    #[test]
    fn pawn_attack_direction() {
        let board = Board::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("c4"), Color::Black));
        assert!(is_square_attacked(&board, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&board, sq("c6"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4P3/r3K3 w - - 0 1").unwrap();
        assert!(is_king_in_check(&board, Color::White));
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r1N1K3 w - - 0 1").unwrap();
        assert!(!is_king_in_check(&board, Color::White));
    }

    #[test]
    fn startpos_has_twenty_legal_moves() {
        let mut board = Board::startpos();
        let before = board.clone();
        assert_eq!(generate_legal_moves(&mut board).len(), 20);
        assert!(has_legal_move(&mut board));
        assert_eq!(board, before);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // The e2 knight is pinned by the e8 rook.
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(moves.iter().all(|m| m.piece() != PieceKind::Knight));
    }

    #[test]
    fn king_may_not_step_into_check() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        let targets: Vec<Square> = moves.iter().map(|m| m.to()).collect();
        assert!(targets.contains(&sq("d2")));
        assert!(!targets.contains(&sq("e2")));
        assert!(!targets.contains(&sq("d1")));
        assert!(targets.contains(&sq("f1")));
    }

    #[test]
    fn en_passant_exposing_the_king_is_illegal() {
        // Capturing on d6 would clear the fifth rank between h5 and a5.
        let mut board = Board::from_fen("4k3/8/8/K2pP2r/8/8/8/8 w - d6 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(!moves.iter().any(|m| m.flag() == MoveFlag::EnPassant));
    }

    #[test]
    fn is_legal_rejects_foreign_moves() {
        let mut board = Board::startpos();
        let e4 = Move::new(sq("e2"), sq("e4"), PieceKind::Pawn, MoveFlag::DoublePush);
        let e5 = Move::new(sq("e2"), sq("e5"), PieceKind::Pawn, MoveFlag::Normal);
        assert!(is_legal(&mut board, e4));
        assert!(!is_legal(&mut board, e5));
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn checkmate_has_no_legal_moves() {
        let mut board =
            Board::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
                .unwrap();
        assert!(is_king_in_check(&board, Color::Black));
        assert!(!has_legal_move(&mut board));
        assert!(generate_legal_moves(&mut board).is_empty());
    }
}
