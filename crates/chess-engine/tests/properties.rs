//! Property tests over random legal playouts.

use chess_core::{Fen, PieceKind};
use chess_engine::{generate_legal_moves, is_king_in_check, Bitboard, Board};
use proptest::prelude::*;

const STARTS: [&str; 4] = [
    Fen::STARTPOS,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

/// Plays `choices` as indices into the legal move list, stopping early if
/// the game ends. Returns how many moves were made.
fn playout(board: &mut Board, choices: &[usize], mut check: impl FnMut(&Board)) -> usize {
    let mut made = 0;
    for &choice in choices {
        let moves = generate_legal_moves(board);
        if moves.is_empty() {
            break;
        }
        board.make_move(moves[choice % moves.len()]);
        made += 1;
        check(board);
    }
    made
}

proptest! {
    #[test]
    fn make_then_unmake_restores_the_board(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let mut board = Board::from_fen(STARTS[start]).unwrap();
        let original = board.clone();
        let made = playout(&mut board, &choices, |_| {});
        for _ in 0..made {
            prop_assert!(board.unmake_move().is_ok());
        }
        prop_assert_eq!(board.to_fen(), original.to_fen());
        prop_assert_eq!(board, original);
    }

    #[test]
    fn piece_sets_stay_disjoint(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let mut board = Board::from_fen(STARTS[start]).unwrap();
        playout(&mut board, &choices, |board| {
            assert!(board.is_consistent(), "{board:?}");
            let union = PieceKind::ALL.iter().fold(
                Bitboard::EMPTY,
                |acc, &kind| acc | board.pieces_of_kind(kind),
            );
            assert_eq!(union, board.occupied());
        });
    }

    #[test]
    fn legal_moves_never_leave_the_king_in_check(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(any::<usize>(), 0..20),
    ) {
        let mut board = Board::from_fen(STARTS[start]).unwrap();
        playout(&mut board, &choices, |_| {});
        let us = board.side_to_move();
        for m in &generate_legal_moves(&mut board) {
            let probe = board.probe(*m);
            prop_assert!(!is_king_in_check(&probe, us), "{m:?}");
        }
    }

    #[test]
    fn fen_survives_a_roundtrip_mid_game(
        choices in prop::collection::vec(any::<usize>(), 0..30),
    ) {
        let mut board = Board::startpos();
        playout(&mut board, &choices, |_| {});
        let reloaded = Board::from_fen(&board.to_fen()).unwrap();
        prop_assert_eq!(reloaded.position_key(), board.position_key());
        prop_assert_eq!(reloaded.to_fen(), board.to_fen());
    }
}

#[test]
fn transpositions_share_a_key() {
    let mut a = Board::startpos();
    let mut b = Board::startpos();
    for text in ["g1f3", "g8f6", "b1c3"] {
        a.make_move(chess_engine::parse_move(&a, text).unwrap());
    }
    for text in ["b1c3", "g8f6", "g1f3"] {
        b.make_move(chess_engine::parse_move(&b, text).unwrap());
    }
    assert_eq!(a.position_key(), b.position_key());
    assert_ne!(a.move_history().collect::<Vec<_>>(), b.move_history().collect::<Vec<_>>());
}
