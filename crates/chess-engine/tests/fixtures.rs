//! End-to-end rule fixtures driven through the public API.

use chess_core::{CastleSide, Color, MoveFlag, PieceKind, Square};
use chess_engine::{
    legal_moves, make_move, parse_move, piece_at, status, unmake_move, Board, DrawReason,
    GameStatus, RulesError,
};

fn play(board: &mut Board, moves: &[&str]) {
    for text in moves {
        let m = parse_move(board, text).unwrap();
        assert!(legal_moves(board).contains(&m), "{text} is not legal");
        make_move(board, m);
    }
}

#[test]
fn scholars_mate() {
    let mut board = Board::startpos();
    play(
        &mut board,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert_eq!(status(&mut board), GameStatus::Checkmate(Color::Black));
    assert!(legal_moves(&mut board).is_empty());
    assert_eq!(
        piece_at(&board, "f7".parse().unwrap()),
        Some((PieceKind::Queen, Color::White))
    );
}

#[test]
fn stalemate() {
    let mut board = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(status(&mut board), GameStatus::Draw(DrawReason::Stalemate));
    assert!(legal_moves(&mut board).is_empty());
}

#[test]
fn knight_shuttle_repeats_on_the_third_occurrence_only() {
    let mut board = Board::startpos();
    let shuttle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    // The start position occurs once before any move, again after one full
    // shuttle, and a third time after the second.
    for text in shuttle.iter().chain(&shuttle[..3]) {
        play(&mut board, &[*text]);
        assert_eq!(status(&mut board), GameStatus::Active, "after {text}");
        assert!(board.repetition_count() < 3);
    }
    play(&mut board, &shuttle[3..]);
    assert_eq!(board.repetition_count(), 3);
    assert_eq!(
        status(&mut board),
        GameStatus::Draw(DrawReason::ThreefoldRepetition)
    );

    // Undoing one move brings the count back down.
    unmake_move(&mut board).unwrap();
    assert_eq!(status(&mut board), GameStatus::Active);
}

#[test]
fn castling_through_an_attacked_square_is_rejected() {
    // Black bishop on a6 covers f1; e1, g1 and the squares between are empty
    // of pieces and the rights are intact.
    let mut board = Board::from_fen("4k3/8/b7/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(board.castling().has(Color::White, CastleSide::Kingside));
    let moves = legal_moves(&mut board);
    assert!(!moves.iter().any(|m| m.flag() == MoveFlag::CastleKingside));
    assert!(matches!(
        parse_move(&board, "e1g1").map(|m| moves.contains(&m)),
        Ok(false)
    ));

    // Without the bishop the same move is fine.
    let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(legal_moves(&mut board)
        .iter()
        .any(|m| m.flag() == MoveFlag::CastleKingside));
}

#[test]
fn en_passant_window_lasts_one_move() {
    let mut board = Board::startpos();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(board.en_passant(), Some("d6".parse().unwrap()));
    let ep = parse_move(&board, "e5d6").unwrap();
    assert!(ep.is_en_passant());
    assert!(legal_moves(&mut board).contains(&ep));

    play(&mut board, &["b1c3", "a6a5"]);
    let late = parse_move(&board, "e5d6").unwrap();
    assert!(!late.is_en_passant());
    assert!(!legal_moves(&mut board).contains(&late));
}

#[test]
fn undo_on_fresh_board() {
    let mut board = Board::startpos();
    assert_eq!(unmake_move(&mut board), Err(RulesError::NoMoveToUndo));
}

#[test]
fn out_of_range_square() {
    let err: RulesError = Square::from_index(64).unwrap_err().into();
    assert!(matches!(err, RulesError::InvalidSquare(_)));
}

#[test]
fn full_game_undo_restores_start() {
    let mut board = Board::startpos();
    let moves = [
        "e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6", "c1e3",
        "e7e5", "d4b3", "c8e6", "f2f3", "f8e7", "d1d2", "e8g8", "e1c1", "b8d7", "g2g4", "b7b5",
    ];
    play(&mut board, &moves);
    assert_eq!(board.ply_count(), moves.len());
    assert!(!board.castling().has(Color::White, CastleSide::Kingside));
    assert!(board.castling().is_empty());
    for _ in 0..moves.len() {
        unmake_move(&mut board).unwrap();
    }
    assert_eq!(board, Board::startpos());
}
