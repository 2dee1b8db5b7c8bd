//! Game session.
//!
//! [`Game`] owns a [`Board`] and its history and keeps the game status for
//! the current position, computed once per position rather than on every
//! query.

use crate::notation::parse_move;
use crate::rules::{GameStatus, RuleSet, StandardChess};
use crate::{Board, MoveList, RulesError};
use chess_core::{FenError, Move};
use tracing::{debug, info};

/// A chess game under standard rules.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(StandardChess.initial_board())
    }

    /// A game continuing from `board`, including any moves already on it.
    pub fn from_board(mut board: Board) -> Self {
        let status = StandardChess.status(&mut board);
        Game { board, status }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Gives up the session and returns its board.
    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.board)
    }

    pub fn legal_moves(&mut self) -> MoveList {
        StandardChess.legal_moves(&mut self.board)
    }

    /// Number of half-moves played in this session.
    pub fn ply_count(&self) -> usize {
        self.board.ply_count()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.board.fullmove_number()
    }

    pub fn move_history(&self) -> Vec<Move> {
        self.board.move_history().collect()
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Plays a move if it is legal and the game is still running.
    pub fn play(&mut self, m: Move) -> Result<(), RulesError> {
        if self.status.is_over() {
            return Err(RulesError::GameOver(self.status));
        }
        StandardChess.try_make_move(&mut self.board, m)?;
        debug!(mv = %m, fen = %self.board.to_fen(), "played move");
        self.refresh_status();
        Ok(())
    }

    /// Plays a move given as text (`"e2e4"`, `"e7e8q"`).
    pub fn play_text(&mut self, text: &str) -> Result<Move, RulesError> {
        let m = parse_move(&self.board, text)?;
        self.play(m)?;
        Ok(m)
    }

    /// Takes back the last move, reopening a finished game if needed.
    pub fn undo(&mut self) -> Result<Move, RulesError> {
        let m = StandardChess.unmake_move(&mut self.board)?;
        debug!(mv = %m, "undid move");
        self.refresh_status();
        Ok(m)
    }

    fn refresh_status(&mut self) {
        self.status = StandardChess.status(&mut self.board);
        if self.status.is_over() {
            info!(status = %self.status, plies = self.board.ply_count(), "game over");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DrawReason;
    use chess_core::{Color, Fen};

    fn play_all(game: &mut Game, moves: &[&str]) {
        for text in moves {
            game.play_text(text).unwrap();
        }
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.status(), GameStatus::Active);
        assert!(!game.is_check());
        assert_eq!(game.to_fen(), Fen::STARTPOS);
    }

    #[test]
    fn play_and_undo() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "e7e5", "g1f3"]);
        assert_eq!(game.ply_count(), 3);
        assert_eq!(game.fullmove_number(), 2);
        let history: Vec<String> = game.move_history().iter().map(|m| m.to_text()).collect();
        assert_eq!(history, ["e2e4", "e7e5", "g1f3"]);

        assert_eq!(game.undo().unwrap().to_text(), "g1f3");
        assert_eq!(game.undo().unwrap().to_text(), "e7e5");
        assert_eq!(game.undo().unwrap().to_text(), "e2e4");
        assert_eq!(game.undo(), Err(RulesError::NoMoveToUndo));
        assert_eq!(game.to_fen(), Fen::STARTPOS);
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut game = Game::new();
        assert!(matches!(game.play_text("e2e5"), Err(RulesError::IllegalMove(_))));
        assert!(matches!(game.play_text("e1e2"), Err(RulesError::IllegalMove(_))));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_check());
        assert_eq!(game.status(), GameStatus::Checkmate(Color::White));
        assert_eq!(game.status().winner(), Some(Color::Black));
        assert!(game.legal_moves().is_empty());
        assert!(matches!(game.play_text("a2a3"), Err(RulesError::GameOver(_))));
    }

    #[test]
    fn undo_reopens_a_finished_game() {
        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_game_over());
        game.undo().unwrap();
        assert_eq!(game.status(), GameStatus::Active);
        game.play_text("d8g5").unwrap();
    }

    #[test]
    fn threefold_repetition_on_third_occurrence() {
        let mut game = Game::new();
        let shuttle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play_all(&mut game, &shuttle);
        assert_eq!(game.status(), GameStatus::Active);
        play_all(&mut game, &shuttle[..3]);
        assert_eq!(game.status(), GameStatus::Active);
        game.play_text(shuttle[3]).unwrap();
        assert_eq!(game.status(), GameStatus::Draw(DrawReason::ThreefoldRepetition));
    }

    #[test]
    fn fifty_move_rule_after_quiet_move() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert_eq!(game.status(), GameStatus::Active);
        game.play_text("a1a2").unwrap();
        assert_eq!(game.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn insufficient_material_from_fen() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert_eq!(
            game.status(),
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn promotion_needs_a_letter() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(matches!(game.play_text("a7a8"), Err(RulesError::Parse(_))));
        let m = game.play_text("a7a8r").unwrap();
        assert!(m.is_promotion());
    }
}
