//! Turning move text into moves.
//!
//! Text such as `e2e4` or `e7e8q` names only squares and a promotion piece.
//! The moving piece, the captured piece and the special-move flag are read
//! off the board.

use crate::{Board, RulesError};
use chess_core::{CastleSide, Move, MoveFlag, MoveText, ParseError, PieceKind};

/// Parses `text` against `board` into a fully populated [`Move`].
///
/// The result is not checked for legality; a move the side to move cannot
/// make still comes back if it is well-formed. Pass it to
/// [`RuleSet::try_make_move`](crate::RuleSet::try_make_move) or compare it
/// against the legal move list.
pub fn parse_move(board: &Board, text: &str) -> Result<Move, RulesError> {
    resolve_move(board, &MoveText::parse(text)?)
}

/// Fills in a parsed [`MoveText`] from the board.
pub fn resolve_move(board: &Board, text: &MoveText) -> Result<Move, RulesError> {
    let us = board.side_to_move();
    let (piece, _) = board
        .piece_at(text.from)
        .filter(|&(_, color)| color == us)
        .ok_or_else(|| RulesError::IllegalMove(text.to_string()))?;

    let captured = match board.piece_at(text.to) {
        Some((_, color)) if color == us => {
            return Err(RulesError::IllegalMove(text.to_string()));
        }
        Some((kind, _)) => Some(kind),
        None => None,
    };

    let promoting = piece == PieceKind::Pawn && text.to.rank().index() == us.promotion_rank();
    match (promoting, text.promotion) {
        (true, None) => return Err(ParseError::MissingPromotion(text.to_string()).into()),
        (false, Some(_)) => return Err(ParseError::UnexpectedPromotion(text.to_string()).into()),
        _ => {}
    }

    let from_rank = text.from.rank().index();
    let to_rank = text.to.rank().index();
    let flag = match piece {
        PieceKind::King if text.from == CastleSide::king_home(us) => {
            if text.to == CastleSide::Kingside.king_target(us) {
                MoveFlag::CastleKingside
            } else if text.to == CastleSide::Queenside.king_target(us) {
                MoveFlag::CastleQueenside
            } else {
                MoveFlag::Normal
            }
        }
        PieceKind::Pawn
            if board.en_passant() == Some(text.to) && text.from.file() != text.to.file() =>
        {
            MoveFlag::EnPassant
        }
        PieceKind::Pawn if from_rank.abs_diff(to_rank) == 2 => MoveFlag::DoublePush,
        _ => MoveFlag::Normal,
    };

    let mut m = Move::new(text.from, text.to, piece, flag);
    m = if flag == MoveFlag::EnPassant {
        m.with_capture(PieceKind::Pawn)
    } else {
        m.with_captured(captured)
    };
    if let Some(kind) = text.promotion {
        m = m.with_promotion(kind);
    }
    Ok(m)
}
