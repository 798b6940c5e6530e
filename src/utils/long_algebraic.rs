//! Long-algebraic (engine wire) notation, e.g. `e2e4`, `e7e8q`, `e1g1`.
//!
//! Decoding never interprets the text on its own: it renders every legal move
//! of the current position and returns the one that matches, or the null move.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::MoveGenResult;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::ChessMove;
use crate::utils::algebraic::square_to_algebraic;

pub fn move_to_long_algebraic(mv: ChessMove) -> Result<String, String> {
    if mv.is_null() {
        return Ok("0000".to_owned());
    }

    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from())?);
    out.push_str(&square_to_algebraic(mv.to())?);

    if let Some(piece) = mv.promotion_piece() {
        out.push(promotion_to_char(piece)?);
    }

    Ok(out)
}

/// Find the legal move written as `long_algebraic`; `ChessMove::NULL` when
/// nothing matches.
pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &GameState) -> MoveGenResult<ChessMove> {
    let legal_moves = generate_legal_moves(game_state)?;
    Ok(match_long_algebraic(long_algebraic, &legal_moves))
}

/// Same as [`long_algebraic_to_move`] against an already generated list.
pub fn match_long_algebraic(long_algebraic: &str, legal_moves: &MoveList) -> ChessMove {
    let wanted = long_algebraic.trim();
    legal_moves
        .iter()
        .copied()
        .find(|&mv| move_to_long_algebraic(mv).is_ok_and(|text| text == wanted))
        .unwrap_or(ChessMove::NULL)
}

fn promotion_to_char(piece_kind: PieceKind) -> Result<char, String> {
    match piece_kind {
        PieceKind::Knight => Ok('n'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Queen => Ok('q'),
        _ => Err(format!("Invalid promotion piece: {piece_kind:?}")),
    }
}
