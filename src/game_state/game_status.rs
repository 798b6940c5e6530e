//! Terminal-state classification after a move has been applied.
//!
//! Rule draws are checked before mobility so a drawn position is never
//! reported as ongoing just because moves remain.

use std::fmt;

use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::move_generation::move_list::MoveList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    /// The side that just moved delivered mate.
    Checkmate,
    Stalemate,
    Repetition,
    FiftyMove,
}

impl GameStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate | GameStatus::Repetition | GameStatus::FiftyMove
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Repetition => "threefold repetition",
            GameStatus::FiftyMove => "fifty-move rule",
        };
        f.write_str(text)
    }
}

/// Classify using an already generated move list for the side to move.
pub fn classify_with_moves(game_state: &GameState, legal_moves: &MoveList) -> GameStatus {
    if game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        return GameStatus::FiftyMove;
    }
    if game_state.repetition_count() >= REPETITION_DRAW_COUNT {
        return GameStatus::Repetition;
    }
    if !legal_moves.is_empty() {
        return GameStatus::Ongoing;
    }
    if game_state.is_in_check() {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

pub fn classify<G: MoveGenerator>(generator: &G, game_state: &GameState) -> MoveGenResult<GameStatus> {
    let moves = generator.generate_legal_moves(game_state)?;
    Ok(classify_with_moves(game_state, &moves))
}
