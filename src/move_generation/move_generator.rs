use thiserror::Error;

use crate::game_state::game_state::GameState;
use crate::move_generation::move_list::MoveList;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("move list capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

/// Produces the complete legal move set for the side to move.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<MoveList>;
}
