//! Full legal move generation pipeline.
//!
//! Builds the check/pin context once, then emits only legal moves: under
//! double check nothing but king moves is generated.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::move_generation::move_list::MoveList;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<MoveList> {
        let mut out = MoveList::new();
        generate_legal_moves_into(game_state, &mut out)?;
        Ok(out)
    }
}

/// Convenience wrapper around [`LegalMoveGenerator`].
#[inline]
pub fn generate_legal_moves(game_state: &GameState) -> MoveGenResult<MoveList> {
    LegalMoveGenerator.generate_legal_moves(game_state)
}

/// Fill `out` (cleared first) with every legal move for the side to move.
pub fn generate_legal_moves_into(game_state: &GameState, out: &mut MoveList) -> MoveGenResult<()> {
    out.clear();
    let info = CheckInfo::compute(game_state)?;

    if !info.in_double_check() {
        generate_pawn_moves(game_state, &info, out)?;
        generate_piece_moves(game_state, &info, out)?;
    }
    generate_king_moves(game_state, &info, out)
}
