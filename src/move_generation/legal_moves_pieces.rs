use crate::bitboard::bit_utils::{Bitboard, Squares};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::move_generator::MoveGenResult;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::ChessMove;
use crate::moves::leaper_attacks::knight_attacks;
use crate::moves::slider_attacks::{bishop_attacks, queen_attacks, rook_attacks};

/// Knight, bishop, rook and queen moves.
pub fn generate_piece_moves(
    game_state: &GameState,
    info: &CheckInfo,
    out: &mut MoveList,
) -> MoveGenResult<()> {
    let us = game_state.side_to_move;
    let own = game_state.occupancy_by_color[us.index()];
    let occupancy = game_state.occupancy();
    let allowed = !own & info.check_mask;

    // A pinned knight can never stay on its pin line.
    let knights = game_state.pieces_of(us, PieceKind::Knight) & !info.pinned;
    for from in Squares(knights) {
        push_targets(out, from, knight_attacks(from) & allowed)?;
    }

    let sliders: [(PieceKind, fn(Square, Bitboard) -> Bitboard); 3] = [
        (PieceKind::Bishop, bishop_attacks),
        (PieceKind::Rook, rook_attacks),
        (PieceKind::Queen, queen_attacks),
    ];
    for (kind, attacks) in sliders {
        for from in Squares(game_state.pieces_of(us, kind)) {
            let targets = attacks(from, occupancy) & allowed & info.pin_mask(from);
            push_targets(out, from, targets)?;
        }
    }

    Ok(())
}

#[inline]
fn push_targets(out: &mut MoveList, from: Square, targets: Bitboard) -> MoveGenResult<()> {
    for to in Squares(targets) {
        out.push(ChessMove::normal(from, to))?;
    }
    Ok(())
}
