//! Set-wise pawn move generation.
//!
//! Pinned pawns may only push along the king's file or capture along the
//! king's diagonal matching the capture direction; everything lands inside
//! the check mask. En passant gets a separate recheck because it vacates two
//! squares at once.

use crate::bitboard::bit_utils::{Bitboard, Squares};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::move_generator::MoveGenResult;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::{ChessMove, MoveKind};
use crate::moves::leaper_attacks::pawn_attacks;
use crate::moves::lines::{diagonal_step7, diagonal_step9, file_line, line_through};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

pub fn generate_pawn_moves(
    game_state: &GameState,
    info: &CheckInfo,
    out: &mut MoveList,
) -> MoveGenResult<()> {
    let us = game_state.side_to_move;
    let pawns = game_state.pieces_of(us, PieceKind::Pawn);
    if pawns == 0 {
        return Ok(());
    }

    let enemies = game_state.occupancy_by_color[us.opposite().index()];
    let empty = !game_state.occupancy();
    let ksq = info.king_square;

    let unpinned = pawns & !info.pinned;
    let pushers = unpinned | (pawns & info.pinned & file_line(ksq));
    let step7 = unpinned | (pawns & info.pinned & diagonal_step7(ksq));
    let step9 = unpinned | (pawns & info.pinned & diagonal_step9(ksq));

    let (last_rank, double_rank) = match us {
        Color::Light => (RANK_8, RANK_3),
        Color::Dark => (RANK_1, RANK_6),
    };

    let single = shift(us, pushers, 8) & empty;
    let double = shift(us, single & double_rank, 8) & empty;
    let capture7 = shift(us, step7 & capture_source_mask(us, 7), 7) & enemies;
    let capture9 = shift(us, step9 & capture_source_mask(us, 9), 9) & enemies;

    let mask = info.check_mask;
    emit(out, single & mask, us, 8, last_rank)?;
    emit(out, double & mask, us, 16, last_rank)?;
    emit(out, capture7 & mask, us, 7, last_rank)?;
    emit(out, capture9 & mask, us, 9, last_rank)?;

    generate_en_passant(game_state, info, out)
}

/// Move `bb` toward the opponent by `distance` squares.
#[inline]
fn shift(color: Color, bb: Bitboard, distance: u32) -> Bitboard {
    match color {
        Color::Light => bb << distance,
        Color::Dark => bb >> distance,
    }
}

/// Origin files that don't wrap around the board for a diagonal step.
#[inline]
fn capture_source_mask(color: Color, distance: u32) -> Bitboard {
    // Light +9 and Dark -7 step toward the a-file; the others toward h.
    match (color, distance) {
        (Color::Light, 9) | (Color::Dark, 7) => !FILE_A,
        _ => !FILE_H,
    }
}

fn emit(
    out: &mut MoveList,
    targets: Bitboard,
    color: Color,
    distance: u8,
    last_rank: Bitboard,
) -> MoveGenResult<()> {
    for to in Squares(targets) {
        let from = match color {
            Color::Light => to - distance,
            Color::Dark => to + distance,
        };

        if last_rank & (1u64 << to) != 0 {
            for piece in PieceKind::PROMOTIONS {
                out.push(ChessMove::promotion(from, to, piece))?;
            }
        } else {
            out.push(ChessMove::normal(from, to))?;
        }
    }
    Ok(())
}

fn generate_en_passant(
    game_state: &GameState,
    info: &CheckInfo,
    out: &mut MoveList,
) -> MoveGenResult<()> {
    let Some(ep_square) = game_state.en_passant_square else {
        return Ok(());
    };

    let us = game_state.side_to_move;
    let them = us.opposite();
    let captured = (ep_square as i8 - us.forward()) as Square;
    let ep_bb = 1u64 << ep_square;
    let captured_bb = 1u64 << captured;

    if game_state.piece_on(captured) != Some(Piece::new(them, PieceKind::Pawn)) {
        return Ok(());
    }
    // Either the double-pushed pawn is the checker or the landing square blocks.
    if info.check_mask & (ep_bb | captured_bb) == 0 {
        return Ok(());
    }

    let ksq = info.king_square;
    let capturers = pawn_attacks(them, ep_square) & game_state.pieces_of(us, PieceKind::Pawn);
    let queens = game_state.pieces_of(them, PieceKind::Queen);
    let rook_like = game_state.pieces_of(them, PieceKind::Rook) | queens;
    let bishop_like = game_state.pieces_of(them, PieceKind::Bishop) | queens;

    for from in Squares(capturers) {
        if info.pinned & (1u64 << from) != 0 && line_through(ksq, from) & ep_bb == 0 {
            continue;
        }

        let occupancy = (game_state.occupancy() ^ (1u64 << from) ^ captured_bb) | ep_bb;
        if rook_attacks(ksq, occupancy) & rook_like != 0
            || bishop_attacks(ksq, occupancy) & bishop_like != 0
        {
            continue;
        }

        out.push(ChessMove::new(from, ep_square, MoveKind::EnPassant))?;
    }

    Ok(())
}
