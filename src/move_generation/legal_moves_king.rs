use crate::bitboard::bit_utils::{Bitboard, Squares};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckInfo;
use crate::move_generation::move_generator::MoveGenResult;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::{ChessMove, MoveKind};
use crate::moves::leaper_attacks::king_attacks;

struct CastlingPath {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    must_be_empty: Bitboard,
    must_be_unseen: Bitboard,
}

const fn bits(squares: &[Square]) -> Bitboard {
    let mut out = 0u64;
    let mut i = 0;
    while i < squares.len() {
        out |= 1u64 << squares[i];
        i += 1;
    }
    out
}

const LIGHT_PATHS: [CastlingPath; 2] = [
    CastlingPath {
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: E1,
        king_to: G1,
        rook_from: H1,
        must_be_empty: bits(&[F1, G1]),
        must_be_unseen: bits(&[E1, F1, G1]),
    },
    CastlingPath {
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: E1,
        king_to: C1,
        rook_from: A1,
        must_be_empty: bits(&[D1, C1, B1]),
        must_be_unseen: bits(&[E1, D1, C1]),
    },
];

const DARK_PATHS: [CastlingPath; 2] = [
    CastlingPath {
        right: CASTLE_DARK_KINGSIDE,
        king_from: E8,
        king_to: G8,
        rook_from: H8,
        must_be_empty: bits(&[F8, G8]),
        must_be_unseen: bits(&[E8, F8, G8]),
    },
    CastlingPath {
        right: CASTLE_DARK_QUEENSIDE,
        king_from: E8,
        king_to: C8,
        rook_from: A8,
        must_be_empty: bits(&[D8, C8, B8]),
        must_be_unseen: bits(&[E8, D8, C8]),
    },
];

pub fn generate_king_moves(
    game_state: &GameState,
    info: &CheckInfo,
    out: &mut MoveList,
) -> MoveGenResult<()> {
    let us = game_state.side_to_move;
    let own = game_state.occupancy_by_color[us.index()];
    let from = info.king_square;

    for to in Squares(king_attacks(from) & !own & !info.seen) {
        out.push(ChessMove::normal(from, to))?;
    }

    if info.checkers == 0 {
        generate_castling_moves(game_state, info, out)?;
    }

    Ok(())
}

fn generate_castling_moves(
    game_state: &GameState,
    info: &CheckInfo,
    out: &mut MoveList,
) -> MoveGenResult<()> {
    let us = game_state.side_to_move;
    let paths = match us {
        Color::Light => &LIGHT_PATHS,
        Color::Dark => &DARK_PATHS,
    };
    let own_rook = Some(Piece::new(us, PieceKind::Rook));
    let occupancy = game_state.occupancy();

    for path in paths {
        if game_state.castling_rights & path.right == 0
            || info.king_square != path.king_from
            || game_state.piece_on(path.rook_from) != own_rook
            || occupancy & path.must_be_empty != 0
            || info.seen & path.must_be_unseen != 0
        {
            continue;
        }
        out.push(ChessMove::new(path.king_from, path.king_to, MoveKind::Castling))?;
    }

    Ok(())
}
