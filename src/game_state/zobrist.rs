//! Zobrist fingerprint keys for repetition detection.
//!
//! Keys come from a fixed-seed generator drawn once per process, so the same
//! position always hashes to the same value within and across runs.

use std::sync::OnceLock;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::bitboard::bit_utils::Squares;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_attacks::pawn_attacks;

const ZOBRIST_SEED: u64 = 221_564_671_644;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; 64]; 12],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[0u64; 64]; 12];
    for piece in &mut piece_square {
        for key in piece.iter_mut() {
            *key = rng.random();
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.index()][square as usize]
}

#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & CASTLE_ALL) as usize]
}

#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[(file & 7) as usize]
}

/// XOR-ed in when dark is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// En-passant contribution: the target file is folded in only when the side
/// to move has a pawn that could actually capture onto it.
pub fn en_passant_key(game_state: &GameState) -> u64 {
    let Some(ep_square) = game_state.en_passant_square else {
        return 0;
    };

    let side = game_state.side_to_move;
    let capturers = pawn_attacks(side.opposite(), ep_square)
        & game_state.pieces[side.index()][PieceKind::Pawn.index()];

    if capturers == 0 {
        0
    } else {
        en_passant_file_key(file_of(ep_square))
    }
}

/// Compute the full fingerprint from scratch.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for color in Color::BOTH {
        for kind in PieceKind::ALL {
            let piece = Piece::new(color, kind);
            for sq in Squares(game_state.pieces[color.index()][kind.index()]) {
                key ^= piece_square_key(piece, sq);
            }
        }
    }

    if game_state.side_to_move == Color::Dark {
        key ^= side_to_move_key();
    }

    key ^ castling_key(game_state.castling_rights) ^ en_passant_key(game_state)
}
