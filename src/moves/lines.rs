//! Square-pair geometry: the squares strictly between two aligned squares and
//! the full line through them.

use std::sync::OnceLock;

use crate::bitboard::bit_utils::Bitboard;
use crate::game_state::chess_types::{file_of, rank_of, Square, FILE_H, RANK_1};

#[derive(Debug)]
struct LineTables {
    between: Vec<[Bitboard; 64]>,
    line: Vec<[Bitboard; 64]>,
}

static TABLES: OnceLock<LineTables> = OnceLock::new();

fn tables() -> &'static LineTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> LineTables {
    let mut between = vec![[0u64; 64]; 64];
    let mut line = vec![[0u64; 64]; 64];

    for a in 0..64u8 {
        for b in 0..64u8 {
            if a == b {
                continue;
            }
            let df = file_of(b) as i32 - file_of(a) as i32;
            let dr = rank_of(b) as i32 - rank_of(a) as i32;
            if !(df == 0 || dr == 0 || df.abs() == dr.abs()) {
                continue;
            }

            let step = (df.signum(), dr.signum());
            between[a as usize][b as usize] = walk(a, step, Some(b));
            line[a as usize][b as usize] =
                walk(a, step, None) | walk(a, (-step.0, -step.1), None) | (1u64 << a);
        }
    }

    LineTables { between, line }
}

fn walk(from: Square, (file_step, rank_step): (i32, i32), stop: Option<Square>) -> Bitboard {
    let mut out = 0u64;
    let mut file = file_of(from) as i32 + file_step;
    let mut rank = rank_of(from) as i32 + rank_step;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let sq = (rank * 8 + file) as Square;
        if Some(sq) == stop {
            break;
        }
        out |= 1u64 << sq;
        file += file_step;
        rank += rank_step;
    }

    out
}

/// Squares strictly between `a` and `b`; empty when not aligned or adjacent.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between[a as usize][b as usize]
}

/// The whole board line through `a` and `b`; empty when not aligned.
#[inline]
pub fn line_through(a: Square, b: Square) -> Bitboard {
    tables().line[a as usize][b as usize]
}

#[inline]
pub const fn file_line(square: Square) -> Bitboard {
    FILE_H << file_of(square)
}

#[inline]
pub const fn rank_line(square: Square) -> Bitboard {
    RANK_1 << (8 * rank_of(square))
}

/// Diagonal through `square` along the `+7` / `-7` step.
#[inline]
pub fn diagonal_step7(square: Square) -> Bitboard {
    walk(square, (-1, 1), None) | walk(square, (1, -1), None) | (1u64 << square)
}

/// Diagonal through `square` along the `+9` / `-9` step.
#[inline]
pub fn diagonal_step9(square: Square) -> Bitboard {
    walk(square, (1, 1), None) | walk(square, (-1, -1), None) | (1u64 << square)
}
