//! Occupancy-indexed attack tables for bishops, rooks and queens.
//!
//! Each square owns a relevant-occupancy mask (its rays without the board
//! edge). The attack set for a given occupancy is looked up at
//! `offset[square] + pext(occupancy, mask[square])`. Tables are filled once,
//! on first use, by tracing rays over every occupancy subset.

use std::sync::OnceLock;

use crate::bitboard::bit_utils::{pdep, pext, Bitboard};
use crate::game_state::chess_types::Square;

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

#[derive(Debug)]
struct SliderTable {
    masks: [Bitboard; 64],
    offsets: [usize; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(directions: &[(i32, i32); 4]) -> Self {
        let mut masks = [0u64; 64];
        let mut offsets = [0usize; 64];
        let mut attacks = Vec::new();

        for sq in 0..64usize {
            let mask = relevant_mask(sq as i32, directions);
            masks[sq] = mask;
            offsets[sq] = attacks.len();

            for index in 0..(1u64 << mask.count_ones()) {
                let occupancy = pdep(index, mask);
                attacks.push(trace_rays(sq as i32, directions, occupancy));
            }
        }

        Self {
            masks,
            offsets,
            attacks,
        }
    }

    #[inline]
    fn lookup(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        let sq = square as usize;
        self.attacks[self.offsets[sq] + pext(occupancy, self.masks[sq]) as usize]
    }
}

#[derive(Debug)]
struct SliderTables {
    rook: SliderTable,
    bishop: SliderTable,
}

static TABLES: OnceLock<SliderTables> = OnceLock::new();

#[inline]
fn tables() -> &'static SliderTables {
    TABLES.get_or_init(|| SliderTables {
        rook: SliderTable::build(&ROOK_DIRECTIONS),
        bishop: SliderTable::build(&BISHOP_DIRECTIONS),
    })
}

/// Force table construction, e.g. before spawning worker threads.
pub fn init() {
    let _ = tables();
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    tables().rook.lookup(square, occupancy)
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    tables().bishop.lookup(square, occupancy)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

/// Ray walk used to fill the tables; stops on (and includes) the first blocker.
pub fn trace_rays(square: i32, directions: &[(i32, i32)], occupancy: Bitboard) -> Bitboard {
    let mut attacks = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = (square % 8) + file_step;
        let mut rank = (square / 8) + rank_step;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;

            if occupancy & bit != 0 {
                break;
            }

            file += file_step;
            rank += rank_step;
        }
    }

    attacks
}

fn relevant_mask(square: i32, directions: &[(i32, i32)]) -> Bitboard {
    let mut mask = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = (square % 8) + file_step;
        let mut rank = (square / 8) + rank_step;

        // The last square of each ray never blocks anything behind it.
        while (0..8).contains(&(file + file_step)) && (0..8).contains(&(rank + rank_step)) {
            mask |= 1u64 << (rank * 8 + file);
            file += file_step;
            rank += rank_step;
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn empty_board_ray_counts() {
        assert_eq!(rook_attacks(sq("d4"), 0).count_ones(), 14);
        assert_eq!(bishop_attacks(sq("d4"), 0).count_ones(), 13);
        assert_eq!(queen_attacks(sq("d4"), 0).count_ones(), 27);
        assert_eq!(bishop_attacks(sq("a1"), 0).count_ones(), 7);
    }

    #[test]
    fn rook_blocker_stops_ray() {
        let blocker = 1u64 << sq("a4");
        let attacks = rook_attacks(sq("a1"), blocker);

        assert_ne!(attacks & (1u64 << sq("a4")), 0);
        assert_eq!(attacks & (1u64 << sq("a5")), 0);
        assert_ne!(attacks & (1u64 << sq("h1")), 0);
    }

    #[test]
    fn table_lookup_matches_ray_tracing() {
        let occupancies = [
            0u64,
            0x0000_0018_2400_0000,
            0x00FF_0000_0000_FF00,
            0x8142_2418_1824_4281,
            0x1234_5678_9ABC_DEF0,
        ];
        for square in 0..64u8 {
            for &occ in &occupancies {
                assert_eq!(
                    rook_attacks(square, occ),
                    trace_rays(square as i32, &ROOK_DIRECTIONS, occ)
                );
                assert_eq!(
                    bishop_attacks(square, occ),
                    trace_rays(square as i32, &BISHOP_DIRECTIONS, occ)
                );
            }
        }
    }
}
