//! Precomputed attack sets for the non-sliding pieces.
//!
//! Tables are built at compile time. Square geometry is independent of the
//! mirrored file order, so the same `file +/- n` stepping works for both.

use crate::bitboard::bit_utils::Bitboard;
use crate::game_state::chess_types::{Color, Square, FILE_A, FILE_H};

pub const KNIGHT_ATTACKS: [Bitboard; 64] = generate_offsets(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

pub const KING_ATTACKS: [Bitboard; 64] = generate_offsets(&[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
]);

/// `[color][square]`: squares a pawn of `color` on `square` attacks.
pub const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    generate_offsets(&[(-1, 1), (1, 1)]),
    generate_offsets(&[(-1, -1), (1, -1)]),
];

#[inline]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][square as usize]
}

/// Union of the capture targets of every pawn in `pawns`.
#[inline]
pub const fn pawn_attacks_set(color: Color, pawns: Bitboard) -> Bitboard {
    match color {
        Color::Light => ((pawns & !FILE_H) << 7) | ((pawns & !FILE_A) << 9),
        Color::Dark => ((pawns & !FILE_A) >> 7) | ((pawns & !FILE_H) >> 9),
    }
}

const fn generate_offsets(offsets: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < offsets.len() {
            attacks |= set_if_valid(file + offsets[i].0, rank + offsets[i].1);
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> Bitboard {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    1u64 << ((rank as usize) * 8 + (file as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::bit_utils::Squares;
    use crate::game_state::chess_types::{A1, H1};
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn knight_attacks_from_d4_has_eight_targets() {
        assert_eq!(knight_attacks(sq("d4")).count_ones(), 8);
        assert_eq!(knight_attacks(A1).count_ones(), 2);
    }

    #[test]
    fn king_attacks_in_corners_have_three_targets() {
        assert_eq!(king_attacks(A1).count_ones(), 3);
        assert_eq!(king_attacks(H1).count_ones(), 3);
    }

    #[test]
    fn pawn_attacks_match_set_wise_shift() {
        let e2 = sq("e2");
        let expected = (1u64 << sq("d3")) | (1u64 << sq("f3"));
        assert_eq!(pawn_attacks(Color::Light, e2), expected);

        let e7 = sq("e7");
        let expected = (1u64 << sq("d6")) | (1u64 << sq("f6"));
        assert_eq!(pawn_attacks(Color::Dark, e7), expected);

        for color in Color::BOTH {
            for square in Squares(!0) {
                assert_eq!(
                    pawn_attacks_set(color, 1u64 << square),
                    pawn_attacks(color, square)
                );
            }
        }
    }
}
