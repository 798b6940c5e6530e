//! Per-call legality context: opponent reach, checkers, check mask and pins.
//!
//! Everything here is recomputed from scratch for each generation call.

use crate::bitboard::bit_utils::{more_than_one, Bitboard, Squares, ALL_SQUARES};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks_set};
use crate::moves::lines::{between, line_through};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

#[derive(Debug, Clone, Copy)]
pub struct CheckInfo {
    pub king_square: Square,
    /// Squares the opponent reaches with the mover's king lifted off the board.
    pub seen: Bitboard,
    pub checkers: Bitboard,
    /// Destinations that capture or block a single checker; all squares when
    /// not in check, empty under double check.
    pub check_mask: Bitboard,
    pub pinned: Bitboard,
}

impl CheckInfo {
    pub fn compute(game_state: &GameState) -> MoveGenResult<Self> {
        let us = game_state.side_to_move;
        let them = us.opposite();
        let king_square = game_state.king_square(us).ok_or_else(|| {
            MoveGenerationError::InvalidState(format!("no {us:?} king on the board"))
        })?;

        let occupancy_without_king = game_state.occupancy() & !(1u64 << king_square);
        let seen = squares_seen_by(game_state, them, occupancy_without_king);

        let checkers = game_state.attackers_to(king_square, them);
        let check_mask = match checkers {
            0 => ALL_SQUARES,
            c if more_than_one(c) => 0,
            c => c | between(king_square, c.trailing_zeros() as Square),
        };

        let pinned = pinned_pieces(game_state, king_square);

        Ok(Self {
            king_square,
            seen,
            checkers,
            check_mask,
            pinned,
        })
    }

    #[inline]
    pub fn in_double_check(&self) -> bool {
        more_than_one(self.checkers)
    }

    /// Where a piece on `from` may land without exposing its king.
    #[inline]
    pub fn pin_mask(&self, from: Square) -> Bitboard {
        if self.pinned & (1u64 << from) != 0 {
            line_through(self.king_square, from)
        } else {
            ALL_SQUARES
        }
    }
}

/// Every square `color` attacks given `occupancy`.
pub fn squares_seen_by(game_state: &GameState, color: Color, occupancy: Bitboard) -> Bitboard {
    let mut seen = pawn_attacks_set(color, game_state.pieces_of(color, PieceKind::Pawn));

    for sq in Squares(game_state.pieces_of(color, PieceKind::Knight)) {
        seen |= knight_attacks(sq);
    }
    for sq in Squares(game_state.pieces_of(color, PieceKind::King)) {
        seen |= king_attacks(sq);
    }

    let queens = game_state.pieces_of(color, PieceKind::Queen);
    for sq in Squares(game_state.pieces_of(color, PieceKind::Bishop) | queens) {
        seen |= bishop_attacks(sq, occupancy);
    }
    for sq in Squares(game_state.pieces_of(color, PieceKind::Rook) | queens) {
        seen |= rook_attacks(sq, occupancy);
    }

    seen
}

/// Own pieces that are the sole blocker between the king and an enemy slider
/// on a matching line.
pub fn pinned_pieces(game_state: &GameState, king_square: Square) -> Bitboard {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let occupancy = game_state.occupancy();
    let queens = game_state.pieces_of(them, PieceKind::Queen);

    let snipers = (rook_attacks(king_square, 0) & (game_state.pieces_of(them, PieceKind::Rook) | queens))
        | (bishop_attacks(king_square, 0)
            & (game_state.pieces_of(them, PieceKind::Bishop) | queens));

    let mut pinned = 0u64;
    for sniper in Squares(snipers) {
        let blockers = between(king_square, sniper) & occupancy;
        if blockers != 0 && !more_than_one(blockers) {
            pinned |= blockers & game_state.occupancy_by_color[us.index()];
        }
    }

    pinned
}

/// Whether the king of `color` is attacked in the current position.
#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    game_state
        .king_square(color)
        .is_some_and(|ksq| game_state.attackers_to(ksq, color.opposite()) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn info(fen: &str) -> CheckInfo {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        CheckInfo::compute(&game).expect("king present")
    }

    #[test]
    fn quiet_position_has_open_mask() {
        let info = info(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        assert_eq!(info.checkers, 0);
        assert_eq!(info.check_mask, ALL_SQUARES);
        assert_eq!(info.pinned, 0);
        assert_eq!(info.king_square, E1);
    }

    #[test]
    fn slider_check_mask_covers_block_squares() {
        let info = info("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1");
        let expected = [sq("e4"), sq("e3"), sq("e2")]
            .iter()
            .fold(0u64, |acc, &s| acc | (1u64 << s));
        assert_eq!(info.check_mask, expected);
        assert!(!info.in_double_check());
    }

    #[test]
    fn seen_set_looks_through_the_king() {
        let info = info("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1");
        assert_ne!(info.seen & (1u64 << sq("e1")), 0);
        // Square behind the king along the checking file.
        let game = GameState::from_fen("4k3/8/8/8/4r3/8/4K3/8 w - - 0 1").expect("FEN");
        let info = CheckInfo::compute(&game).expect("king present");
        assert_ne!(info.seen & (1u64 << sq("e1")), 0);
    }

    #[test]
    fn double_check_clears_mask() {
        let info = info("4k3/8/8/8/4r3/3n4/8/4K3 w - - 0 1");
        assert!(info.in_double_check());
        assert_eq!(info.check_mask, 0);
    }

    #[test]
    fn pins_only_single_own_blockers() {
        let info = info("4k3/8/8/8/4r3/8/4B3/4K3 w - - 0 1");
        assert_eq!(info.pinned, 1u64 << sq("e2"));
        assert_eq!(info.pin_mask(sq("e2")), crate::moves::lines::file_line(sq("e1")));

        let two_blockers = info_pinned("4k3/8/8/8/4r3/4N3/4B3/4K3 w - - 0 1");
        assert_eq!(two_blockers, 0);

        let enemy_blocker = info_pinned("4k3/8/8/8/4r3/8/4b3/4K3 w - - 0 1");
        assert_eq!(enemy_blocker, 0);
    }

    fn info_pinned(fen: &str) -> Bitboard {
        info(fen).pinned
    }

    #[test]
    fn missing_king_is_invalid_state() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN");
        game.remove_piece(E1);
        assert!(matches!(
            CheckInfo::compute(&game),
            Err(MoveGenerationError::InvalidState(_))
        ));
    }
}
