//! Perft node counting over the legal generator.

use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError, MoveGenerator};
use crate::moves::chess_move::{ChessMove, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

/// Leaf node count only.
pub fn perft<G: MoveGenerator>(generator: &G, game_state: &GameState, depth: u8) -> MoveGenResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = generator.generate_legal_moves(game_state)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for &mv in moves.iter() {
        let next = child(game_state, mv)?;
        nodes += perft(generator, &next, depth - 1)?;
    }
    Ok(nodes)
}

/// Leaf counts with per-leaf move classification.
pub fn perft_counts<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for &mv in generator.generate_legal_moves(game_state)?.iter() {
        count_recurse(generator, game_state, mv, depth, &mut total)?;
    }
    Ok(total)
}

/// Splits the root moves across scoped threads.
pub fn perft_multi_threaded<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<u64> {
    if depth <= 1 {
        return perft(generator, game_state, depth);
    }

    let root_moves = generator.generate_legal_moves(game_state)?;

    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|&mv| {
                scope.spawn(move || {
                    let next = child(game_state, mv)?;
                    perft(generator, &next, depth - 1)
                })
            })
            .collect();

        let mut nodes = 0u64;
        for handle in handles {
            nodes += handle.join().map_err(|_| {
                MoveGenerationError::InvalidState("perft worker thread panicked".to_owned())
            })??;
        }
        Ok(nodes)
    })
}

fn child(game_state: &GameState, mv: ChessMove) -> MoveGenResult<GameState> {
    let mut next = game_state.clone();
    next.apply_move(mv)
        .map_err(|e| MoveGenerationError::InvalidState(format!("apply_move failed: {e}")))?;
    Ok(next)
}

fn count_recurse<G: MoveGenerator>(
    generator: &G,
    parent: &GameState,
    mv: ChessMove,
    depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    let next = child(parent, mv)?;

    if depth > 1 {
        for &reply in generator.generate_legal_moves(&next)?.iter() {
            count_recurse(generator, &next, reply, depth - 1, counts)?;
        }
        return Ok(());
    }

    counts.nodes += 1;
    let is_capture = match mv.kind() {
        MoveKind::EnPassant => {
            counts.en_passant += 1;
            true
        }
        MoveKind::Castling => {
            counts.castles += 1;
            false
        }
        MoveKind::Promotion => {
            counts.promotions += 1;
            parent.piece_on(mv.to()).is_some()
        }
        MoveKind::Normal => parent.piece_on(mv.to()).is_some(),
    };
    if is_capture {
        counts.captures += 1;
    }

    if is_king_in_check(&next, next.side_to_move) {
        counts.checks += 1;
        if generator.generate_legal_moves(&next)?.is_empty() {
            counts.checkmates += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test_case(STARTING_POSITION_FEN, 1, 20 ; "start depth 1")]
    #[test_case(STARTING_POSITION_FEN, 2, 400 ; "start depth 2")]
    #[test_case(STARTING_POSITION_FEN, 3, 8_902 ; "start depth 3")]
    #[test_case(KIWIPETE, 1, 48 ; "kiwipete depth 1")]
    #[test_case(KIWIPETE, 2, 2_039 ; "kiwipete depth 2")]
    #[test_case("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3, 2_812 ; "rook endgame depth 3")]
    #[test_case("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 2, 264 ; "promotion tangle depth 2")]
    #[test_case("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 2, 1_486 ; "talkchess depth 2")]
    #[test_case("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10", 2, 2_079 ; "symmetric middlegame depth 2")]
    fn perft_reference_counts(fen: &str, depth: u8, expected: u64) {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        assert_eq!(perft(&LegalMoveGenerator, &game, depth), Ok(expected));
    }

    #[test]
    fn depth_zero_counts_single_node() {
        let game = GameState::new_game();
        assert_eq!(perft(&LegalMoveGenerator, &game, 0), Ok(1));
        assert_eq!(
            perft_counts(&LegalMoveGenerator, &game, 0),
            Ok(PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            })
        );
    }

    #[test]
    fn start_depth_three_metrics() {
        let game = GameState::new_game();
        let counts = perft_counts(&LegalMoveGenerator, &game, 3).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 8_902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn kiwipete_depth_two_metrics() {
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let counts = perft_counts(&LegalMoveGenerator, &game, 2).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 2_039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn multi_threaded_matches_single_thread() {
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        assert_eq!(
            perft_multi_threaded(&LegalMoveGenerator, &game, 3),
            perft(&LegalMoveGenerator, &game, 3)
        );
    }
}
