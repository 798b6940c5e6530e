//! Standard algebraic notation for game records.
//!
//! Disambiguation tries the bare form, then the origin file, then the origin
//! rank, then both, and keeps the first one no other legal move shares.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::chess_move::{ChessMove, MoveKind};
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

/// Render `mv`, legal in `game_state`, with `+` / `#` suffix.
pub fn move_to_san(game_state: &GameState, mv: ChessMove) -> MoveGenResult<String> {
    let piece = game_state.piece_on(mv.from()).ok_or_else(|| {
        MoveGenerationError::InvalidState(format!("no piece on origin of {mv:?}"))
    })?;
    let to_text = square_to_algebraic(mv.to()).map_err(MoveGenerationError::InvalidState)?;
    let is_capture = mv.kind() == MoveKind::EnPassant || game_state.piece_on(mv.to()).is_some();

    let mut san = match (mv.kind(), piece.kind.san_letter()) {
        (MoveKind::Castling, _) => {
            if file_of(mv.to()) == file_of(G1) {
                "O-O".to_owned()
            } else {
                "O-O-O".to_owned()
            }
        }
        (_, None) => {
            let mut out = String::new();
            if is_capture {
                out.push(file_char(mv.from()));
                out.push('x');
            }
            out.push_str(&to_text);
            if let Some(promo) = mv.promotion_piece().and_then(PieceKind::san_letter) {
                out.push('=');
                out.push(promo);
            }
            out
        }
        (_, Some(letter)) => {
            let capture = if is_capture { "x" } else { "" };
            let qualifier = disambiguation(game_state, mv, piece)?;
            format!("{letter}{qualifier}{capture}{to_text}")
        }
    };

    let mut after = game_state.clone();
    after
        .apply_move(mv)
        .map_err(|e| MoveGenerationError::InvalidState(format!("apply_move failed: {e}")))?;
    let replies = generate_legal_moves(&after)?;
    if after.is_in_check() {
        san.push(if replies.is_empty() { '#' } else { '+' });
    }

    Ok(san)
}

fn disambiguation(game_state: &GameState, mv: ChessMove, piece: Piece) -> MoveGenResult<String> {
    let rivals: Vec<Square> = generate_legal_moves(game_state)?
        .iter()
        .filter(|other| {
            other.to() == mv.to()
                && other.from() != mv.from()
                && game_state.piece_on(other.from()) == Some(piece)
        })
        .map(|other| other.from())
        .collect();

    let from = mv.from();
    let qualifier = if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|&sq| file_of(sq) != file_of(from)) {
        file_char(from).to_string()
    } else if rivals.iter().all(|&sq| rank_of(sq) != rank_of(from)) {
        rank_char(from).to_string()
    } else {
        format!("{}{}", file_char(from), rank_char(from))
    };

    Ok(qualifier)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::move_to_san;
    use crate::game_state::game_state::GameState;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn san(fen: &str, lan: &str) -> String {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mv = long_algebraic_to_move(lan, &game).expect("generation");
        assert!(!mv.is_null(), "{lan} should be legal");
        move_to_san(&game, mv).expect("SAN should render")
    }

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e2e4", "e4" ; "pawn push")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "g1f3", "Nf3" ; "knight development")]
    #[test_case("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "e4d5", "exd5" ; "pawn capture")]
    #[test_case("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6", "exd6" ; "en passant")]
    #[test_case("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1", "O-O" ; "king side castle")]
    #[test_case("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1", "O-O-O" ; "queen side castle")]
    #[test_case("8/P7/8/8/8/8/8/k6K w - - 0 1", "a7a8q", "a8=Q+" ; "promotion")]
    #[test_case("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7b8n", "axb8=N" ; "capture promotion")]
    fn plain_moves(fen: &str, lan: &str, expected: &str) {
        assert_eq!(san(fen, lan), expected);
    }

    #[test_case("4k3/8/8/8/8/8/4K3/R6R w - - 0 1", "a1d1", "Rad1" ; "file disambiguation")]
    #[test_case("4k3/R7/8/8/8/8/8/R3K3 w - - 0 1", "a1a4", "R1a4" ; "rank disambiguation")]
    #[test_case("7k/8/8/8/2Q1Q3/8/2Q5/4K3 w - - 0 1", "e4d3", "Qed3" ; "file among three queens")]
    #[test_case("7k/8/8/8/2Q1Q3/8/2Q5/4K3 w - - 0 1", "c4d3", "Qc4d3" ; "file and rank")]
    #[test_case("4k3/8/8/8/2N5/8/6N1/4K3 w - - 0 1", "c4e3", "Nce3" ; "knights on different files")]
    fn disambiguated_moves(fen: &str, lan: &str, expected: &str) {
        assert_eq!(san(fen, lan), expected);
    }

    #[test]
    fn check_and_mate_suffixes() {
        assert_eq!(san("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8"), "Ra8+");
        assert_eq!(san("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"), "Ra8#");
    }
}
