//! Plain-text board dump for logs and diagnostics.

use std::fmt::Write as _;

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board with coordinates, followed by the FEN and fingerprint.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for (column, file) in (0..8u8).rev().enumerate() {
            match game_state.piece_on(make_square(file, rank)) {
                Some(piece) => out.push(piece.to_fen_char()),
                None => out.push('.'),
            }

            if column < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h\n");
    let _ = writeln!(out, "Fen: {}", game_state.get_fen());
    let _ = write!(out, "Key: {:016X}", game_state.zobrist_key);

    out
}
