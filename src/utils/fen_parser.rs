//! FEN-to-GameState parser.
//!
//! Builds a fully populated position (bitboards, mailbox, rights, clocks,
//! fingerprint and a one-entry repetition history) from a Forsyth-Edwards
//! Notation string. The halfmove and fullmove fields may be omitted, as they
//! are in EPD-style opening corpora.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::game_state::zobrist::compute_zobrist_key;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?
        .max(1);

    for color in Color::BOTH {
        if game_state.pieces_of(color, PieceKind::King).count_ones() != 1 {
            return Err(format!("FEN must contain exactly one {color:?} king"));
        }
    }

    game_state.zobrist_key = compute_zobrist_key(&game_state);
    game_state.reset_history();

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7u8 - fen_rank_idx as u8;
        // Columns are read a-file first; square files are mirrored.
        let mut column = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                column += empty_count as u8;
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if column >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            let sq = make_square(7 - column, board_rank);
            game_state.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << sq;
            game_state.occupancy_by_color[piece.color.index()] |= 1u64 << sq;
            game_state.mailbox[sq as usize] = Some(piece);
            column += 1;
        }

        if column != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)?;
    match rank_of(square) {
        2 | 5 => Ok(Some(square)),
        _ => Err(format!("En-passant square must be on rank 3 or 6: {en_passant_part}")),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn parse_starting_fen() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.occupancy().count_ones(), 32);
        assert_eq!(game_state.piece_on(E1), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(game_state.piece_on(D8), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert_eq!(game_state.piece_on(A1), Some(Piece::new(Color::Light, PieceKind::Rook)));
    }

    #[test]
    fn clocks_are_optional() {
        let game_state =
            parse_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3").expect("four-field FEN should parse");
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.en_passant_square, algebraic_to_square("e3").ok());
    }

    #[test]
    fn rejects_malformed_layouts() {
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 w X - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }
}
