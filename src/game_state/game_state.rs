//! Board state: bitboards, mailbox, rights, clocks, fingerprint and history.
//!
//! `GameState` is owned by exactly one match worker for the duration of a game
//! and mutated in place, one legal move per ply. Bitboards and the mailbox are
//! only ever changed together through `put_piece` / `remove_piece`, which also
//! keep the Zobrist key current.

use crate::bitboard::bit_utils::{lsb, Bitboard};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::zobrist::{
    castling_key, en_passant_key, piece_square_key, side_to_move_key,
};
use crate::moves::chess_move::{ChessMove, MoveKind};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[Bitboard; 6]; 2],
    pub occupancy_by_color: [Bitboard; 2],
    pub mailbox: [Option<Piece>; 64],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,
    /// One key per position reached in the current game, current one last.
    pub repetition_history: Vec<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            mailbox: [None; 64],

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,
            repetition_history: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.mailbox[square as usize]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self) -> Bitboard {
        self.occupancy_by_color[0] | self.occupancy_by_color[1]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of(color, PieceKind::King);
        (kings != 0).then(|| lsb(kings))
    }

    /// Pieces of `attacker` that attack `square` given the current occupancy.
    pub fn attackers_to(&self, square: Square, attacker: Color) -> Bitboard {
        let occ = self.occupancy();
        let queens = self.pieces_of(attacker, PieceKind::Queen);

        (pawn_attacks(attacker.opposite(), square) & self.pieces_of(attacker, PieceKind::Pawn))
            | (knight_attacks(square) & self.pieces_of(attacker, PieceKind::Knight))
            | (king_attacks(square) & self.pieces_of(attacker, PieceKind::King))
            | (bishop_attacks(square, occ) & (self.pieces_of(attacker, PieceKind::Bishop) | queens))
            | (rook_attacks(square, occ) & (self.pieces_of(attacker, PieceKind::Rook) | queens))
    }

    /// Enemy pieces currently giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        match self.king_square(self.side_to_move) {
            Some(ksq) => self.attackers_to(ksq, self.side_to_move.opposite()),
            None => 0,
        }
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.checkers() != 0
    }

    pub(crate) fn put_piece(&mut self, piece: Piece, square: Square) {
        let mask = 1u64 << square;
        self.pieces[piece.color.index()][piece.kind.index()] |= mask;
        self.occupancy_by_color[piece.color.index()] |= mask;
        self.mailbox[square as usize] = Some(piece);
        self.zobrist_key ^= piece_square_key(piece, square);
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.mailbox[square as usize].take()?;
        let mask = !(1u64 << square);
        self.pieces[piece.color.index()][piece.kind.index()] &= mask;
        self.occupancy_by_color[piece.color.index()] &= mask;
        self.zobrist_key ^= piece_square_key(piece, square);
        Some(piece)
    }

    /// Restart the repetition log from the current position.
    pub fn reset_history(&mut self) {
        self.repetition_history.clear();
        self.repetition_history.push(self.zobrist_key);
    }

    /// How many times the current position occurred in this game, itself
    /// included. Positions before the last pawn move or capture cannot recur,
    /// so only that window is scanned.
    pub fn repetition_count(&self) -> usize {
        let window = usize::from(self.halfmove_clock) + 1;
        self.repetition_history
            .iter()
            .rev()
            .take(window)
            .filter(|&&key| key == self.zobrist_key)
            .count()
    }

    /// Play `mv` in place. `mv` must have been generated from this exact
    /// position.
    pub fn apply_move(&mut self, mv: ChessMove) -> Result<(), String> {
        let from = mv.from();
        let to = mv.to();
        let us = self.side_to_move;
        let them = us.opposite();

        let moving = self
            .piece_on(from)
            .filter(|p| p.color == us)
            .ok_or_else(|| format!("no {us:?} piece on from-square {from} for {mv:?}"))?;

        self.zobrist_key ^= en_passant_key(self) ^ castling_key(self.castling_rights);

        let capture_square = match mv.kind() {
            MoveKind::EnPassant => (to as i8 - us.forward()) as Square,
            _ => to,
        };
        let captured = match self.piece_on(capture_square) {
            Some(p) if p.color == them => self.remove_piece(capture_square),
            _ => None,
        };

        if moving.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        self.remove_piece(from);
        let placed = match mv.promotion_piece() {
            Some(kind) => Piece::new(us, kind),
            None => moving,
        };
        self.put_piece(placed, to);

        if mv.kind() == MoveKind::Castling {
            let (rook_from, rook_to) = castling_rook_squares(to)
                .ok_or_else(|| format!("invalid castling destination {to}"))?;
            if let Some(rook) = self.remove_piece(rook_from) {
                self.put_piece(rook, rook_to);
            }
        }

        self.castling_rights &= !(rights_touched_by(from) | rights_touched_by(to));

        self.en_passant_square = if moving.kind == PieceKind::Pawn && from.abs_diff(to) == 16 {
            Some((from + to) / 2)
        } else {
            None
        };

        if us == Color::Dark {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;
        self.zobrist_key ^= side_to_move_key();
        self.zobrist_key ^= en_passant_key(self) ^ castling_key(self.castling_rights);

        self.repetition_history.push(self.zobrist_key);
        Ok(())
    }
}

/// Rook origin and destination for a king castling onto `king_to`.
pub const fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// Castling rights lost when a piece leaves or lands on `square`.
const fn rights_touched_by(square: Square) -> CastlingRights {
    match square {
        E1 => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
        H1 => CASTLE_LIGHT_KINGSIDE,
        A1 => CASTLE_LIGHT_QUEENSIDE,
        E8 => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
        H8 => CASTLE_DARK_KINGSIDE,
        A8 => CASTLE_DARK_QUEENSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_types::*;
    use crate::game_state::zobrist::compute_zobrist_key;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn play(game: &mut GameState, lans: &[&str]) {
        for lan in lans {
            let mv = long_algebraic_to_move(lan, game).expect("move generation should succeed");
            assert!(!mv.is_null(), "{lan} should be legal in {}", game.get_fen());
            game.apply_move(mv).expect("move should apply");
        }
    }

    fn assert_consistent(game: &GameState) {
        let mut by_color = [0u64; 2];
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                by_color[color.index()] |= game.pieces_of(color, kind);
            }
        }
        assert_eq!(by_color, game.occupancy_by_color);
        assert_eq!(by_color[0] & by_color[1], 0);
        for sq in 0..64u8 {
            let from_bitboards = Color::BOTH.iter().find_map(|&c| {
                PieceKind::ALL
                    .iter()
                    .find(|&&k| game.pieces_of(c, k) & (1u64 << sq) != 0)
                    .map(|&k| Piece::new(c, k))
            });
            assert_eq!(game.piece_on(sq), from_bitboards, "square {sq}");
        }
        assert_eq!(game.zobrist_key, compute_zobrist_key(game));
    }

    #[test]
    fn starting_position_layout() {
        let game = GameState::new_game();
        assert_consistent(&game);
        assert_eq!(game.king_square(Color::Light), Some(E1));
        assert_eq!(game.king_square(Color::Dark), Some(E8));
        assert_eq!(game.castling_rights, CASTLE_ALL);
        assert_eq!(game.repetition_history, vec![game.zobrist_key]);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut game, &["e1g1", "e8c8"]);
        assert_consistent(&game);
        assert_eq!(game.piece_on(F1), Some(Piece::new(Color::Light, PieceKind::Rook)));
        assert_eq!(game.piece_on(H1), None);
        assert_eq!(game.piece_on(D8), Some(Piece::new(Color::Dark, PieceKind::Rook)));
        assert_eq!(game.castling_rights, 0);
    }

    #[test]
    fn rook_capture_clears_opponent_right_permanently() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut game, &["a1a8"]);
        assert_eq!(game.castling_rights, CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_KINGSIDE);
        // King and rook both return to their home squares.
        play(&mut game, &["e8d7", "a8a2", "d7e8", "a2a1"]);
        assert_eq!(game.piece_on(E8), Some(Piece::new(Color::Dark, PieceKind::King)));
        assert_eq!(game.piece_on(A1), Some(Piece::new(Color::Light, PieceKind::Rook)));
        assert_eq!(game.castling_rights & CASTLE_DARK_QUEENSIDE, 0);
        assert_eq!(game.castling_rights & CASTLE_DARK_KINGSIDE, 0);
        assert_eq!(game.castling_rights, CASTLE_LIGHT_KINGSIDE);
        assert_consistent(&game);
    }

    #[test]
    fn en_passant_target_lives_one_ply() {
        let mut game = GameState::new_game();
        play(&mut game, &["e2e4"]);
        assert_eq!(game.en_passant_square, algebraic_to_square("e3").ok());
        play(&mut game, &["g8f6"]);
        assert_eq!(game.en_passant_square, None);
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        let mut game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1")
            .expect("FEN should parse");
        play(&mut game, &["e5d6"]);
        assert_consistent(&game);
        assert_eq!(game.piece_on(algebraic_to_square("d5").expect("d5")), None);
        assert_eq!(game.pieces_of(Color::Dark, PieceKind::Pawn), 0);
        assert_eq!(game.halfmove_clock, 0);
    }

    #[test]
    fn promotion_replaces_pawn() {
        let mut game =
            GameState::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 3 40").expect("FEN should parse");
        play(&mut game, &["a7b8n"]);
        assert_consistent(&game);
        let b8 = algebraic_to_square("b8").expect("b8");
        assert_eq!(game.piece_on(b8), Some(Piece::new(Color::Light, PieceKind::Knight)));
        assert_eq!(game.pieces_of(Color::Light, PieceKind::Pawn), 0);
        assert_eq!(game.halfmove_clock, 0);
    }

    #[test]
    fn clocks_and_history_advance() {
        let mut game = GameState::new_game();
        play(&mut game, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert_eq!(game.halfmove_clock, 4);
        assert_eq!(game.fullmove_number, 3);
        assert_eq!(game.repetition_history.len(), 5);
        assert_eq!(game.repetition_count(), 2);
        assert_consistent(&game);
    }
}
