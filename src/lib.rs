//! Crate root module declarations for the plum_match engine-match harness.
//!
//! The chess rules engine (bitboards, position, legal move generation, game
//! status) is the oracle; `harness` drives two UCI engines against each other
//! on top of it, and `utils` carries notation, PGN and Elo statistics.

pub mod bitboard {
    pub mod bit_utils;
}

pub mod moves {
    pub mod chess_move;
    pub mod leaper_attacks;
    pub mod lines;
    pub mod slider_attacks;
}

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod game_status;
    pub mod zobrist;
}

pub mod move_generation {
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_generator;
    pub mod move_list;
    pub mod perft;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
    pub mod statistics;
}

pub mod engines {
    pub mod builtin_random;
    pub mod process_transport;
    pub mod transport;
    pub mod uci_engine;
}

pub mod harness {
    pub mod control;
    pub mod match_worker;
    pub mod report;
    pub mod scheduler;
}

pub mod config;
pub mod errors;
