//! PGN rendering of finished (or aborted) match games.
//!
//! Headers follow the seven tag roster, plus `SetUp`/`FEN` when the game did
//! not begin from the standard array. Movetext is SAN with move numbers taken
//! from the starting position, so a game that opens with Black reads `12...`.

use std::fmt::Write as _;

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::ChessMove;
use crate::utils::san::move_to_san;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgnResult {
    LightWins,
    DarkWins,
    Draw,
    Unfinished,
}

impl PgnResult {
    pub const fn token(self) -> &'static str {
        match self {
            PgnResult::LightWins => "1-0",
            PgnResult::DarkWins => "0-1",
            PgnResult::Draw => "1/2-1/2",
            PgnResult::Unfinished => "*",
        }
    }

    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::Light => PgnResult::LightWins,
            Color::Dark => PgnResult::DarkWins,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "Engine match".to_owned(),
            site: "Local".to_owned(),
            date: "????.??.??".to_owned(),
            round: "-".to_owned(),
            white: "White".to_owned(),
            black: "Black".to_owned(),
        }
    }
}

pub fn write_pgn(
    headers: &PgnHeaders,
    initial_state: &GameState,
    move_history: &[ChessMove],
    result: PgnResult,
) -> Result<String, String> {
    let mut out = String::new();

    let mut tags: Vec<(&str, String)> = vec![
        ("Event", headers.event.clone()),
        ("Site", headers.site.clone()),
        ("Date", headers.date.clone()),
        ("Round", headers.round.clone()),
        ("White", headers.white.clone()),
        ("Black", headers.black.clone()),
        ("Result", result.token().to_owned()),
    ];
    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        tags.push(("SetUp", "1".to_owned()));
        tags.push(("FEN", initial_fen));
    }

    for (key, value) in &tags {
        let _ = writeln!(out, "[{} \"{}\"]", key, escape_pgn_value(value));
    }
    out.push('\n');

    let mut state = initial_state.clone();
    let mut parts = Vec::<String>::with_capacity(move_history.len() + 1);
    for (ply, &mv) in move_history.iter().enumerate() {
        let san = move_to_san(&state, mv).map_err(|e| e.to_string())?;
        let number = state.fullmove_number;
        match state.side_to_move {
            Color::Light => parts.push(format!("{number}. {san}")),
            Color::Dark if ply == 0 => parts.push(format!("{number}... {san}")),
            Color::Dark => parts.push(san),
        }
        state.apply_move(mv)?;
    }

    parts.push(result.token().to_owned());
    out.push_str(&parts.join(" "));
    out.push('\n');

    Ok(out)
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
