//! In-process random mover speaking UCI over an [`EngineTransport`].
//!
//! Selects uniformly from legal moves. Used for smoke runs and tests where no
//! engine executable is available.

use std::collections::VecDeque;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::transport::EngineTransport;
use crate::errors::{HarnessError, HarnessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};

const ENGINE_NAME: &str = "Plum Random";

pub struct RandomMover {
    game_state: GameState,
    /// FEN and moves behind `game_state`, so a growing `position` line only
    /// replays its new tail.
    base_fen: String,
    applied: Vec<String>,
    move_generator: LegalMoveGenerator,
    rng: StdRng,
    pending: VecDeque<String>,
    closed: bool,
}

impl RandomMover {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            game_state: GameState::new_game(),
            base_fen: String::new(),
            applied: Vec::new(),
            move_generator: LegalMoveGenerator,
            rng,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    fn handle_command(&mut self, line: &str) -> Result<(), String> {
        let trimmed = line.trim();
        let cmd = trimmed.split_whitespace().next().unwrap_or_default();

        match cmd {
            "uci" => {
                self.pending.push_back(format!("id name {ENGINE_NAME}"));
                self.pending.push_back("id author plum_match".to_owned());
                self.pending.push_back("uciok".to_owned());
            }
            "isready" => self.pending.push_back("readyok".to_owned()),
            "ucinewgame" => {
                self.game_state = GameState::new_game();
                self.base_fen.clear();
                self.applied.clear();
            }
            "position" => self.handle_position(trimmed)?,
            "go" => {
                let best = self.choose_move()?;
                self.pending.push_back(format!("bestmove {best}"));
            }
            "quit" => self.closed = true,
            // Search is synchronous; nothing to stop.
            _ => {}
        }
        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> Result<(), String> {
        let mut tokens = line.split_whitespace().skip(1).peekable();

        let base_fen = match tokens.next() {
            Some("startpos") => STARTING_POSITION_FEN.to_owned(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(&next) = tokens.peek() {
                    if next == "moves" {
                        break;
                    }
                    fen_parts.push(next);
                    tokens.next();
                }
                if fen_parts.is_empty() {
                    return Err("missing FEN after 'position fen'".to_owned());
                }
                fen_parts.join(" ")
            }
            Some(other) => return Err(format!("unsupported position token '{other}'")),
            None => return Err("incomplete position command".to_owned()),
        };
        let moves: Vec<&str> = match tokens.next() {
            Some("moves") => tokens.collect(),
            Some(other) => return Err(format!("unexpected token '{other}'")),
            None => Vec::new(),
        };

        let continues = !self.base_fen.is_empty()
            && base_fen == self.base_fen
            && moves.len() >= self.applied.len()
            && moves.iter().zip(&self.applied).all(|(new, old)| *new == old.as_str());
        if !continues {
            self.game_state = GameState::from_fen(&base_fen)?;
            self.base_fen = base_fen;
            self.applied.clear();
        }

        for &lan in &moves[self.applied.len()..] {
            let mv = long_algebraic_to_move(lan, &self.game_state).map_err(|e| e.to_string())?;
            if mv.is_null() {
                // Force a full replay next time.
                self.base_fen.clear();
                return Err(format!("illegal move in position command: {lan}"));
            }
            self.game_state.apply_move(mv)?;
            self.applied.push(lan.to_owned());
        }
        Ok(())
    }

    fn choose_move(&mut self) -> Result<String, String> {
        let legal_moves = self
            .move_generator
            .generate_legal_moves(&self.game_state)
            .map_err(|e| e.to_string())?;

        match legal_moves.as_slice().choose(&mut self.rng) {
            Some(&picked) => move_to_long_algebraic(picked),
            None => Ok("0000".to_owned()),
        }
    }
}

impl EngineTransport for RandomMover {
    fn label(&self) -> &str {
        ENGINE_NAME
    }

    fn send_line(&mut self, line: &str) -> HarnessResult<()> {
        if self.closed {
            return Err(HarnessError::EngineClosed {
                engine: ENGINE_NAME.to_owned(),
            });
        }
        self.handle_command(line).map_err(|message| HarnessError::EngineTransport {
            engine: ENGINE_NAME.to_owned(),
            message,
        })
    }

    fn receive_line(&mut self) -> HarnessResult<String> {
        self.pending.pop_front().ok_or_else(|| HarnessError::EngineClosed {
            engine: ENGINE_NAME.to_owned(),
        })
    }

    fn terminate(&mut self) {
        self.closed = true;
        self.pending.clear();
    }
}
