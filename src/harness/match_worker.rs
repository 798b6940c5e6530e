//! One match worker: a private position, two engines and a shuffled queue of
//! starting positions, played game after game until the queue is exhausted,
//! the operator quits, or an engine breaks protocol.

use std::fmt;
use std::io::Write;

use chrono::Local;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::engines::uci_engine::UciEngine;
use crate::errors::{HarnessError, HarnessResult};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::{classify, GameStatus};
use crate::harness::control::SharedStatus;
use crate::move_generation::legal_move_generator::{generate_legal_moves, LegalMoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::utils::long_algebraic::{match_long_algebraic, move_to_long_algebraic};
use crate::utils::pgn::{write_pgn, PgnHeaders, PgnResult};
use crate::utils::render_game_state::render_game_state;
use crate::utils::statistics::{elo_diff, elo_margin};

/// Confidence level for every reported Elo margin.
pub const ELO_CONFIDENCE: f64 = 0.95;

/// Results from engine1's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub engine1_wins: u32,
    pub engine2_wins: u32,
    pub draws: u32,
}

impl MatchTally {
    pub fn games(&self) -> u32 {
        self.engine1_wins + self.engine2_wins + self.draws
    }

    pub fn add(&mut self, other: &MatchTally) {
        self.engine1_wins += other.engine1_wins;
        self.engine2_wins += other.engine2_wins;
        self.draws += other.draws;
    }

    pub fn elo(&self) -> f64 {
        elo_diff(self.engine1_wins, self.engine2_wins, self.draws)
    }

    pub fn elo_margin(&self) -> f64 {
        elo_margin(self.engine1_wins, self.engine2_wins, self.draws, ELO_CONFIDENCE)
    }

    fn record(&mut self, winner: Option<usize>) {
        match winner {
            Some(0) => self.engine1_wins += 1,
            Some(_) => self.engine2_wins += 1,
            None => self.draws += 1,
        }
    }
}

/// An engine answered with text that matches no legal move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolViolation {
    pub engine: String,
    pub response: String,
    pub fen: String,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} played {:?} in {}", self.engine, self.response, self.fen)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Every starting position was played.
    Completed,
    /// Stopped by the operator.
    Quit,
    EngineError(ProtocolViolation),
    /// Transport or rules failure; the message is the error text.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub id: usize,
    pub engine_names: [String; 2],
    pub tally: MatchTally,
    pub outcome: WorkerOutcome,
}

impl WorkerReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, WorkerOutcome::EngineError(_) | WorkerOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub id: usize,
    pub movetime_ms: u64,
    pub random_colors: bool,
    pub show_progress: bool,
    pub seed: Option<u64>,
}

enum GameEnd {
    /// `winner` is the engine index, `None` for a draw.
    Finished { status: GameStatus, winner: Option<usize> },
    Skipped,
    Aborted,
    Violation(ProtocolViolation),
}

pub struct MatchWorker {
    settings: WorkerSettings,
    engines: [UciEngine; 2],
    queue: Vec<String>,
    rng: StdRng,
    log: Box<dyn Write + Send>,
    tally: MatchTally,
}

impl MatchWorker {
    pub fn new(
        settings: WorkerSettings,
        engines: [UciEngine; 2],
        mut queue: Vec<String>,
        log: Box<dyn Write + Send>,
    ) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        queue.shuffle(&mut rng);

        Self {
            settings,
            engines,
            queue,
            rng,
            log,
            tally: MatchTally::default(),
        }
    }

    pub fn run(mut self, status: &SharedStatus) -> WorkerReport {
        let id = self.settings.id;
        let outcome = match self.play_queue(status) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(write_err) = writeln!(self.log, "Error: {err}") {
                    log::warn!("Match {id}: could not write to game log: {write_err}");
                }
                WorkerOutcome::Failed(err.to_string())
            }
        };

        match &outcome {
            WorkerOutcome::Completed | WorkerOutcome::Quit => log::info!("Match {id}: Done"),
            WorkerOutcome::EngineError(violation) => {
                log::error!("Match {id}: Engine error: {violation}")
            }
            WorkerOutcome::Failed(message) => log::error!("Match {id}: Engine error: {message}"),
        }
        if let Err(flush_err) = self.log.flush() {
            log::warn!("Match {id}: could not flush game log: {flush_err}");
        }

        for engine in &mut self.engines {
            engine.shutdown();
        }

        WorkerReport {
            id,
            engine_names: [self.engines[0].name().to_owned(), self.engines[1].name().to_owned()],
            tally: self.tally,
            outcome,
        }
    }

    fn play_queue(&mut self, status: &SharedStatus) -> HarnessResult<WorkerOutcome> {
        let queue = std::mem::take(&mut self.queue);
        let total = queue.len();

        for (index, fen) in queue.iter().enumerate() {
            if !status.wait_while_paused() {
                return Ok(WorkerOutcome::Quit);
            }

            match self.play_game(index, fen, status)? {
                GameEnd::Finished { status: game_status, winner } => {
                    self.tally.record(winner);
                    writeln!(self.log, "{}", capitalized(&game_status.to_string()))?;
                    let tallies = self.tally_line(index + 1, total);
                    writeln!(self.log, "{tallies}\n")?;
                    if self.settings.show_progress {
                        println!("{} {tallies}", Local::now().format("%H:%M:%S"));
                    }
                }
                GameEnd::Skipped => {}
                GameEnd::Aborted => return Ok(WorkerOutcome::Quit),
                GameEnd::Violation(violation) => return Ok(WorkerOutcome::EngineError(violation)),
            }
        }

        Ok(WorkerOutcome::Completed)
    }

    fn play_game(&mut self, index: usize, fen: &str, status: &SharedStatus) -> HarnessResult<GameEnd> {
        let start = GameState::from_fen(fen).map_err(|reason| HarnessError::InvalidFen {
            fen: fen.to_owned(),
            reason,
        })?;

        if classify(&LegalMoveGenerator, &start)?.is_terminal() {
            log::warn!("Match {}: skipping finished position {fen}", self.settings.id);
            return Ok(GameEnd::Skipped);
        }

        // seats[color] is the engine index playing that color.
        let engine1_color = if self.settings.random_colors && self.rng.random_bool(0.5) {
            start.side_to_move.opposite()
        } else {
            start.side_to_move
        };
        let mut seats = [0usize; 2];
        seats[engine1_color.index()] = 0;
        seats[engine1_color.opposite().index()] = 1;

        for engine in &mut self.engines {
            engine.new_game()?;
        }

        let mut position_command = format!("position fen {}", start.get_fen());
        self.broadcast(&position_command)?;

        let mut state = start.clone();
        let mut moves = Vec::<ChessMove>::new();

        loop {
            if !status.wait_while_paused() {
                self.write_record(index, &start, &moves, &seats, &position_command, PgnResult::Unfinished)?;
                return Ok(GameEnd::Aborted);
            }

            let mover = state.side_to_move;
            let engine_index = seats[mover.index()];
            let response = self.engines[engine_index].think(self.settings.movetime_ms)?;

            let legal_moves = generate_legal_moves(&state)?;
            let mv = match_long_algebraic(&response, &legal_moves);
            if mv.is_null() {
                let engine = self.engines[engine_index].name().to_owned();
                self.write_record(index, &start, &moves, &seats, &position_command, PgnResult::Unfinished)?;
                writeln!(self.log, "{}", render_game_state(&state))?;
                writeln!(self.log, "{engine}: {response} <- Invalid")?;
                return Ok(GameEnd::Violation(ProtocolViolation {
                    engine,
                    response,
                    fen: state.get_fen(),
                }));
            }

            state.apply_move(mv).map_err(HarnessError::Rules)?;
            moves.push(mv);
            if moves.len() == 1 {
                position_command.push_str(" moves");
            }
            position_command.push(' ');
            position_command.push_str(&move_to_long_algebraic(mv).map_err(HarnessError::Rules)?);
            self.broadcast(&position_command)?;

            let game_status = classify(&LegalMoveGenerator, &state)?;
            if game_status.is_terminal() {
                let (winner, result) = match game_status {
                    GameStatus::Checkmate => (Some(engine_index), PgnResult::win_for(mover)),
                    _ => (None, PgnResult::Draw),
                };
                self.write_record(index, &start, &moves, &seats, &position_command, result)?;
                return Ok(GameEnd::Finished { status: game_status, winner });
            }
        }
    }

    fn broadcast(&mut self, position_command: &str) -> HarnessResult<()> {
        for engine in &mut self.engines {
            engine.send_position(position_command)?;
        }
        Ok(())
    }

    fn write_record(
        &mut self,
        index: usize,
        start: &GameState,
        moves: &[ChessMove],
        seats: &[usize; 2],
        position_command: &str,
        result: PgnResult,
    ) -> HarnessResult<()> {
        let headers = PgnHeaders {
            event: format!("plum_match {}", self.settings.id),
            date: Local::now().format("%Y.%m.%d").to_string(),
            round: (index + 1).to_string(),
            white: self.engines[seats[Color::Light.index()]].name().to_owned(),
            black: self.engines[seats[Color::Dark.index()]].name().to_owned(),
            ..PgnHeaders::default()
        };
        let pgn = write_pgn(&headers, start, moves, result).map_err(HarnessError::Rules)?;

        writeln!(self.log, "{position_command}")?;
        writeln!(self.log, "{pgn}")?;
        Ok(())
    }

    fn tally_line(&self, game: usize, total: usize) -> String {
        format!(
            "Match {} {} {} {} {} Draws {} ({:+.0} +/- {:.0}) Game {}/{}",
            self.settings.id,
            self.engines[0].name(),
            self.tally.engine1_wins,
            self.engines[1].name(),
            self.tally.engine2_wins,
            self.tally.draws,
            self.tally.elo(),
            self.tally.elo_margin(),
            game,
            total
        )
    }
}

fn capitalized(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::{MatchTally, MatchWorker, WorkerOutcome, WorkerSettings};
    use crate::engines::builtin_random::RandomMover;
    use crate::engines::transport::EngineTransport;
    use crate::engines::uci_engine::UciEngine;
    use crate::errors::HarnessResult;
    use crate::harness::control::{MatchStatus, SharedStatus};

    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl SharedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("lock")).into_owned()
        }
    }

    impl Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Always answers `go` with the same move.
    struct Stubborn {
        reply: &'static str,
        pending: Vec<String>,
    }

    impl EngineTransport for Stubborn {
        fn label(&self) -> &str {
            "stubborn"
        }

        fn send_line(&mut self, line: &str) -> HarnessResult<()> {
            match line.split_whitespace().next() {
                Some("uci") => self.pending.extend(["uciok".to_owned(), "id name Stubborn".to_owned()]),
                Some("isready") => self.pending.push("readyok".to_owned()),
                Some("go") => self.pending.push(format!("bestmove {}", self.reply)),
                _ => {}
            }
            Ok(())
        }

        fn receive_line(&mut self) -> HarnessResult<String> {
            Ok(self.pending.pop().unwrap_or_default())
        }

        fn terminate(&mut self) {}
    }

    fn random_engine(seed: u64) -> UciEngine {
        UciEngine::connect(Box::new(RandomMover::new(Some(seed))), "random").expect("handshake")
    }

    fn settings(random_colors: bool) -> WorkerSettings {
        WorkerSettings {
            id: 1,
            movetime_ms: 1,
            random_colors,
            show_progress: false,
            seed: Some(11),
        }
    }

    const ENDGAMES: [&str; 3] = [
        "7k/8/8/8/8/8/8/K5R1 w - - 0 1",
        "8/8/4k3/8/8/4K3/4P3/8 w - - 0 1",
        "4k3/4p3/8/8/8/8/8/4K3 b - - 0 1",
    ];

    #[test]
    fn tally_accumulates() {
        let mut total = MatchTally::default();
        total.add(&MatchTally { engine1_wins: 2, engine2_wins: 1, draws: 3 });
        total.add(&MatchTally { engine1_wins: 8, engine2_wins: 4, draws: 2 });
        assert_eq!(total.games(), 20);
        assert!((total.elo() - 88.74).abs() < 0.01);
    }

    #[test]
    fn plays_every_position() {
        let log = SharedLog::default();
        let worker = MatchWorker::new(
            settings(true),
            [random_engine(1), random_engine(2)],
            ENDGAMES.iter().map(|fen| (*fen).to_owned()).collect(),
            Box::new(log.clone()),
        );

        let report = worker.run(&SharedStatus::new());
        assert_eq!(report.outcome, WorkerOutcome::Completed);
        assert_eq!(report.tally.games(), 3);

        let text = log.text();
        assert_eq!(text.matches("[Event \"plum_match 1\"]").count(), 3);
        assert_eq!(text.matches("position fen ").count(), 3);
        assert!(text.contains("Game 3/3"));
    }

    #[test]
    fn illegal_reply_stops_worker() {
        let log = SharedLog::default();
        let stubborn = UciEngine::connect(
            Box::new(Stubborn { reply: "e2e5", pending: Vec::new() }),
            "stubborn",
        )
        .expect("handshake");
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_owned();
        let worker = MatchWorker::new(
            settings(false),
            [stubborn, random_engine(3)],
            vec![start.clone(), start],
            Box::new(log.clone()),
        );

        let report = worker.run(&SharedStatus::new());
        match &report.outcome {
            WorkerOutcome::EngineError(violation) => {
                assert_eq!(violation.engine, "Stubborn");
                assert_eq!(violation.response, "e2e5");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(report.is_failure());
        assert_eq!(report.tally.games(), 0);

        let text = log.text();
        assert!(text.contains("Stubborn: e2e5 <- Invalid"));
        assert!(text.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert_eq!(text.matches("[Event").count(), 1);
    }

    #[test]
    fn quit_before_start_plays_nothing() {
        let status = SharedStatus::new();
        status.set(MatchStatus::Quit);
        let worker = MatchWorker::new(
            settings(false),
            [random_engine(4), random_engine(5)],
            vec![ENDGAMES[0].to_owned()],
            Box::new(SharedLog::default()),
        );

        let report = worker.run(&status);
        assert_eq!(report.outcome, WorkerOutcome::Quit);
        assert_eq!(report.tally.games(), 0);
        assert!(!report.is_failure());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn unwritable_log_fails_worker() {
        let worker = MatchWorker::new(
            settings(false),
            [random_engine(8), random_engine(9)],
            vec![ENDGAMES[0].to_owned(), ENDGAMES[1].to_owned()],
            Box::new(FullDisk),
        );

        let report = worker.run(&SharedStatus::new());
        match &report.outcome {
            WorkerOutcome::Failed(message) => assert!(message.contains("disk full"), "{message}"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(report.is_failure());
        assert_eq!(report.tally.games(), 0);
    }

    #[test]
    fn finished_start_position_is_skipped() {
        let worker = MatchWorker::new(
            settings(false),
            [random_engine(6), random_engine(7)],
            vec!["7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".to_owned()],
            Box::new(SharedLog::default()),
        );
        let report = worker.run(&SharedStatus::new());
        assert_eq!(report.outcome, WorkerOutcome::Completed);
        assert_eq!(report.tally.games(), 0);
    }
}
