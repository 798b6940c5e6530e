//! Runs the configured number of match workers in parallel and sums their
//! tallies once every worker has joined.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use crate::config::HarnessConfig;
use crate::engines::uci_engine::UciEngine;
use crate::errors::{HarnessError, HarnessResult};
use crate::game_state::game_state::GameState;
use crate::harness::control::SharedStatus;
use crate::harness::match_worker::{MatchTally, MatchWorker, WorkerOutcome, WorkerReport, WorkerSettings};

#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub engine_names: [String; 2],
    pub tally: MatchTally,
    pub movetime_ms: u64,
    pub reports: Vec<WorkerReport>,
}

impl MatchSummary {
    pub fn failed_workers(&self) -> usize {
        self.reports.iter().filter(|report| report.is_failure()).count()
    }
}

/// Read one FEN per line, skipping blank lines. Every line must parse.
pub fn load_corpus(path: &Path) -> HarnessResult<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut corpus = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let fen = line.trim();
        if fen.is_empty() {
            continue;
        }
        GameState::from_fen(fen).map_err(|reason| HarnessError::InvalidFen {
            fen: fen.to_owned(),
            reason,
        })?;
        corpus.push(fen.to_owned());
    }

    if corpus.is_empty() {
        return Err(HarnessError::EmptyCorpus {
            path: path.to_path_buf(),
        });
    }
    log::info!("loaded {} starting positions from {}", corpus.len(), path.display());
    Ok(corpus)
}

pub fn log_file_path(config: &HarnessConfig, worker_id: usize) -> PathBuf {
    config.log_dir.join(format!(
        "{}_{}_{}_id{}.txt",
        HarnessConfig::engine_label(&config.engine1),
        HarnessConfig::engine_label(&config.engine2),
        config.time,
        worker_id
    ))
}

/// Play `corpus` on every worker and block until all of them finish.
pub fn run_matches(config: &HarnessConfig, corpus: &[String], status: &SharedStatus) -> HarnessResult<MatchSummary> {
    config.validate()?;
    if corpus.is_empty() {
        return Err(HarnessError::EmptyCorpus {
            path: config.fen_file.clone(),
        });
    }
    fs::create_dir_all(&config.log_dir)?;

    let workers = config.worker_count();
    log::info!(
        "starting {workers} match(es): {} vs {} at {} ms/move",
        config.engine1,
        config.engine2,
        config.time
    );

    let reports: Vec<WorkerReport> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=workers)
            .map(|id| {
                let spawned = thread::Builder::new()
                    .name(format!("match-{id}"))
                    .spawn_scoped(scope, move || run_worker(config, corpus, status, id));
                (id, spawned)
            })
            .collect();

        handles
            .into_iter()
            .map(|(id, spawned)| {
                let joined = spawned
                    .map_err(|e| e.to_string())
                    .and_then(|handle| handle.join().map_err(|_| "worker panicked".to_owned()));
                joined.unwrap_or_else(|message| failed_report(config, id, message))
            })
            .collect()
    });

    let mut tally = MatchTally::default();
    for report in &reports {
        tally.add(&report.tally);
    }

    let engine_names = reports
        .iter()
        .find(|report| !matches!(report.outcome, WorkerOutcome::Failed(_)))
        .map(|report| report.engine_names.clone())
        .unwrap_or_else(|| default_names(config));

    Ok(MatchSummary {
        engine_names,
        tally,
        movetime_ms: config.time,
        reports,
    })
}

fn run_worker(config: &HarnessConfig, corpus: &[String], status: &SharedStatus, id: usize) -> WorkerReport {
    let seed = config.seed.map(|seed| seed.wrapping_add(id as u64));

    let setup = || -> HarnessResult<MatchWorker> {
        let log = BufWriter::new(File::create(log_file_path(config, id))?);
        let engine1 = UciEngine::launch(
            &config.engine1,
            &HarnessConfig::engine_label(&config.engine1),
            seed.map(|seed| seed ^ 0x5EED_0001),
        )?;
        let engine2 = UciEngine::launch(
            &config.engine2,
            &HarnessConfig::engine_label(&config.engine2),
            seed.map(|seed| seed ^ 0x5EED_0002),
        )?;

        let settings = WorkerSettings {
            id,
            movetime_ms: config.time,
            random_colors: !config.fixed_colors,
            show_progress: !config.quiet,
            seed,
        };
        Ok(MatchWorker::new(settings, [engine1, engine2], corpus.to_vec(), boxed(log)))
    };

    match setup() {
        Ok(worker) => worker.run(status),
        Err(err) => {
            log::error!("Match {id}: Engine error: {err}");
            failed_report(config, id, err.to_string())
        }
    }
}

fn boxed<W: Write + Send + 'static>(writer: W) -> Box<dyn Write + Send> {
    Box::new(writer)
}

fn default_names(config: &HarnessConfig) -> [String; 2] {
    [
        HarnessConfig::engine_label(&config.engine1),
        HarnessConfig::engine_label(&config.engine2),
    ]
}

fn failed_report(config: &HarnessConfig, id: usize, message: String) -> WorkerReport {
    WorkerReport {
        id,
        engine_names: default_names(config),
        tally: MatchTally::default(),
        outcome: WorkerOutcome::Failed(message),
    }
}
