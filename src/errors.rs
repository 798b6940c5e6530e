//! Error types for the match harness.
//!
//! Small leaf parsers (squares, FEN, long algebraic) return `Result<T, String>`;
//! their messages are wrapped here once they cross into harness code.

use std::path::PathBuf;

use thiserror::Error;

use crate::move_generation::move_generator::MoveGenerationError;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A starting description that does not parse.
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("engine transport error ({engine}): {message}")]
    EngineTransport { engine: String, message: String },

    /// The engine closed its output before answering.
    #[error("engine {engine} closed its output")]
    EngineClosed { engine: String },

    #[error("no starting positions in {}", path.display())]
    EmptyCorpus { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("move generation failed: {0}")]
    MoveGeneration(#[from] MoveGenerationError),

    /// A rules-engine invariant broke while applying a generated move.
    #[error("rules engine error: {0}")]
    Rules(String),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
