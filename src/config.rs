//! Command-line configuration for a match run.

use std::path::PathBuf;

use clap::Parser;

use crate::errors::{HarnessError, HarnessResult};

/// Engine argument that selects the in-process random mover.
pub const BUILTIN_RANDOM: &str = "builtin:random";

#[derive(Parser, Debug, Clone)]
#[command(name = "plum_match", version, about = "Play two UCI engines against each other")]
pub struct HarnessConfig {
    /// First engine: executable path or `builtin:random`.
    #[arg(long)]
    pub engine1: String,

    /// Second engine: executable path or `builtin:random`.
    #[arg(long)]
    pub engine2: String,

    /// Thinking time per move, in milliseconds.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub time: u64,

    /// Number of concurrent matches.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub threads: u64,

    /// Starting positions, one FEN per line.
    #[arg(long, default_value = "lc01k.txt")]
    pub fen_file: PathBuf,

    /// Directory for per-match game logs.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Seed for position shuffles and color assignment.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Engine1 always takes the side to move of the starting position.
    #[arg(long)]
    pub fixed_colors: bool,

    /// Suppress the per-game progress line.
    #[arg(long)]
    pub quiet: bool,
}

impl HarnessConfig {
    pub fn validate(&self) -> HarnessResult<()> {
        for (flag, spec) in [("--engine1", &self.engine1), ("--engine2", &self.engine2)] {
            if spec.trim().is_empty() {
                return Err(HarnessError::InvalidConfig(format!("{flag} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        usize::try_from(self.threads).unwrap_or(usize::MAX)
    }

    /// Short display name for an engine spec: the file stem of a path.
    pub fn engine_label(spec: &str) -> String {
        if spec == BUILTIN_RANDOM {
            return "random".to_owned();
        }
        PathBuf::from(spec)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| spec.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::HarnessConfig;

    #[test]
    fn default_values() {
        let config = HarnessConfig::try_parse_from(["plum_match", "--engine1", "a", "--engine2", "b"])
            .expect("should parse");
        assert_eq!(config.time, 100);
        assert_eq!(config.threads, 1);
        assert_eq!(config.fen_file.to_str(), Some("lc01k.txt"));
        assert_eq!(config.seed, None);
        assert!(!config.fixed_colors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_time_and_threads_are_rejected() {
        for args in [
            ["plum_match", "--engine1", "a", "--engine2", "b", "--time", "0"],
            ["plum_match", "--engine1", "a", "--engine2", "b", "--threads", "0"],
        ] {
            assert!(HarnessConfig::try_parse_from(args).is_err());
        }
    }

    #[test]
    fn engine_is_required() {
        assert!(HarnessConfig::try_parse_from(["plum_match", "--engine1", "a"]).is_err());
    }

    #[test]
    fn blank_engine_fails_validation() {
        let config = HarnessConfig::try_parse_from(["plum_match", "--engine1", " ", "--engine2", "b"])
            .expect("should parse");
        assert!(config.validate().is_err());
    }

    #[test]
    fn labels_use_file_stem() {
        assert_eq!(HarnessConfig::engine_label("/opt/engines/stockfish.exe"), "stockfish");
        assert_eq!(HarnessConfig::engine_label("builtin:random"), "random");
    }
}
