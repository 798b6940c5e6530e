//! Operator control shared by every match worker.
//!
//! One console thread writes the status, workers only read it. Workers poll at
//! the top of each ply, so an engine call in flight always completes first.

use std::io::BufRead;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const PAUSE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MatchStatus {
    Go = 0,
    Pause = 1,
    Quit = 2,
}

impl MatchStatus {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => MatchStatus::Go,
            1 => MatchStatus::Pause,
            _ => MatchStatus::Quit,
        }
    }

    /// Console command for a line of operator input: the first token only.
    pub fn parse_command(line: &str) -> Option<Self> {
        match line.split_whitespace().next()? {
            "go" => Some(MatchStatus::Go),
            "pause" => Some(MatchStatus::Pause),
            "stop" | "quit" => Some(MatchStatus::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedStatus(Arc<AtomicU8>);

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> MatchStatus {
        MatchStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, status: MatchStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Sleep while paused. Returns `false` once quit has been requested.
    pub fn wait_while_paused(&self) -> bool {
        loop {
            match self.get() {
                MatchStatus::Go => return true,
                MatchStatus::Quit => return false,
                MatchStatus::Pause => thread::sleep(PAUSE_POLL),
            }
        }
    }
}

/// Apply operator commands from `input` until it ends. Unknown lines are
/// ignored; end of input leaves the status as it was.
pub fn read_commands<R: BufRead>(input: R, status: &SharedStatus) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        match MatchStatus::parse_command(&line) {
            Some(command) => {
                log::info!("operator: {line}");
                status.set(command);
            }
            None if line.trim().is_empty() => {}
            None => log::warn!("unknown command: {}", line.trim()),
        }
    }
}

/// Start the console reader on stdin. The thread is detached by callers; it
/// blocks on input for the life of the process.
pub fn spawn_console_reader(status: SharedStatus) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_owned())
        .spawn(move || read_commands(std::io::stdin().lock(), &status))
}
