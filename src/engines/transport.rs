//! Line transport to a chess engine.
//!
//! The match code only ever sees this trait, so a child process, an
//! in-process mover and a scripted test double are interchangeable.

use crate::errors::HarnessResult;

pub trait EngineTransport: Send {
    /// Label used in diagnostics before the engine has reported its name.
    fn label(&self) -> &str;

    fn send_line(&mut self, line: &str) -> HarnessResult<()>;

    /// Block until the engine produces its next output line.
    fn receive_line(&mut self) -> HarnessResult<String>;

    /// Release the engine. Must be safe to call more than once.
    fn terminate(&mut self);
}
