//! UCI client on top of an [`EngineTransport`].
//!
//! Composes the handful of commands a match needs: handshake, new game,
//! position broadcast, `go movetime` and teardown.

use crate::config::BUILTIN_RANDOM;
use crate::engines::builtin_random::RandomMover;
use crate::engines::process_transport::ProcessTransport;
use crate::engines::transport::EngineTransport;
use crate::errors::HarnessResult;

pub struct UciEngine {
    transport: Box<dyn EngineTransport>,
    name: String,
    shut_down: bool,
}

impl UciEngine {
    /// Start the engine described by `spec` and complete the handshake.
    ///
    /// `builtin:random` runs the in-process random mover; anything else is
    /// treated as an executable path.
    pub fn launch(spec: &str, fallback_name: &str, seed: Option<u64>) -> HarnessResult<Self> {
        let transport: Box<dyn EngineTransport> = if spec == BUILTIN_RANDOM {
            Box::new(RandomMover::new(seed))
        } else {
            Box::new(ProcessTransport::spawn(spec)?)
        };
        Self::connect(transport, fallback_name)
    }

    /// Run `uci` / `isready` over an existing transport. The name comes from
    /// `id name`, or `fallback_name` if the engine never sends one.
    pub fn connect(transport: Box<dyn EngineTransport>, fallback_name: &str) -> HarnessResult<Self> {
        let mut engine = Self {
            transport,
            name: fallback_name.to_owned(),
            shut_down: false,
        };

        engine.send("uci")?;
        loop {
            let line = engine.receive()?;
            if let Some(name) = line.strip_prefix("id name ") {
                let name = name.trim();
                if !name.is_empty() {
                    engine.name = name.to_owned();
                }
            } else if line.trim() == "uciok" {
                break;
            }
        }
        engine.sync()?;

        log::info!("engine ready: {} ({})", engine.name, engine.transport.label());
        Ok(engine)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new_game(&mut self) -> HarnessResult<()> {
        self.send("ucinewgame")?;
        self.sync()
    }

    /// Send a full `position ...` command line.
    pub fn send_position(&mut self, position_command: &str) -> HarnessResult<()> {
        self.send(position_command)
    }

    /// Ask for a move and return the token following `bestmove`. An empty
    /// string comes back if the engine sends a bare `bestmove`.
    pub fn think(&mut self, movetime_ms: u64) -> HarnessResult<String> {
        self.send(&format!("go movetime {movetime_ms}"))?;
        loop {
            let line = self.receive()?;
            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                if token == "bestmove" {
                    return Ok(tokens.next().unwrap_or_default().to_owned());
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        let _ = self.send("stop");
        let _ = self.send("quit");
        self.transport.terminate();
        log::debug!("engine stopped: {}", self.name);
    }

    fn sync(&mut self) -> HarnessResult<()> {
        self.send("isready")?;
        while self.receive()?.trim() != "readyok" {}
        Ok(())
    }

    fn send(&mut self, line: &str) -> HarnessResult<()> {
        log::trace!("{} >> {}", self.name, line);
        self.transport.send_line(line)
    }

    fn receive(&mut self) -> HarnessResult<String> {
        let line = self.transport.receive_line()?;
        log::trace!("{} << {}", self.name, line);
        Ok(line)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
