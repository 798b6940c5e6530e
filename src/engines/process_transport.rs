//! Child-process transport: engine stdin/stdout over pipes.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::engines::transport::EngineTransport;
use crate::errors::{HarnessError, HarnessResult};

pub struct ProcessTransport {
    label: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl ProcessTransport {
    pub fn spawn(executable: &str) -> HarnessResult<Self> {
        let transport_error = |message: String| HarnessError::EngineTransport {
            engine: executable.to_owned(),
            message,
        };

        let mut child = Command::new(executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| transport_error(format!("failed to start: {e}")))?;

        let stdin = child.stdin.take().ok_or_else(|| transport_error("no stdin pipe".to_owned()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| transport_error("no stdout pipe".to_owned()))?;

        log::debug!("started engine {executable} (pid {})", child.id());
        Ok(Self {
            label: executable.to_owned(),
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
        })
    }
}

impl EngineTransport for ProcessTransport {
    fn label(&self) -> &str {
        &self.label
    }

    fn send_line(&mut self, line: &str) -> HarnessResult<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| HarnessError::EngineClosed {
            engine: self.label.clone(),
        })?;
        writeln!(stdin, "{line}")
            .and_then(|()| stdin.flush())
            .map_err(|e| HarnessError::EngineTransport {
                engine: self.label.clone(),
                message: e.to_string(),
            })
    }

    fn receive_line(&mut self) -> HarnessResult<String> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line)?;
        if read == 0 {
            return Err(HarnessError::EngineClosed {
                engine: self.label.clone(),
            });
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn terminate(&mut self) {
        // Closing stdin lets a well-behaved engine exit on EOF.
        self.stdin.take();
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        self.terminate();
    }
}
