//! Process spawning and lifecycle management.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStdin, Command as ProcessCommand};

use super::io::{LineReader, LineWriter};
use crate::config::SolverConfig;
use crate::protocol::Command;
use crate::{Error, Result};

/// A running solver process.
///
/// Owns the child, a writer on its standard input and [`LineReader`]s over
/// its standard output and standard error. Exactly one conversation may use a
/// handle at a time; run independent handles for parallel work.
///
/// # Termination
///
/// [`terminate`](Self::terminate) kills the child and may be called any number
/// of times. Dropping a `SolverProcess` terminates it as well, so no solver
/// outlives its handle on any exit path.
pub struct SolverProcess {
    child: Child,
    writer: Option<LineWriter<ChildStdin>>,
    reader: LineReader,
    stderr_reader: LineReader,
    exit_status: Option<ExitStatus>,
    terminated: bool,
}

impl SolverProcess {
    /// Spawn the configured solver with all three standard streams piped.
    ///
    /// A reader is attached to standard output immediately. Must be called
    /// from within a tokio runtime.
    pub fn spawn(config: &SolverConfig) -> Result<Self> {
        let mut cmd = build_command(config);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::SolverNotFound {
                    searched: config.solver_command(),
                }
            } else {
                Error::ProcessSpawn(e)
            }
        })?;

        let stdin = child.stdin.take().expect("stdin was configured");
        let stdout = child.stdout.take().expect("stdout was configured");
        let stderr = child.stderr.take().expect("stderr was configured");

        tracing::debug!(
            pid = child.id(),
            solver = %config.solver_command(),
            "spawned solver"
        );

        Ok(Self {
            child,
            writer: Some(LineWriter::new(stdin)),
            reader: LineReader::new(stdout),
            stderr_reader: LineReader::new(stderr),
            exit_status: None,
            terminated: false,
        })
    }

    /// Write one command to the solver's standard input.
    ///
    /// Fails with [`Error::ProcessDied`] once the solver has exited or the
    /// handle was terminated.
    pub async fn send(&mut self, command: &Command) -> Result<()> {
        if self.terminated {
            return Err(self.died());
        }
        if self.exit_status().is_some() {
            return Err(self.died());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.died());
        };

        tracing::debug!(command = %command, "sending command");
        match writer.write(&command.encode()).await {
            Ok(()) => Ok(()),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                self.writer = None;
                Err(self.died())
            }
            Err(e) => Err(e),
        }
    }

    /// Write `text`, appending a line terminator when `append_newline` is set.
    pub async fn send_text(&mut self, text: &str, append_newline: bool) -> Result<()> {
        let command = if append_newline {
            Command::line(text)
        } else {
            Command::raw(text)
        };
        self.send(&command).await
    }

    /// Pop the next output line, waiting at most `timeout`.
    pub async fn read_line(&mut self, timeout: Duration) -> Option<String> {
        self.reader.read_line(timeout).await
    }

    /// Check whether standard output ended and every line was consumed.
    pub fn output_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// Drain whatever the solver wrote to standard error so far.
    pub fn stderr_lines(&mut self) -> Vec<String> {
        self.stderr_reader.drain()
    }

    /// Kill the solver without waiting for it to exit.
    ///
    /// Idempotent: later calls, or calls after the solver already exited,
    /// do nothing.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.writer = None;
        if let Err(e) = self.child.start_kill() {
            tracing::trace!("solver already gone: {}", e);
        } else {
            tracing::debug!(pid = self.child.id(), "terminated solver");
        }
    }

    /// Whether [`terminate`](Self::terminate) was called.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Check if the solver is still running.
    pub fn is_alive(&mut self) -> bool {
        !self.terminated && self.exit_status().is_none()
    }

    /// Exit status, if the solver has exited.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        if self.exit_status.is_none() {
            self.exit_status = self.child.try_wait().ok().flatten();
        }
        self.exit_status
    }

    /// Wait for the solver to exit and return its exit status.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        let status = self.child.wait().await.map_err(Error::io)?;
        self.exit_status = Some(status);
        Ok(status)
    }

    /// Get the process ID while the solver is running.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Build a [`Error::ProcessDied`] carrying the exit status when known.
    pub(crate) fn died(&mut self) -> Error {
        let status = match self.exit_status() {
            Some(status) => Some(status.to_string()),
            None if self.terminated => Some("terminated".to_string()),
            None => None,
        };
        Error::ProcessDied { status }
    }
}

impl Drop for SolverProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Build a tokio Command from the config.
fn build_command(config: &SolverConfig) -> ProcessCommand {
    let mut cmd = ProcessCommand::new(config.solver_path());
    cmd.args(config.args());

    if let Some(dir) = config.working_directory() {
        cmd.current_dir(dir);
    }

    if !config.inherit_env {
        cmd.env_clear();
    }
    for (key, value) in &config.env_vars {
        cmd.env(key, value);
    }

    cmd
}
