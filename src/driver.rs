//! Command protocol driver: one viscous polar per solver process.
//!
//! The driver walks the [`DialogueState`] machine over a [`SolverProcess`],
//! collects every output line until the sentinel shows up and hands the
//! capture to the configured [`PolarParser`](crate::polar::PolarParser).
//!
//! Draining is a loop of bounded polls, so the overall deadline is always
//! honoured. A missed deadline becomes [`Error::Stall`], an exited solver
//! becomes [`Error::ProcessDied`]; both terminate the process.

use tokio::time::{timeout_at, Instant};

use crate::config::SolverConfig;
use crate::polar::PolarResult;
use crate::process::SolverProcess;
use crate::protocol::{build_dialogue, AnalysisRequest, Dialogue, DialogueState};
use crate::{Error, Result};

/// Drives the fixed dialogue on one solver process.
///
/// The solver is left inside its analysis menu with accumulation switched on
/// after a query, so a driver runs at most one query. Use a fresh driver (and
/// process) per evaluation, and one driver per task for parallel work.
pub struct Driver {
    process: SolverProcess,
    config: SolverConfig,
    state: DialogueState,
}

impl Driver {
    /// Spawn a solver and wrap it.
    pub fn spawn(config: &SolverConfig) -> Result<Self> {
        let process = SolverProcess::spawn(config)?;
        Ok(Self::new(process, config.clone()))
    }

    /// Wrap an already running solver.
    pub fn new(process: SolverProcess, config: SolverConfig) -> Self {
        Self {
            process,
            config,
            state: DialogueState::Idle,
        }
    }

    /// Current dialogue state.
    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// The underlying process.
    pub fn process(&mut self) -> &mut SolverProcess {
        &mut self.process
    }

    /// Kill the solver. Safe to call repeatedly.
    pub fn terminate(&mut self) {
        self.process.terminate();
    }

    /// Run one query and parse the listing.
    pub async fn run_query(&mut self, request: &AnalysisRequest) -> Result<PolarResult> {
        let lines = self.run_query_raw(request).await?;
        self.config.parser().parse(&lines)
    }

    /// Run one query and return the raw capture, sentinel line included.
    pub async fn run_query_raw(&mut self, request: &AnalysisRequest) -> Result<Vec<String>> {
        if self.state != DialogueState::Idle {
            return Err(Error::protocol(format!(
                "driver is {}, only one query runs per solver process",
                self.state
            )));
        }
        let dialogue = build_dialogue(request, self.config.sentinel())?;
        let deadline = Instant::now() + self.config.deadline();

        tracing::debug!(
            airfoil = %request.airfoil,
            target = %request.target,
            reynolds = request.reynolds,
            "starting query"
        );

        let result = match self.send_dialogue(&dialogue, deadline).await {
            Ok(()) => self.drain_until(deadline).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            if e.is_retryable() {
                self.process.terminate();
            }
        }
        result
    }

    /// Collect output until the sentinel, within the configured deadline.
    ///
    /// Used by [`run_query_raw`](Self::run_query_raw) once the dialogue is
    /// written; also usable after sending commands through
    /// [`process`](Self::process) directly.
    pub async fn drain(&mut self) -> Result<Vec<String>> {
        let deadline = Instant::now() + self.config.deadline();
        let result = self.drain_until(deadline).await;
        if matches!(result, Err(ref e) if e.is_retryable()) {
            self.process.terminate();
        }
        result
    }

    async fn send_dialogue(&mut self, dialogue: &Dialogue, deadline: Instant) -> Result<()> {
        let mut state = self.state;
        while let Some(next) = state.next() {
            if next == DialogueState::Done {
                break;
            }
            state = next;
            self.state = state;
            tracing::trace!(state = %state, "dialogue transition");

            for command in dialogue.commands_for(state) {
                match timeout_at(deadline, self.process.send(command)).await {
                    Ok(sent) => sent?,
                    Err(_) => return Err(Error::Stall(self.config.deadline())),
                }
            }
        }
        Ok(())
    }

    async fn drain_until(&mut self, deadline: Instant) -> Result<Vec<String>> {
        self.state = DialogueState::Draining;
        let poll = self.config.poll_interval();
        let mut lines = Vec::new();

        loop {
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(lines = lines.len(), "deadline passed without sentinel");
                return Err(Error::Stall(self.config.deadline()));
            }

            match self.process.read_line(poll.min(deadline - now)).await {
                Some(line) => {
                    let done = self.config.sentinel().is_in(&line);
                    lines.push(line);
                    if done {
                        self.state = DialogueState::Done;
                        tracing::debug!(lines = lines.len(), "sentinel observed");
                        return Ok(lines);
                    }
                }
                None if self.process.is_terminated() || self.process.output_finished() => {
                    for line in self.process.stderr_lines() {
                        tracing::debug!(line = %line.trim_end(), "solver stderr");
                    }
                    return Err(self.process.died());
                }
                None => {}
            }
        }
    }
}
