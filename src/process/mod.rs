//! Process management for the solver.
//!
//! This module handles spawning the interactive solver and moving text in and
//! out of it without ever blocking the caller longer than a bounded poll.
//!
//! # Architecture
//!
//! ```text
//! xfoil_bridge                          solver
//! ┌──────────────┐                   ┌─────────────┐
//! │ SolverProcess│──stdin (cmds)────▶│             │
//! │  LineReader  │◀─stdout (text)────│             │
//! │  LineReader  │◀─stderr (text)────│             │
//! └──────────────┘                   └─────────────┘
//! ```
//!
//! Each [`LineReader`] owns a background task that performs the blocking
//! reads and queues complete lines; the consumer pops them with a timeout.

mod io;
mod spawn;

pub use io::{LineReader, LineWriter};
pub use spawn::SolverProcess;
