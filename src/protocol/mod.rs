//! Text protocol spoken with the solver.
//!
//! The solver reads terse commands from standard input, one per line, and
//! answers with free-form text. A viscous polar is obtained through a fixed
//! dialogue:
//!
//! ```text
//! Idle ──▶ Configuring ──▶ AwaitingCompute ──▶ Draining ──▶ Done
//!  NORM, LOAD/NACA,   OPER, ITER, VISC,      PLIS +       sentinel
//!  PLOP                MACH, PACC, ALFA/...   sentinel     observed
//! ```
//!
//! - [`Command`]: one directive plus its newline-control flag
//! - [`AnalysisRequest`]: what to compute
//! - [`build_dialogue`]: the exact command sequence for a request

mod command;
mod dialogue;

pub use command::{Command, LINE_TERMINATOR};
pub use dialogue::{build_dialogue, AnalysisRequest, Dialogue, DialogueState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Command>();
        assert_send_sync::<AnalysisRequest>();
        assert_send_sync::<Dialogue>();
        assert_send_sync::<DialogueState>();
    }

    #[test]
    fn request_roundtrip() {
        let request = AnalysisRequest::cl(crate::config::AirfoilSource::file("a.dat"), 0.5, 3e5)
            .mach(0.2)
            .iterations(50);
        let json = serde_json::to_string(&request).unwrap();
        let parsed: AnalysisRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, parsed);
    }
}
