use std::time::Duration;

/// Errors that can occur when driving the solver.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time
/// - Spawn errors: failed to start the solver process
/// - Protocol errors: the caller supplied a malformed request
/// - Runtime errors: the solver stalled or exited mid-dialogue
/// - Parse errors: solver output did not have the expected shape
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors (detected at build() time)
    // -------------------------------------------------------------------------
    /// Invalid configuration provided to builder.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -------------------------------------------------------------------------
    // Spawn errors
    // -------------------------------------------------------------------------
    /// Solver executable not found.
    #[error("solver executable not found (searched: {searched})")]
    SolverNotFound { searched: String },

    /// Failed to spawn the solver subprocess.
    #[error("failed to spawn solver process: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol errors
    // -------------------------------------------------------------------------
    /// A command argument was malformed, e.g. a two-element range.
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Runtime errors
    // -------------------------------------------------------------------------
    /// The sentinel was not observed before the deadline.
    #[error("solver stalled: no sentinel within {0:?}")]
    Stall(Duration),

    /// The solver exited (or was terminated) before the dialogue completed.
    #[error("solver process died mid-dialogue{}", .status.as_ref().map(|s| format!(" ({s})")).unwrap_or_default())]
    ProcessDied { status: Option<String> },

    /// IO error communicating with the solver subprocess.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Parse errors
    // -------------------------------------------------------------------------
    /// Solver output did not match the expected polar listing.
    #[error("failed to parse polar: {message}{}", .line.as_ref().map(|l| format!(" (line: {l:?})")).unwrap_or_default())]
    Parse {
        message: String,
        /// The offending output line, when one can be identified.
        line: Option<String>,
    },

    /// Failed to serialize a result to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a parse error, optionally pointing at the offending line.
    pub fn parse(message: impl Into<String>, line: Option<&str>) -> Self {
        Self::Parse {
            message: message.into(),
            line: line.map(|l| l.trim_end().to_string()),
        }
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create an IO error.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io(source)
    }

    /// Check if this error means the solver could not be started.
    pub fn is_spawn_error(&self) -> bool {
        matches!(self, Error::SolverNotFound { .. } | Error::ProcessSpawn(_))
    }

    /// Check if this error is retryable with a fresh process.
    ///
    /// Stalls and unexpected exits are recovered by terminating the handle and
    /// spawning a new one. Parse and protocol errors need a different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Stall(_) | Error::ProcessDied { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn is_retryable_detection() {
        assert!(Error::Stall(Duration::from_secs(30)).is_retryable());
        assert!(Error::ProcessDied { status: None }.is_retryable());
        assert!(!Error::protocol("range needs 3 values").is_retryable());
        assert!(!Error::parse("no data divider", None).is_retryable());
        assert!(!Error::InvalidConfig("bad".into()).is_retryable());
    }

    #[test]
    fn is_spawn_error_detection() {
        assert!(Error::SolverNotFound {
            searched: "xfoil".into()
        }
        .is_spawn_error());
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(Error::ProcessSpawn(io_err).is_spawn_error());
        assert!(!Error::Stall(Duration::from_secs(1)).is_spawn_error());
    }

    #[test]
    fn parse_error_carries_line() {
        let err = Error::parse("row has 2 values, expected 3", Some("   1.000   2.000\r\n"));
        match &err {
            Error::Parse { line, .. } => assert_eq!(line.as_deref(), Some("   1.000   2.000")),
            other => panic!("expected Parse, got {other:?}"),
        }
        assert!(err.to_string().contains("row has 2 values"));
        assert!(err.to_string().contains("1.000"));
    }

    #[test]
    fn process_died_display() {
        assert_eq!(
            Error::ProcessDied { status: None }.to_string(),
            "solver process died mid-dialogue"
        );
        let err = Error::ProcessDied {
            status: Some("exit status: 1".into()),
        };
        assert!(err.to_string().ends_with("(exit status: 1)"));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn question_mark_operator_io() {
        fn fallible_io() -> Result<()> {
            let _file = std::fs::File::open("/nonexistent/path/that/does/not/exist")?;
            Ok(())
        }
        assert!(matches!(fallible_io(), Err(Error::Io(_))));
    }

    #[test]
    fn question_mark_operator_json() {
        fn fallible_json() -> Result<()> {
            let _: serde_json::Value = serde_json::from_str("not valid json")?;
            Ok(())
        }
        assert!(matches!(fallible_json(), Err(Error::Json(_))));
    }
}
