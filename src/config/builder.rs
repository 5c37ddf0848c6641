//! Solver configuration and builder.
//!
//! This module provides the builder pattern for configuring how the solver
//! process is started and how its output is consumed.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use xfoil_bridge::config::SolverConfig;
//!
//! let config = SolverConfig::builder()
//!     .solver_path("/opt/xfoil/bin/xfoil")
//!     .deadline(Duration::from_secs(30))
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::options::Sentinel;
use crate::polar::{default_rules, FieldRule, PolarParser, DEFAULT_FOOTER_LINES};
use crate::{Error, Result};

/// Environment variable consulted when no solver path is configured.
pub const ENV_SOLVER_PATH: &str = "XFOIL_PATH";

/// Executable name looked up on `PATH` as the last resort.
pub const DEFAULT_SOLVER: &str = "xfoil";

/// Default overall deadline for one query.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Default bounded wait of a single output poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for spawning and talking to the solver.
///
/// Use [`SolverConfig::builder()`] to create a new configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    // Process options
    pub(crate) solver_path: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) working_directory: Option<PathBuf>,
    pub(crate) env_vars: HashMap<String, String>,
    pub(crate) inherit_env: bool,

    // Dialogue options
    pub(crate) deadline: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) sentinel: Sentinel,

    // Output parsing
    pub(crate) field_rules: Vec<FieldRule>,
    pub(crate) footer_lines: usize,
}

impl SolverConfig {
    /// Create a new builder for SolverConfig.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }

    /// Resolved solver executable.
    pub fn solver_path(&self) -> &PathBuf {
        &self.solver_path
    }

    /// Extra arguments passed to the solver.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory if set.
    pub fn working_directory(&self) -> Option<&PathBuf> {
        self.working_directory.as_ref()
    }

    /// Overall deadline for one query.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Bounded wait of a single output poll.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// End-of-response marker.
    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    /// Build a parser from the configured field table and footer length.
    pub fn parser(&self) -> PolarParser {
        PolarParser::new(self.field_rules.clone(), self.footer_lines)
    }

    /// The solver command as displayed in errors.
    pub(crate) fn solver_command(&self) -> String {
        self.solver_path.display().to_string()
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_path: resolve_solver_path(None, std::env::var_os(ENV_SOLVER_PATH)),
            args: Vec::new(),
            working_directory: None,
            env_vars: HashMap::new(),
            inherit_env: true,
            deadline: DEFAULT_DEADLINE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            sentinel: Sentinel::default(),
            field_rules: default_rules(),
            footer_lines: DEFAULT_FOOTER_LINES,
        }
    }
}

/// Builder for [`SolverConfig`].
///
/// This builder validates the configuration when
/// [`build()`](SolverConfigBuilder::build) is called.
#[derive(Debug, Clone)]
pub struct SolverConfigBuilder {
    solver_path: Option<PathBuf>,
    args: Vec<String>,
    working_directory: Option<PathBuf>,
    env_vars: HashMap<String, String>,
    inherit_env: bool,
    deadline: Duration,
    poll_interval: Duration,
    sentinel: Option<String>,
    field_rules: Option<Vec<FieldRule>>,
    footer_lines: usize,
}

impl Default for SolverConfigBuilder {
    fn default() -> Self {
        Self {
            solver_path: None,
            args: Vec::new(),
            working_directory: None,
            env_vars: HashMap::new(),
            inherit_env: true, // Default: inherit parent environment
            deadline: DEFAULT_DEADLINE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            sentinel: None,
            field_rules: None,
            footer_lines: DEFAULT_FOOTER_LINES,
        }
    }
}

impl SolverConfigBuilder {
    // -------------------------------------------------------------------------
    // Process options
    // -------------------------------------------------------------------------

    /// Path to the solver binary (default: `$XFOIL_PATH`, then "xfoil" on PATH).
    pub fn solver_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.solver_path = Some(path.into());
        self
    }

    /// Append one argument to the solver command line.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments to the solver command line.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory for the solver process.
    ///
    /// Relative coordinate file paths are resolved by the solver against it.
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    /// Add/override environment variable for subprocess.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Don't inherit parent environment (default: inherit).
    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    // -------------------------------------------------------------------------
    // Dialogue options
    // -------------------------------------------------------------------------

    /// Overall deadline for one query, from first command to sentinel.
    pub fn deadline(mut self, duration: Duration) -> Self {
        self.deadline = duration;
        self
    }

    /// Bounded wait of each output poll while draining.
    pub fn poll_interval(mut self, duration: Duration) -> Self {
        self.poll_interval = duration;
        self
    }

    /// Marker token sent after the result listing (default "ENDD").
    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel = Some(token.into());
        self
    }

    // -------------------------------------------------------------------------
    // Output parsing
    // -------------------------------------------------------------------------

    /// Replace the metadata field table.
    pub fn field_rules(mut self, rules: Vec<FieldRule>) -> Self {
        self.field_rules = Some(rules);
        self
    }

    /// Number of trailing lines after the last data row.
    pub fn footer_lines(mut self, lines: usize) -> Self {
        self.footer_lines = lines;
        self
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    /// Build the configuration.
    ///
    /// This validates:
    /// - Deadline and poll interval are non-zero, poll interval <= deadline
    /// - The sentinel is a single non-empty token
    /// - The working directory exists if set
    ///
    /// Note: solver existence is checked lazily at spawn time.
    pub fn build(self) -> Result<SolverConfig> {
        if self.deadline.is_zero() {
            return Err(Error::InvalidConfig("deadline must be positive".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be positive".into()));
        }
        if self.poll_interval > self.deadline {
            return Err(Error::InvalidConfig(format!(
                "poll interval {:?} exceeds deadline {:?}",
                self.poll_interval, self.deadline
            )));
        }

        let sentinel = match self.sentinel {
            Some(token) => Sentinel::new(token)?,
            None => Sentinel::default(),
        };

        if let Some(ref dir) = self.working_directory {
            if !dir.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "working directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        let solver_path =
            resolve_solver_path(self.solver_path, std::env::var_os(ENV_SOLVER_PATH));

        Ok(SolverConfig {
            solver_path,
            args: self.args,
            working_directory: self.working_directory,
            env_vars: self.env_vars,
            inherit_env: self.inherit_env,
            deadline: self.deadline,
            poll_interval: self.poll_interval,
            sentinel,
            field_rules: self.field_rules.unwrap_or_else(default_rules),
            footer_lines: self.footer_lines,
        })
    }
}

/// Explicit path, then the environment variable, then the bare executable name.
fn resolve_solver_path(explicit: Option<PathBuf>, env_value: Option<OsString>) -> PathBuf {
    explicit
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOLVER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = SolverConfigBuilder::default()
            .solver_path("xfoil")
            .build()
            .unwrap();

        assert_eq!(config.solver_path(), &PathBuf::from("xfoil"));
        assert!(config.args().is_empty());
        assert_eq!(config.deadline(), DEFAULT_DEADLINE);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(config.sentinel().as_str(), "ENDD");
        assert_eq!(config.footer_lines, DEFAULT_FOOTER_LINES);
        assert_eq!(config.field_rules.len(), default_rules().len());
        assert!(config.inherit_env, "inherit_env should default to true");
    }

    #[test]
    fn solver_path_resolution_order() {
        assert_eq!(
            resolve_solver_path(Some("/a/xfoil".into()), Some("/b/xfoil".into())),
            PathBuf::from("/a/xfoil")
        );
        assert_eq!(
            resolve_solver_path(None, Some("/b/xfoil".into())),
            PathBuf::from("/b/xfoil")
        );
        assert_eq!(
            resolve_solver_path(None, Some(OsString::new())),
            PathBuf::from("xfoil")
        );
        assert_eq!(resolve_solver_path(None, None), PathBuf::from("xfoil"));
    }

    #[test]
    fn builder_with_args() {
        let config = SolverConfigBuilder::default()
            .solver_path("sh")
            .arg("fake_xfoil.sh")
            .args(["polar", "--quiet"])
            .build()
            .unwrap();

        assert_eq!(config.args(), ["fake_xfoil.sh", "polar", "--quiet"]);
        assert_eq!(config.solver_command(), "sh");
    }

    #[test]
    fn builder_zero_deadline() {
        let result = SolverConfigBuilder::default()
            .deadline(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_zero_poll_interval() {
        let result = SolverConfigBuilder::default()
            .poll_interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_poll_longer_than_deadline() {
        let result = SolverConfigBuilder::default()
            .deadline(Duration::from_millis(10))
            .poll_interval(Duration::from_millis(100))
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_invalid_sentinel() {
        let result = SolverConfigBuilder::default().sentinel("END OF").build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_custom_sentinel() {
        let config = SolverConfigBuilder::default()
            .sentinel("QQQ_DONE")
            .build()
            .unwrap();
        assert_eq!(config.sentinel().as_str(), "QQQ_DONE");
    }

    #[test]
    fn builder_invalid_working_directory() {
        let result = SolverConfigBuilder::default()
            .working_directory("/nonexistent/path/that/does/not/exist")
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_custom_field_rules() {
        let rule = FieldRule::new("Re", "Re=", r"Re=(\d+\.\d+e\d+)").unwrap();
        let config = SolverConfigBuilder::default()
            .field_rules(vec![rule])
            .footer_lines(3)
            .build()
            .unwrap();
        assert_eq!(config.field_rules.len(), 1);
        assert_eq!(config.footer_lines, 3);
    }

    #[test]
    fn env_overrides() {
        let config = SolverConfigBuilder::default()
            .env("LANG", "C")
            .inherit_env(false)
            .build()
            .unwrap();
        assert_eq!(config.env_vars.get("LANG"), Some(&"C".to_string()));
        assert!(!config.inherit_env);
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SolverConfig>();
        assert_send_sync::<SolverConfigBuilder>();
    }
}
