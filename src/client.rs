//! High-level client for running viscous polars.
//!
//! This module provides [`XfoilClient`], the main entry point for callers
//! such as an optimization loop that evaluates many airfoils in a row.
//!
//! # Example
//!
//! ```ignore
//! use xfoil_bridge::{AirfoilSource, Result, XfoilClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = XfoilClient::new()?;
//!     let airfoil = AirfoilSource::naca("2215")?;
//!
//!     // Angle-of-attack sweep from 0 to 5 degrees
//!     let polar = client
//!         .oper_visc_alpha(airfoil, (0.0, 5.0, 1.0), 2e6, Some(0.6))
//!         .await?;
//!     println!("{:?}", polar.column("CL"));
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AirfoilSource, OperatingPoint, SolverConfig, SolverConfigBuilder};
use crate::driver::Driver;
use crate::polar::{FieldRule, PolarResult};
use crate::protocol::AnalysisRequest;
use crate::Result;

/// A client for running solver queries.
///
/// Every query spawns its own solver process and terminates it afterwards,
/// so no state leaks between evaluations.
///
/// # Thread Safety
///
/// `XfoilClient` is `Send + Sync` and cheap to clone. Concurrent queries run
/// on independent processes and never share output.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use xfoil_bridge::XfoilClient;
///
/// let client = XfoilClient::builder()
///     .solver_path("/opt/xfoil/bin/xfoil")
///     .deadline(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct XfoilClient {
    config: Arc<SolverConfig>,
}

impl XfoilClient {
    /// Create a new client with default configuration.
    ///
    /// The solver is looked up through `XFOIL_PATH`, then `xfoil` on `PATH`.
    pub fn new() -> Result<Self> {
        let config = SolverConfig::builder().build()?;
        Ok(Self::with_config(config))
    }

    /// Create a new client with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run one request on a fresh solver process.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`](crate::Error::Protocol) for malformed arguments
    /// - spawn errors when the solver cannot be started
    /// - [`Error::Stall`](crate::Error::Stall) or
    ///   [`Error::ProcessDied`](crate::Error::ProcessDied) when the dialogue
    ///   does not complete; the process is killed in both cases
    /// - [`Error::Parse`](crate::Error::Parse) for an unrecognized listing
    pub async fn query(&self, request: &AnalysisRequest) -> Result<PolarResult> {
        // Reject bad input before paying for a process.
        request.validate()?;

        let mut driver = Driver::spawn(&self.config)?;
        let result = driver.run_query(request).await;
        driver.terminate();
        result
    }

    /// Like [`query`](Self::query), but reports failures as "no result".
    ///
    /// Meant for search loops that treat a failed evaluation as
    /// non-convergence and move on.
    pub async fn query_or_none(&self, request: &AnalysisRequest) -> Option<PolarResult> {
        match self.query(request).await {
            Ok(polar) => Some(polar),
            Err(e) => {
                tracing::warn!(airfoil = %request.airfoil, error = %e, "evaluation failed");
                None
            }
        }
    }

    /// Viscous analysis at prescribed angle(s) of attack.
    pub async fn oper_visc_alpha(
        &self,
        airfoil: AirfoilSource,
        alpha: impl Into<OperatingPoint>,
        reynolds: f64,
        mach: Option<f64>,
    ) -> Result<PolarResult> {
        let mut request = AnalysisRequest::alpha(airfoil, alpha, reynolds);
        request.mach = mach;
        self.query(&request).await
    }

    /// Viscous analysis at prescribed lift coefficient(s).
    pub async fn oper_visc_cl(
        &self,
        airfoil: AirfoilSource,
        cl: impl Into<OperatingPoint>,
        reynolds: f64,
        mach: Option<f64>,
    ) -> Result<PolarResult> {
        let mut request = AnalysisRequest::cl(airfoil, cl, reynolds);
        request.mach = mach;
        self.query(&request).await
    }
}

/// Builder for creating an [`XfoilClient`] with custom configuration.
///
/// Every setter delegates to [`SolverConfigBuilder`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    inner: SolverConfigBuilder,
}

impl ClientBuilder {
    /// Create a new client builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) when the
    /// configuration does not validate.
    pub fn build(self) -> Result<XfoilClient> {
        let config = self.inner.build()?;
        Ok(XfoilClient::with_config(config))
    }

    /// Path to the solver binary.
    pub fn solver_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.inner = self.inner.solver_path(path);
        self
    }

    /// Append arguments to the solver command line.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.inner = self.inner.args(args);
        self
    }

    /// Working directory for the solver process.
    pub fn working_directory(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.inner = self.inner.working_directory(path);
        self
    }

    /// Add/override an environment variable for the solver.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.env(key, value);
        self
    }

    /// Overall deadline for one query.
    pub fn deadline(mut self, duration: Duration) -> Self {
        self.inner = self.inner.deadline(duration);
        self
    }

    /// Bounded wait of each output poll.
    pub fn poll_interval(mut self, duration: Duration) -> Self {
        self.inner = self.inner.poll_interval(duration);
        self
    }

    /// End-of-response marker token.
    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.sentinel(token);
        self
    }

    /// Replace the metadata field table.
    pub fn field_rules(mut self, rules: Vec<FieldRule>) -> Self {
        self.inner = self.inner.field_rules(rules);
        self
    }
}
