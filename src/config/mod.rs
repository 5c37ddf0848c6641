//! Configuration for the solver bridge.
//!
//! This module provides:
//!
//! - [`SolverConfig`] and [`SolverConfigBuilder`] for process and dialogue settings
//! - Type-safe request options like [`Target`], [`OperatingPoint`],
//!   [`AirfoilSource`] and [`Sentinel`]
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use xfoil_bridge::config::SolverConfig;
//!
//! let config = SolverConfig::builder()
//!     .solver_path("xfoil")
//!     .deadline(Duration::from_secs(20))
//!     .sentinel("ENDD")
//!     .build()?;
//! ```
//!
//! # Solver lookup
//!
//! The executable is resolved once, at build time:
//!
//! 1. the path given to [`SolverConfigBuilder::solver_path`]
//! 2. the `XFOIL_PATH` environment variable
//! 3. `xfoil`, searched on `PATH` when the process is spawned

pub mod builder;
pub mod options;

// Re-export commonly used types
pub use builder::{
    SolverConfig, SolverConfigBuilder, DEFAULT_DEADLINE, DEFAULT_POLL_INTERVAL, DEFAULT_SOLVER,
    ENV_SOLVER_PATH,
};
pub use options::{AirfoilSource, OperatingPoint, Sentinel, Target};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_exports_accessible() {
        let _: Target = Target::Alpha;
        let _: OperatingPoint = OperatingPoint::Single(0.0);
        let _: AirfoilSource = AirfoilSource::file("foil.dat");
        let _: Sentinel = Sentinel::default();
        let _: &str = ENV_SOLVER_PATH;
    }

    #[test]
    fn builder_accessible() {
        let _ = SolverConfig::builder();
    }
}
