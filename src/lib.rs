//! # xfoil_bridge
//!
//! Async Rust bridge to the interactive XFOIL airfoil solver.
//!
//! XFOIL has no batch mode: it prints prompts, reads terse commands and
//! streams results mixed with status text. This library turns that into a
//! request/response API:
//! - Non-blocking line reading from the solver's output
//! - A fixed command dialogue per viscous polar, terminated by a sentinel
//! - Deadline handling that kills stalled solvers instead of hanging
//! - A table-driven parser producing a typed [`PolarResult`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use xfoil_bridge::{AirfoilSource, Result, XfoilClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = XfoilClient::new()?;
//!     let polar = client
//!         .oper_visc_cl(AirfoilSource::naca("2215")?, 0.5, 1e6, None)
//!         .await?;
//!     println!("CD = {:?}", polar.first("CD"));
//!     Ok(())
//! }
//! ```
//!
//! ## Generated geometry
//!
//! ```ignore
//! use xfoil_bridge::{AnalysisRequest, CoordinateFile};
//!
//! let file = CoordinateFile::create(&points)?;
//! let request = AnalysisRequest::alpha(file.source(), 0.0, 2e6).mach(0.6);
//! // `file` must outlive the query.
//! let score = client.query_or_none(&request).await.and_then(|p| p.first("CD"));
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! use std::time::Duration;
//! use xfoil_bridge::XfoilClient;
//!
//! let client = XfoilClient::builder()
//!     .solver_path("/opt/xfoil/bin/xfoil")
//!     .deadline(Duration::from_secs(20))
//!     .build()?;
//! ```

pub mod airfoil;
mod client;
pub mod config;
pub mod driver;
mod error;
pub mod polar;
pub mod process;
pub mod protocol;

pub use error::{Error, Result};

// Re-export the main client types at crate root
pub use client::{ClientBuilder, XfoilClient};
pub use driver::Driver;

// Re-export commonly used config types at crate root
pub use config::{
    AirfoilSource, OperatingPoint, Sentinel, SolverConfig, SolverConfigBuilder, Target,
};

// Re-export commonly used protocol, result and process types at crate root
pub use airfoil::{write_coordinates, CoordinateFile};
pub use polar::{FieldRule, PolarParser, PolarResult};
pub use process::{LineReader, SolverProcess};
pub use protocol::{AnalysisRequest, Command, DialogueState};
