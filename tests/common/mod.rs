//! Test utilities for xfoil_bridge integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use xfoil_bridge::{AirfoilSource, AnalysisRequest, SolverConfig, SolverConfigBuilder};

/// Columns printed by the stub solver.
pub const STUB_COLUMNS: [&str; 7] = ["alpha", "CL", "CD", "CDp", "CM", "Top_Xtr", "Bot_Xtr"];

/// Rows printed by the stub solver in `normal` mode.
pub const STUB_ROWS: [[f64; 7]; 3] = [
    [0.000, 0.2446, 0.00683, 0.00200, -0.0558, 0.5488, 0.6452],
    [1.000, 0.3551, 0.00702, 0.00217, -0.0567, 0.5104, 0.7013],
    [2.000, 0.4652, 0.00731, 0.00240, -0.0574, 0.4702, 0.7611],
];

/// Path of the stub solver script.
pub fn stub_script() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fake_xfoil.sh")
}

/// Builder preset to run the stub in the given mode.
///
/// Modes: `normal`, `empty`, `garbled`, `silent`, `die`.
pub fn stub_builder(mode: &str) -> SolverConfigBuilder {
    SolverConfig::builder()
        .solver_path("sh")
        .arg(stub_script().display().to_string())
        .arg(mode)
        .deadline(Duration::from_secs(10))
        .poll_interval(Duration::from_millis(10))
}

/// Ready-built config for the stub in the given mode.
pub fn stub_config(mode: &str) -> SolverConfig {
    stub_builder(mode).build().expect("stub config is valid")
}

/// Typical optimizer request: one angle of attack on a NACA section.
pub fn naca_request() -> AnalysisRequest {
    AnalysisRequest::alpha(
        AirfoilSource::naca("2215").expect("valid designation"),
        (0.0, 2.0, 1.0),
        2e6,
    )
    .mach(0.6)
    .iterations(100)
}

/// Read the command log written by the stub.
pub fn read_log(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("stub wrote its log")
        .lines()
        .map(str::to_string)
        .collect()
}
