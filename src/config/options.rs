//! Type-safe request options for the solver dialogue.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which quantity an operating point prescribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Angle of attack in degrees.
    #[default]
    Alpha,
    /// Lift coefficient.
    Cl,
}

impl Target {
    /// Solver command for a single operating point.
    pub fn single_command(self) -> &'static str {
        match self {
            Target::Alpha => "ALFA",
            Target::Cl => "CL",
        }
    }

    /// Solver command for a swept range of operating points.
    pub fn sweep_command(self) -> &'static str {
        match self {
            Target::Alpha => "ASEQ",
            Target::Cl => "CSEQ",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Alpha => write!(f, "alpha"),
            Target::Cl => write!(f, "cl"),
        }
    }
}

/// One operating point or an evenly stepped sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingPoint {
    /// A single angle of attack or lift coefficient.
    Single(f64),
    /// `start`, `stop`, `step` as accepted by the solver's sequence commands.
    Sweep { start: f64, stop: f64, step: f64 },
}

impl OperatingPoint {
    /// Interpret a caller-supplied list of values.
    ///
    /// One value is a single point, three values are `(start, stop, step)`.
    /// Any other length is rejected.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let point = match *values {
            [value] => OperatingPoint::Single(value),
            [start, stop, step] => OperatingPoint::Sweep { start, stop, step },
            _ => {
                return Err(Error::protocol(format!(
                    "operating point is a single value or [start, stop, step], got {} values",
                    values.len()
                )))
            }
        };
        point.validate()?;
        Ok(point)
    }

    /// Check that every value is finite and a sweep actually steps.
    pub fn validate(&self) -> Result<()> {
        match *self {
            OperatingPoint::Single(value) => {
                if !value.is_finite() {
                    return Err(Error::protocol(format!(
                        "operating point must be finite, got {value}"
                    )));
                }
            }
            OperatingPoint::Sweep { start, stop, step } => {
                if ![start, stop, step].iter().all(|v| v.is_finite()) {
                    return Err(Error::protocol(format!(
                        "sweep values must be finite, got [{start}, {stop}, {step}]"
                    )));
                }
                if step == 0.0 {
                    return Err(Error::protocol("sweep step must be non-zero"));
                }
            }
        }
        Ok(())
    }

    /// Render the request line for the given target, e.g. `ASEQ 0.000 5.000 1.000`.
    pub fn command_for(&self, target: Target) -> String {
        match *self {
            OperatingPoint::Single(value) => {
                format!("{} {:.3}", target.single_command(), value)
            }
            OperatingPoint::Sweep { start, stop, step } => format!(
                "{} {:.3} {:.3} {:.3}",
                target.sweep_command(),
                start,
                stop,
                step
            ),
        }
    }
}

impl From<f64> for OperatingPoint {
    fn from(value: f64) -> Self {
        OperatingPoint::Single(value)
    }
}

impl From<(f64, f64, f64)> for OperatingPoint {
    fn from((start, stop, step): (f64, f64, f64)) -> Self {
        OperatingPoint::Sweep { start, stop, step }
    }
}

impl TryFrom<&[f64]> for OperatingPoint {
    type Error = Error;

    fn try_from(values: &[f64]) -> Result<Self> {
        OperatingPoint::from_values(values)
    }
}

impl TryFrom<Vec<f64>> for OperatingPoint {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        OperatingPoint::from_values(&values)
    }
}

/// Where the solver gets its airfoil geometry from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirfoilSource {
    /// A plain coordinate file loaded with `LOAD`.
    File(PathBuf),
    /// A 4- or 5-digit NACA designation generated inside the solver.
    Naca(String),
}

impl AirfoilSource {
    /// Create a NACA source, accepting `"2215"`, `"NACA 2215"` or `"naca2215"`.
    pub fn naca(designation: impl AsRef<str>) -> Result<Self> {
        let raw = designation.as_ref().trim();
        let digits = raw
            .strip_prefix("NACA")
            .or_else(|| raw.strip_prefix("naca"))
            .unwrap_or(raw)
            .trim();
        let valid = matches!(digits.len(), 4 | 5) && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(Error::protocol(format!(
                "NACA designation must be 4 or 5 digits, got {raw:?}"
            )));
        }
        Ok(AirfoilSource::Naca(digits.to_string()))
    }

    /// Create a coordinate file source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        AirfoilSource::File(path.into())
    }
}

impl fmt::Display for AirfoilSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirfoilSource::File(path) => write!(f, "{}", path.display()),
            AirfoilSource::Naca(digits) => write!(f, "NACA {}", digits),
        }
    }
}

/// Marker token sent after the result listing to delimit the response block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Sentinel(String);

impl Sentinel {
    /// Token used unless configured otherwise.
    pub const DEFAULT: &'static str = "ENDD";

    /// Create a sentinel; it must be non-empty and free of whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!(
                "sentinel must be a non-empty token without whitespace, got {token:?}"
            )));
        }
        Ok(Sentinel(token))
    }

    /// Get the sentinel as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether an output line carries the sentinel.
    pub fn is_in(&self, line: &str) -> bool {
        line.contains(self.0.as_str())
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Sentinel(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Sentinel {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        Sentinel::new(token)
    }
}

impl From<Sentinel> for String {
    fn from(sentinel: Sentinel) -> Self {
        sentinel.0
    }
}

impl AsRef<str> for Sentinel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
