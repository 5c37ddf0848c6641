//! Coordinate files consumed by the solver's `LOAD` command.
//!
//! One point per line, `x y`, ordered from the trailing edge along one
//! surface to the leading edge and back along the other surface.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::AirfoilSource;
use crate::{Error, Result};

/// Write `points` as plain `x y` lines, without a trailing newline.
pub fn write_coordinates<W: Write>(mut writer: W, points: &[(f64, f64)]) -> Result<()> {
    validate(points)?;
    let body = points
        .iter()
        .map(|(x, y)| format!("{x:.6} {y:.6}"))
        .collect::<Vec<_>>()
        .join("\n");
    writer.write_all(body.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn validate(points: &[(f64, f64)]) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::protocol(format!(
            "an airfoil needs at least 3 points, got {}",
            points.len()
        )));
    }
    if let Some((i, _)) = points
        .iter()
        .enumerate()
        .find(|(_, (x, y))| !(x.is_finite() && y.is_finite()))
    {
        return Err(Error::protocol(format!("point {i} is not finite")));
    }
    Ok(())
}

/// A coordinate file that is deleted when dropped.
///
/// Keep the value alive until the query that loads it has finished.
#[derive(Debug)]
pub struct CoordinateFile {
    file: NamedTempFile,
}

impl CoordinateFile {
    /// Write `points` into a fresh temporary `.dat` file.
    pub fn create(points: &[(f64, f64)]) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("airfoil-")
            .suffix(".dat")
            .tempfile()?;
        write_coordinates(file.as_file(), points)?;
        tracing::debug!(path = %file.path().display(), points = points.len(), "wrote coordinates");
        Ok(Self { file })
    }

    /// Location of the file on disk.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// An [`AirfoilSource`] pointing at this file.
    pub fn source(&self) -> AirfoilSource {
        AirfoilSource::file(self.path())
    }
}
