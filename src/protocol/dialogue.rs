//! The fixed command dialogue for one viscous polar.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::command::Command;
use crate::config::{AirfoilSource, OperatingPoint, Sentinel, Target};
use crate::{Error, Result};

/// Phases of one conversation with the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueState {
    /// Nothing sent yet.
    Idle,
    /// Geometry and display setup.
    Configuring,
    /// Analysis settings and the operating-point request were sent.
    AwaitingCompute,
    /// Listing and sentinel were sent; collecting output.
    Draining,
    /// Sentinel observed.
    Done,
}

impl DialogueState {
    /// The state that follows this one, or `None` after `Done`.
    pub fn next(self) -> Option<Self> {
        match self {
            DialogueState::Idle => Some(DialogueState::Configuring),
            DialogueState::Configuring => Some(DialogueState::AwaitingCompute),
            DialogueState::AwaitingCompute => Some(DialogueState::Draining),
            DialogueState::Draining => Some(DialogueState::Done),
            DialogueState::Done => None,
        }
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogueState::Idle => "idle",
            DialogueState::Configuring => "configuring",
            DialogueState::AwaitingCompute => "awaiting-compute",
            DialogueState::Draining => "draining",
            DialogueState::Done => "done",
        };
        f.write_str(name)
    }
}

/// One viscous analysis: geometry, flow conditions and operating point(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub airfoil: AirfoilSource,
    pub target: Target,
    pub operating_point: OperatingPoint,
    pub reynolds: f64,
    #[serde(default)]
    pub mach: Option<f64>,
    /// Iteration cap; the solver's own default (10) applies when unset.
    #[serde(default)]
    pub iterations: Option<u32>,
    /// Run the geometry through `NORM` first.
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Keep the solver's plot window enabled.
    #[serde(default)]
    pub graphics: bool,
}

fn default_true() -> bool {
    true
}

impl AnalysisRequest {
    /// Create a request with normalization on and graphics off.
    pub fn new(
        airfoil: AirfoilSource,
        target: Target,
        operating_point: impl Into<OperatingPoint>,
        reynolds: f64,
    ) -> Self {
        Self {
            airfoil,
            target,
            operating_point: operating_point.into(),
            reynolds,
            mach: None,
            iterations: None,
            normalize: true,
            graphics: false,
        }
    }

    /// Angle-of-attack request.
    pub fn alpha(
        airfoil: AirfoilSource,
        operating_point: impl Into<OperatingPoint>,
        reynolds: f64,
    ) -> Self {
        Self::new(airfoil, Target::Alpha, operating_point, reynolds)
    }

    /// Lift-coefficient request.
    pub fn cl(
        airfoil: AirfoilSource,
        operating_point: impl Into<OperatingPoint>,
        reynolds: f64,
    ) -> Self {
        Self::new(airfoil, Target::Cl, operating_point, reynolds)
    }

    /// Set the Mach number.
    pub fn mach(mut self, mach: f64) -> Self {
        self.mach = Some(mach);
        self
    }

    /// Set the iteration cap.
    pub fn iterations(mut self, limit: u32) -> Self {
        self.iterations = Some(limit);
        self
    }

    /// Enable or disable `NORM`.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enable or disable the solver's plot window.
    pub fn graphics(mut self, graphics: bool) -> Self {
        self.graphics = graphics;
        self
    }

    /// Reject arguments the solver would misread or hang on.
    pub fn validate(&self) -> Result<()> {
        if !(self.reynolds.is_finite() && self.reynolds > 0.0) {
            return Err(Error::protocol(format!(
                "Reynolds number must be positive, got {}",
                self.reynolds
            )));
        }
        if let Some(mach) = self.mach {
            if !(mach.is_finite() && (0.0..1.0).contains(&mach)) {
                return Err(Error::protocol(format!(
                    "Mach number must be in [0, 1), got {mach}"
                )));
            }
        }
        if self.iterations == Some(0) {
            return Err(Error::protocol("iteration limit must be at least 1"));
        }
        self.operating_point.validate()?;

        match &self.airfoil {
            AirfoilSource::Naca(digits) => {
                AirfoilSource::naca(digits)?;
            }
            AirfoilSource::File(path) => {
                let text = path.to_string_lossy();
                if text.is_empty() || text.contains(['\n', '\r']) {
                    return Err(Error::protocol(format!(
                        "unusable coordinate file path {text:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Commands for one request, grouped by the state they move the dialogue into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialogue {
    /// Sent on `Idle -> Configuring`.
    pub configure: Vec<Command>,
    /// Sent on `Configuring -> AwaitingCompute`.
    pub compute: Vec<Command>,
    /// Sent on `AwaitingCompute -> Draining`.
    pub drain: Vec<Command>,
}

impl Dialogue {
    /// Commands for the transition into `state`.
    pub fn commands_for(&self, state: DialogueState) -> &[Command] {
        match state {
            DialogueState::Configuring => &self.configure,
            DialogueState::AwaitingCompute => &self.compute,
            DialogueState::Draining => &self.drain,
            DialogueState::Idle | DialogueState::Done => &[],
        }
    }

    /// All commands in send order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.configure
            .iter()
            .chain(self.compute.iter())
            .chain(self.drain.iter())
    }
}

/// Encode a request as the solver's command dialogue.
pub fn build_dialogue(request: &AnalysisRequest, sentinel: &Sentinel) -> Result<Dialogue> {
    request.validate()?;

    let mut configure = Vec::new();
    if request.normalize {
        configure.push(Command::line("NORM"));
    }
    match &request.airfoil {
        // The empty second line dismisses the airfoil name prompt.
        AirfoilSource::File(path) => {
            configure.push(Command::raw(format!("LOAD {}\n\n", path.display())))
        }
        AirfoilSource::Naca(digits) => configure.push(Command::line(format!("NACA {digits}"))),
    }
    if !request.graphics {
        configure.push(Command::raw("PLOP\nG\n\n"));
    }

    let mut compute = vec![Command::line("OPER")];
    if let Some(limit) = request.iterations {
        compute.push(Command::line(format!("ITER {limit}")));
    }
    compute.push(Command::line(format!("VISC {}", request.reynolds)));
    if let Some(mach) = request.mach {
        compute.push(Command::line(format!("MACH {mach:.3}")));
    }
    // Accumulate with no save file and no dump file.
    compute.push(Command::raw("PACC\n\n\n"));
    compute.push(Command::line(
        request.operating_point.command_for(request.target),
    ));

    let drain = vec![Command::raw(format!("PLIS\n{sentinel}\n\n"))];

    Ok(Dialogue {
        configure,
        compute,
        drain,
    })
}
