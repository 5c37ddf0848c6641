//! Run one viscous polar and print it as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xfoil_bridge::{
    AirfoilSource, AnalysisRequest, OperatingPoint, SolverConfig, Target, XfoilClient,
};

#[derive(Parser, Debug)]
#[command(name = "xfoil-polar", about = "Run a viscous XFOIL polar and print it as JSON", version)]
#[command(group(ArgGroup::new("geometry").args(["coordinates", "naca"]).required(true)))]
#[command(group(ArgGroup::new("point").args(["alpha", "alpha_seq", "cl", "cl_seq"]).required(true)))]
struct Cli {
    /// Airfoil coordinate file.
    #[arg(value_name = "FILE")]
    coordinates: Option<PathBuf>,

    /// Generate a 4- or 5-digit NACA section instead of loading a file.
    #[arg(long, value_name = "DIGITS")]
    naca: Option<String>,

    /// Reynolds number.
    #[arg(long)]
    re: f64,

    /// Mach number.
    #[arg(long)]
    mach: Option<f64>,

    /// Single angle of attack in degrees.
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Angle-of-attack sweep.
    #[arg(long = "alpha-seq", num_args = 3, value_names = ["START", "STOP", "STEP"], allow_negative_numbers = true)]
    alpha_seq: Option<Vec<f64>>,

    /// Single lift coefficient.
    #[arg(long, allow_negative_numbers = true)]
    cl: Option<f64>,

    /// Lift-coefficient sweep.
    #[arg(long = "cl-seq", num_args = 3, value_names = ["START", "STOP", "STEP"], allow_negative_numbers = true)]
    cl_seq: Option<Vec<f64>>,

    /// Viscous iteration limit.
    #[arg(long)]
    iter: Option<u32>,

    /// Solver executable (default: $XFOIL_PATH, then xfoil on PATH).
    #[arg(long)]
    solver: Option<PathBuf>,

    /// Overall deadline in seconds.
    #[arg(long, default_value_t = 60.0, allow_negative_numbers = true)]
    deadline: f64,

    /// Skip geometry normalization.
    #[arg(long = "no-normalize")]
    no_normalize: bool,
}

impl Cli {
    fn request(&self) -> anyhow::Result<AnalysisRequest> {
        let airfoil = match (&self.coordinates, &self.naca) {
            (Some(path), None) => AirfoilSource::file(path),
            (None, Some(digits)) => AirfoilSource::naca(digits)?,
            _ => bail!("give either a coordinate file or --naca"),
        };

        let (target, point) = match (self.alpha, &self.alpha_seq, self.cl, &self.cl_seq) {
            (Some(a), None, None, None) => (Target::Alpha, OperatingPoint::Single(a)),
            (None, Some(seq), None, None) => (Target::Alpha, OperatingPoint::from_values(seq)?),
            (None, None, Some(c), None) => (Target::Cl, OperatingPoint::Single(c)),
            (None, None, None, Some(seq)) => (Target::Cl, OperatingPoint::from_values(seq)?),
            _ => bail!("give exactly one of --alpha, --alpha-seq, --cl, --cl-seq"),
        };

        let mut request = AnalysisRequest::new(airfoil, target, point, self.re)
            .normalize(!self.no_normalize);
        request.mach = self.mach;
        request.iterations = self.iter;
        Ok(request)
    }

    fn config(&self) -> anyhow::Result<SolverConfig> {
        let deadline = Duration::try_from_secs_f64(self.deadline)
            .with_context(|| format!("invalid deadline {}", self.deadline))?;
        let mut builder = SolverConfig::builder().deadline(deadline);
        if let Some(ref solver) = self.solver {
            builder = builder.solver_path(solver);
        }
        Ok(builder.build()?)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let request = cli.request()?;
    let client = XfoilClient::with_config(cli.config()?);

    tracing::info!(airfoil = %request.airfoil, target = %request.target, "running polar");
    let polar = client
        .query(&request)
        .await
        .with_context(|| format!("polar for {} failed", request.airfoil))?;

    println!("{}", serde_json::to_string_pretty(&polar)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "xfoil_bridge=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
