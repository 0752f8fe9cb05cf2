mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use beamx::{AnalysisMode, ProblemDefinition};
use clap::{Parser, ValueEnum};
use report::render_summary;

/// Analysis mode selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Shear and moment only.
    ForceOnly,
    /// Shear, moment, slope and deflection.
    FullKinematic,
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::ForceOnly => AnalysisMode::ForceOnly,
            ModeArg::FullKinematic => AnalysisMode::FullKinematic,
        }
    }
}

/// Solve a beam described in a JSON problem file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the JSON problem definition.
    problem: PathBuf,
    /// Override the analysis mode given in the problem file.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Print the whole solution as JSON instead of the text summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // Log output is controlled through `RUST_LOG`, e.g. `RUST_LOG=debug` lists the
    // boundary equations the resolver picks.
    env_logger::init();
    let args = Args::parse();

    // Read the problem file. Supports, loads and analysis settings all come from it;
    // the command line can only switch the mode.
    let text = fs::read_to_string(&args.problem)
        .with_context(|| format!("failed to read {}", args.problem.display()))?;
    let mut definition = ProblemDefinition::from_json(&text)
        .with_context(|| format!("failed to parse {}", args.problem.display()))?;
    if let Some(mode) = args.mode {
        definition.mode = mode.into();
    }

    // Every support and load goes through the builder, so overlapping loads or
    // supports outside the span are rejected before any analysis runs.
    let beam = definition.build_beam().context("invalid beam definition")?;

    // Integrate the load function with singularity functions and solve the
    // integration constants from the boundary conditions. This is Macaulay's method,
    // see https://en.wikipedia.org/wiki/Macaulay%27s_method.
    let solution = definition
        .solver()
        .solve(&beam)
        .with_context(|| format!("{} analysis failed", definition.mode))?;

    // JSON carries the sampled arrays for plotting; the text summary mirrors a hand
    // calculation.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("{}", render_summary(&beam, &solution));
    }

    Ok(())
}
