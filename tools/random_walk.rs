/// Random Walk — runs distance statistics for the walkers and plots their
/// end points.
///
/// Usage: random-walk <LENGTHS> <TRIALS> <CHARACTER> [--seed <n>] [--output <path>] [--characters <file.ron>]

use anyhow::{Context, Result};
use clap::Parser;
use random_walk::core::driver::{DriverError, Simulation};
use random_walk::core::plot::{exporter_for, PlotConfig};
use random_walk::core::registry::RegistryError;
use std::path::PathBuf;

/// Comma-separated walk lengths, e.g. `10,100,1000`.
#[derive(Debug, Clone)]
struct WalkLengths(Vec<u32>);

fn parse_lengths(input: &str) -> Result<WalkLengths, String> {
    let mut lengths = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        match part.parse::<u32>() {
            Ok(0) | Err(_) => {
                return Err(format!("'{}' is not a positive integer walk length", part));
            }
            Ok(n) => lengths.push(n),
        }
    }
    Ok(WalkLengths(lengths))
}

#[derive(Debug, Parser)]
#[command(name = "random-walk", version)]
#[command(about = "Simulate biased 2D random walks and plot their end points")]
struct Args {
    /// Walk lengths to simulate (comma-separated positive integers)
    #[arg(value_parser = parse_lengths)]
    lengths: WalkLengths,

    /// Trials per walk length
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    trials: u32,

    /// Character to simulate: Pa, Mi-Ma, Reg or All (not case-sensitive)
    character: String,

    /// Seed for reproducible runs (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Plot destination; `.eps` is written directly, anything else is rasterized to PNG
    #[arg(short, long, default_value = "random_walk.png")]
    output: PathBuf,

    /// RON file of extra or overriding characters
    #[arg(long)]
    characters: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = Simulation::builder();
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(ref path) = args.characters {
        builder = builder.characters_file(path);
    }
    let mut simulation = builder.build().context("failed to set up simulation")?;

    match simulation.run(&args.lengths.0, args.trials, &args.character) {
        Ok(report) => println!("{}", report),
        Err(DriverError::Registry(RegistryError::UnknownCharacter { guidance, .. })) => {
            println!("{}", guidance);
        }
        Err(e) => return Err(e).context("simulation failed"),
    }

    let batches = simulation
        .plot(&PlotConfig::default())
        .context("failed to generate plot points")?;
    exporter_for(&args.output)
        .export(&batches, &args.output)
        .with_context(|| format!("failed to export plot to {}", args.output.display()))?;

    Ok(())
}
