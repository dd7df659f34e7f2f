/// Simulation driver — resolves a character selector, runs trials for each
/// walk length and collects one statistics block per pair.
///
/// Wires together the character registry, the walk engine and the statistics
/// summary around a single seeded random source.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::plot::{self, PlotBatch, PlotConfig};
use crate::core::registry::{CharacterRegistry, RegistryError};
use crate::core::stats::{self, StatsError, SummaryStats};
use crate::core::walk::{self, WalkError};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// Why a single (character, walk length) block produced no statistics.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Statistics for one character at one walk length.
#[derive(Debug)]
pub struct StatBlock {
    pub character: String,
    pub length: u32,
    pub outcome: Result<SummaryStats, BlockError>,
}

impl fmt::Display for StatBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} random walk of {} steps", self.character, self.length)?;
        match &self.outcome {
            Ok(stats) => write!(f, "{}", stats),
            Err(e) => write!(f, "Statistics unavailable: {}", e),
        }
    }
}

/// Every block from one run, in output order.
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub blocks: Vec<StatBlock>,
}

impl SimulationReport {
    pub fn failures(&self) -> impl Iterator<Item = &StatBlock> {
        self.blocks.iter().filter(|b| b.outcome.is_err())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

/// The top-level simulation. Built via `Simulation::builder()`.
pub struct Simulation {
    registry: CharacterRegistry,
    rng: StdRng,
}

/// Builder for constructing a `Simulation`.
#[derive(Default)]
pub struct SimulationBuilder {
    seed: Option<u64>,
    registry: Option<CharacterRegistry>,
    characters_path: Option<PathBuf>,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::default()
    }

    pub fn registry(&self) -> &CharacterRegistry {
        &self.registry
    }

    /// Run `trials` walks for every resolved character and walk length.
    ///
    /// Characters run in selector order (registry order for "All"); each
    /// character's lengths run in the order given. A block that fails is
    /// recorded in the report and the run continues.
    pub fn run(
        &mut self,
        lengths: &[u32],
        trials: u32,
        selector: &str,
    ) -> Result<SimulationReport, DriverError> {
        if let Some(bad) = lengths.iter().find(|l| **l == 0) {
            return Err(DriverError::InvalidArgument(format!(
                "walk length must be a positive integer, got {}",
                bad
            )));
        }
        if trials == 0 {
            return Err(DriverError::InvalidArgument(
                "trial count must be a positive integer, got 0".to_string(),
            ));
        }

        let characters = self.registry.resolve(selector).inspect_err(|e| {
            warn!("selector '{}' not run: {}", selector, e);
        })?;
        info!(
            "running {} character(s) over {} walk length(s), {} trials each",
            characters.len(),
            lengths.len(),
            trials
        );

        let mut report = SimulationReport::default();
        for character in characters {
            for &length in lengths {
                let outcome = walk::run_trials(length, trials, &character.profile, &mut self.rng)
                    .map_err(BlockError::from)
                    .and_then(|sample| stats::summarize(&sample).map_err(BlockError::from));
                match &outcome {
                    Ok(summary) => debug!("{} x {}: {:?}", character.name, length, summary),
                    Err(e) => warn!("{} x {}: {}", character.name, length, e),
                }
                report.blocks.push(StatBlock {
                    character: character.name.clone(),
                    length,
                    outcome,
                });
            }
        }
        Ok(report)
    }

    /// End-point batches for every registered character, drawn from the same
    /// random source as the statistics.
    pub fn plot(&mut self, config: &PlotConfig) -> Result<Vec<PlotBatch>, DriverError> {
        Ok(plot::plot_batches(&self.registry, config, &mut self.rng)?)
    }
}

impl SimulationBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide characters directly instead of the built-in table.
    pub fn with_registry(mut self, registry: CharacterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// RON file of characters merged over the registry at build time.
    pub fn characters_file(mut self, path: &Path) -> Self {
        self.characters_path = Some(path.to_path_buf());
        self
    }

    pub fn build(self) -> Result<Simulation, DriverError> {
        let mut registry = self.registry.unwrap_or_else(CharacterRegistry::builtin);
        if let Some(ref path) = self.characters_path {
            registry.load_from_ron(path)?;
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Simulation { registry, rng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> Simulation {
        Simulation::builder().seed(1400).build().unwrap()
    }

    #[test]
    fn single_character_follows_length_order() {
        let report = simulation().run(&[10, 50], 100, "Reg").unwrap();
        let order: Vec<(&str, u32)> = report
            .blocks
            .iter()
            .map(|b| (b.character.as_str(), b.length))
            .collect();
        assert_eq!(order, vec![("Reg", 10), ("Reg", 50)]);
        assert!(report.blocks.iter().all(|b| b.outcome.is_ok()));
    }

    #[test]
    fn all_runs_characters_then_lengths() {
        let report = simulation().run(&[100, 20], 30, "all").unwrap();
        let order: Vec<(&str, u32)> = report
            .blocks
            .iter()
            .map(|b| (b.character.as_str(), b.length))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Pa", 100),
                ("Pa", 20),
                ("Mi-Ma", 100),
                ("Mi-Ma", 20),
                ("Reg", 100),
                ("Reg", 20),
            ]
        );
    }

    #[test]
    fn unknown_selector_runs_nothing() {
        let err = simulation().run(&[10], 10, "Xyz").unwrap_err();
        assert!(matches!(
            err,
            DriverError::Registry(RegistryError::UnknownCharacter { .. })
        ));
    }

    #[test]
    fn single_trial_blocks_fail_individually() {
        let report = simulation().run(&[10, 20], 1, "Pa").unwrap();
        assert_eq!(report.blocks.len(), 2);
        assert_eq!(report.failures().count(), 2);
        for block in &report.blocks {
            assert!(matches!(
                block.outcome,
                Err(BlockError::Stats(StatsError::InsufficientSamples { found: 1 }))
            ));
        }
    }

    #[test]
    fn zero_arguments_rejected() {
        assert!(matches!(
            simulation().run(&[10, 0], 10, "Pa"),
            Err(DriverError::InvalidArgument(_))
        ));
        assert!(matches!(
            simulation().run(&[10], 0, "Pa"),
            Err(DriverError::InvalidArgument(_))
        ));
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = simulation().run(&[25], 40, "Mi-Ma").unwrap().to_string();
        let b = simulation().run(&[25], 40, "Mi-Ma").unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn block_text_layout() {
        let report = simulation().run(&[10], 100, "Pa").unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Pa random walk of 10 steps");
        assert!(lines[1].starts_with("Mean = "));
        assert!(lines[1].contains(" CV = "));
        assert!(lines[2].starts_with("Max = "));
        assert!(lines[2].contains(" Min = "));
    }

    #[test]
    fn plot_uses_registry() {
        let mut sim = simulation();
        let batches = sim.plot(&PlotConfig::default()).unwrap();
        assert_eq!(batches.len(), sim.registry().len());
    }
}
