/// Direction profiles — the weighted move set a walker draws from each step.
///
/// A profile is an ordered list of directions where repetition encodes weight:
/// `[North, East, South, South, West]` picks South twice as often as any other
/// move. [`DirectionDistribution`] is the same information folded into
/// `direction → weight` form for sampling through `WeightedIndex`.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::direction::Direction;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Ordered direction entries; duplicates bias selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct DirectionProfile {
    entries: Vec<Direction>,
}

impl DirectionProfile {
    pub fn new(entries: Vec<Direction>) -> Result<Self, ProfileError> {
        if entries.is_empty() {
            return Err(ProfileError::InvalidConfiguration(
                "direction profile has no entries".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Direction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick one entry uniformly over the list (not over distinct directions).
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        self.entries[rng.gen_range(0..self.entries.len())]
    }

    /// Selection probability of `direction` under this profile.
    pub fn probability(&self, direction: Direction) -> f64 {
        let count = self.entries.iter().filter(|d| **d == direction).count();
        count as f64 / self.entries.len() as f64
    }

    /// Fold the entry list into per-direction weights, in order of first
    /// appearance.
    pub fn weights(&self) -> Vec<(Direction, u32)> {
        let mut weights: Vec<(Direction, u32)> = Vec::new();
        for dir in &self.entries {
            match weights.iter_mut().find(|(d, _)| d == dir) {
                Some((_, w)) => *w += 1,
                None => weights.push((*dir, 1)),
            }
        }
        weights
    }

    /// Compact `label×weight` listing, e.g. `north×1 south×2`.
    pub fn describe(&self) -> String {
        self.weights()
            .iter()
            .map(|(d, w)| format!("{}×{}", d.label(), w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn distribution(&self) -> Result<DirectionDistribution, ProfileError> {
        DirectionDistribution::from_weights(&self.weights())
    }
}

impl TryFrom<Vec<Direction>> for DirectionProfile {
    type Error = ProfileError;

    fn try_from(entries: Vec<Direction>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<DirectionProfile> for Vec<Direction> {
    fn from(profile: DirectionProfile) -> Self {
        profile.entries
    }
}

/// Discrete `direction → weight` distribution.
#[derive(Debug, Clone)]
pub struct DirectionDistribution {
    directions: Vec<Direction>,
    index: WeightedIndex<u32>,
}

impl DirectionDistribution {
    pub fn from_weights(weights: &[(Direction, u32)]) -> Result<Self, ProfileError> {
        let directions: Vec<Direction> = weights.iter().map(|(d, _)| *d).collect();
        let index = WeightedIndex::new(weights.iter().map(|(_, w)| *w))
            .map_err(|e| ProfileError::InvalidConfiguration(format!("bad weights: {}", e)))?;
        Ok(Self { directions, index })
    }
}

impl Distribution<Direction> for DirectionDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        self.directions[self.index.sample(rng)]
    }
}
