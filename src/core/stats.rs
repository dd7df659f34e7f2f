/// Distance samples and their summary statistics.
///
/// Everything reported is rounded to one decimal place. The coefficient of
/// variation is computed from the unrounded mean and standard deviation and
/// rounded last; a mean that rounds to zero makes it undefined.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("insufficient samples: sample standard deviation needs at least 2, got {found}")]
    InsufficientSamples { found: usize },
    #[error("coefficient of variation is undefined for a mean of {mean}")]
    UndefinedCoefficientOfVariation { mean: f64 },
}

/// Distances from the origin, one per trial, in generation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceSample(Vec<f64>);

impl DistanceSample {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Sample standard deviation (denominator `n - 1`).
    pub fn std_dev(&self) -> Option<f64> {
        let n = self.0.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let ss: f64 = self.0.iter().map(|x| (x - mean) * (x - mean)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    }

    pub fn max(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }

    pub fn min(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::min)
    }
}

impl From<Vec<f64>> for DistanceSample {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Rounded descriptive statistics of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub cv: f64,
    pub max: f64,
    pub min: f64,
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean = {:.1} CV = {:.1}", self.mean, self.cv)?;
        write!(f, "Max = {:.1} Min = {:.1}", self.max, self.min)
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summarize(sample: &DistanceSample) -> Result<SummaryStats, StatsError> {
    let insufficient = StatsError::InsufficientSamples {
        found: sample.len(),
    };
    let (Some(mean), Some(std_dev)) = (sample.mean(), sample.std_dev()) else {
        return Err(insufficient);
    };
    let (Some(max), Some(min)) = (sample.max(), sample.min()) else {
        return Err(insufficient);
    };

    let rounded_mean = round_to_tenth(mean);
    if rounded_mean == 0.0 {
        return Err(StatsError::UndefinedCoefficientOfVariation { mean });
    }

    Ok(SummaryStats {
        mean: rounded_mean,
        cv: round_to_tenth(std_dev / mean),
        max: round_to_tenth(max),
        min: round_to_tenth(min),
    })
}
