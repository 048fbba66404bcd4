//! Configuration types for alignment evaluation.
//!
//! The source design kept metric tunables as hidden module-level defaults;
//! here they are explicit caller configuration with identical default values.

use serde::{Deserialize, Serialize};

use crate::kdma::KdmaProfile;
use crate::metrics;

/// Scalar alignment metric selectable for oracle-choice computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMetric {
    MeanAbsoluteError,
    MeanSquaredError,
    Soartech,
    Adept,
    #[default]
    Kitware,
}

impl AlignmentMetric {
    /// Score `candidate` against `target` under this metric. The Soartech
    /// shape exponent is ignored by the other metrics.
    pub fn score(
        self,
        target: &KdmaProfile,
        candidate: &KdmaProfile,
        soartech_exponent: f64,
    ) -> f64 {
        match self {
            Self::MeanAbsoluteError => metrics::mean_absolute_error(target, candidate),
            Self::MeanSquaredError => metrics::mean_squared_error(target, candidate),
            Self::Soartech => {
                metrics::soartech_similarity_score(target, candidate, soartech_exponent)
            }
            Self::Adept => metrics::adept_similarity_score(target, candidate),
            Self::Kitware => metrics::kitware_similarity_score(target, candidate),
        }
    }
}

/// Evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Shape exponent for the Soartech similarity curve.
    #[serde(default = "default_soartech_exponent")]
    pub soartech_exponent: f64,
    /// Metric the oracle uses to rank choices against the target.
    #[serde(default)]
    pub alignment_metric: AlignmentMetric,
    /// Whether the oracle maximizes the alignment metric (minimizes if false).
    #[serde(default = "default_true")]
    pub maximize: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            soartech_exponent: default_soartech_exponent(),
            alignment_metric: AlignmentMetric::default(),
            maximize: true,
        }
    }
}

fn default_soartech_exponent() -> f64 {
    metrics::DEFAULT_SOARTECH_EXPONENT
}

fn default_true() -> bool {
    true
}
