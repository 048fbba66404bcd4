//! Oracle-accuracy upper bound: how often the system picked the choice a
//! perfectly-aligned decision-maker would have picked.

use crate::config::EvalConfig;
use crate::kdma::KdmaProfile;

/// Index of the choice a perfectly-aligned decision-maker would pick: the one
/// optimizing `config.alignment_metric` against the target (`max` when
/// `config.maximize`, else `min`). Ties break toward the lower index.
///
/// Panics if the scenario offers no choices.
pub fn oracle_choice(target: &KdmaProfile, labels: &[KdmaProfile], config: &EvalConfig) -> usize {
    assert!(!labels.is_empty(), "scenario offers no choices");
    let mut best_index = 0;
    let mut best_score =
        config
            .alignment_metric
            .score(target, &labels[0], config.soartech_exponent);
    for (index, label) in labels.iter().enumerate().skip(1) {
        let score = config
            .alignment_metric
            .score(target, label, config.soartech_exponent);
        let better = if config.maximize {
            score > best_score
        } else {
            score < best_score
        };
        if better {
            best_index = index;
            best_score = score;
        }
    }
    best_index
}

/// Fraction of scenarios where the system's actual choice matches the
/// oracle's choice. A `None` actual choice never matches.
///
/// Panics on zero scenarios; the contract requires at least one.
pub fn oracle_accuracy<L: AsRef<[KdmaProfile]>>(
    target: &KdmaProfile,
    label_sets: &[L],
    choices: &[Option<usize>],
    config: &EvalConfig,
) -> f64 {
    assert!(
        !label_sets.is_empty(),
        "oracle accuracy requires at least one scenario"
    );
    let matches = label_sets
        .iter()
        .zip(choices)
        .filter(|(labels, actual)| **actual == Some(oracle_choice(target, labels.as_ref(), config)))
        .count();
    matches as f64 / label_sets.len() as f64
}
