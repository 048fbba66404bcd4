//! Similarity and divergence metrics between KDMA profiles.
//!
//! Every function here is pure and deterministic. Unless documented
//! otherwise, a metric operates on the intersection of KDMA names present in
//! both profiles; an empty intersection yields 0.0 (scalar forms) or an empty
//! map (per-KDMA forms) rather than an error, so aggregate reporting over
//! sparse scenarios never fails.
//!
//! The Adept metric is the deliberate exception: it iterates the target's own
//! keys and substitutes a default value for KDMAs the candidate is missing.
//! That asymmetry is load-bearing for downstream consumers and must not be
//! harmonized with the other metrics.

use std::collections::BTreeMap;

use crate::kdma::KdmaProfile;

/// Shape exponent for the Soartech similarity curve.
pub const DEFAULT_SOARTECH_EXPONENT: f64 = 0.75;

/// Value substituted for a KDMA the candidate profile is missing (Adept only).
pub const ADEPT_DEFAULT_KDMA_VALUE: f64 = 5.0;

/// Mean absolute error over the common KDMAs, on the raw 0-10 scale.
///
/// Returns 0.0 when the profiles share no KDMA names.
pub fn mean_absolute_error(target: &KdmaProfile, candidate: &KdmaProfile) -> f64 {
    let pairs = target.common_pairs(candidate);
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs.iter().map(|(_, t, s)| (t - s).abs()).sum();
    total / pairs.len() as f64
}

/// Mean squared error over the common KDMAs, on the raw 0-10 scale.
///
/// Returns 0.0 when the profiles share no KDMA names.
pub fn mean_squared_error(target: &KdmaProfile, candidate: &KdmaProfile) -> f64 {
    let pairs = target.common_pairs(candidate);
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs.iter().map(|(_, t, s)| (t - s).powi(2)).sum();
    total / pairs.len() as f64
}

/// Soartech similarity over the common KDMAs:
/// `1 - sum(|t' - s'|^p) / N` with t, s normalized to [0,1] by dividing by 10.
///
/// Values must be on the 0-10 scale; a normalized value outside [0,1] is a
/// contract violation and fails a hard assertion. Returns 0.0 when the
/// profiles share no KDMA names.
pub fn soartech_similarity_score(target: &KdmaProfile, candidate: &KdmaProfile, p: f64) -> f64 {
    let pairs = target.common_pairs(candidate);
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs
        .iter()
        .map(|&(name, t, s)| soartech_distance(name, t, s, p))
        .sum();
    1.0 - total / pairs.len() as f64
}

/// Per-KDMA Soartech similarity: `1 - |t' - s'|^p` for each common KDMA,
/// unaggregated. Empty intersection yields an empty map.
pub fn soartech_similarity_by_kdma(
    target: &KdmaProfile,
    candidate: &KdmaProfile,
    p: f64,
) -> BTreeMap<String, f64> {
    target
        .common_pairs(candidate)
        .into_iter()
        .map(|(name, t, s)| (name.to_string(), 1.0 - soartech_distance(name, t, s, p)))
        .collect()
}

fn soartech_distance(name: &str, t: f64, s: f64, p: f64) -> f64 {
    let t_norm = t / 10.0;
    let s_norm = s / 10.0;
    assert!(
        (0.0..=1.0).contains(&t_norm),
        "Soartech target KDMA out of range: {name}={t}"
    );
    assert!(
        (0.0..=1.0).contains(&s_norm),
        "Soartech candidate KDMA out of range: {name}={s}"
    );
    (t_norm - s_norm).abs().powf(p)
}

/// Adept similarity: `1 / (sum((t - s)^2) + 1)` over the target's own KDMAs.
///
/// Iterates the target's key set rather than the intersection; a KDMA missing
/// from the candidate contributes with the default value 5. An empty target
/// profile yields 0.0 directly.
pub fn adept_similarity_score(target: &KdmaProfile, candidate: &KdmaProfile) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let total: f64 = target
        .iter()
        .map(|(name, t)| {
            let s = candidate.get(name).unwrap_or(ADEPT_DEFAULT_KDMA_VALUE);
            (t - s).powi(2)
        })
        .sum();
    1.0 / (total + 1.0)
}

/// Per-KDMA Adept similarity: `1 / ((t - s)^2 + 1)` for each of the target's
/// own KDMAs, with the same default-to-5 rule as the scalar form.
pub fn adept_similarity_by_kdma(
    target: &KdmaProfile,
    candidate: &KdmaProfile,
) -> BTreeMap<String, f64> {
    target
        .iter()
        .map(|(name, t)| {
            let s = candidate.get(name).unwrap_or(ADEPT_DEFAULT_KDMA_VALUE);
            (name.to_string(), 1.0 / ((t - s).powi(2) + 1.0))
        })
        .collect()
}

/// Kitware similarity over the common KDMAs: mean of
/// `10^(1 - (t - s)^2 / 25) / 10` per KDMA.
///
/// Values must be on the 0-10 scale; out-of-range input fails a hard
/// assertion. Returns 0.0 when the profiles share no KDMA names.
pub fn kitware_similarity_score(target: &KdmaProfile, candidate: &KdmaProfile) -> f64 {
    let pairs = target.common_pairs(candidate);
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs
        .iter()
        .map(|&(name, t, s)| kitware_term(name, t, s))
        .sum();
    total / pairs.len() as f64
}

/// Per-KDMA Kitware similarity, unaggregated. Empty intersection yields an
/// empty map.
pub fn kitware_similarity_by_kdma(
    target: &KdmaProfile,
    candidate: &KdmaProfile,
) -> BTreeMap<String, f64> {
    target
        .common_pairs(candidate)
        .into_iter()
        .map(|(name, t, s)| (name.to_string(), kitware_term(name, t, s)))
        .collect()
}

fn kitware_term(name: &str, t: f64, s: f64) -> f64 {
    assert!(
        (0.0..=10.0).contains(&t),
        "Kitware target KDMA out of range: {name}={t}"
    );
    assert!(
        (0.0..=10.0).contains(&s),
        "Kitware candidate KDMA out of range: {name}={s}"
    );
    10f64.powf(1.0 - (t - s).powi(2) / 25.0) / 10.0
}
