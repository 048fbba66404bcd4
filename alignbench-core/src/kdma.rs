//! KDMA profiles: named numeric value scales attached to decisions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A profile of Key Decision-Making Attributes: KDMA name mapped to a numeric
/// value, commonly on the raw 0-10 scale. Some metrics normalize to 0-1 by
/// dividing by 10; normalization happens inside those metrics, never here.
///
/// Profiles are not required to share key sets. Metrics that compare two
/// profiles operate on the intersection of names present in both, except
/// where documented otherwise.
///
/// Backed by a `BTreeMap` so iteration order, float accumulation order, and
/// serialized output are deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KdmaProfile(BTreeMap<String, f64>);

impl KdmaProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from (name, value) pairs. Later duplicates win.
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, f64)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// (name, self value, other value) for every KDMA name present in both
    /// profiles, in name order.
    pub fn common_pairs<'a>(&'a self, other: &'a Self) -> Vec<(&'a str, f64, f64)> {
        self.iter()
            .filter_map(|(name, value)| other.get(name).map(|o| (name, value, o)))
            .collect()
    }
}

impl FromIterator<(String, f64)> for KdmaProfile {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for KdmaProfile {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
