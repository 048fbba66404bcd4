//! Labeled evaluation datasets and JSON/JSONL loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::kdma::KdmaProfile;
use crate::scenario::ProbeInput;

/// One labeled probe: the input shown to the ADM plus a ground-truth KDMA
/// profile per answer option, index-aligned with `input.choices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub input: ProbeInput,
    pub label: Vec<KdmaProfile>,
}

/// An ordered, finite, re-iterable collection of labeled probes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatasetEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    /// Load a dataset serialized as a single JSON array of entries.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let dataset: Self = serde_json::from_str(&content).map_err(|e| {
            AlignError::dataset(format!("failed to parse {}: {e}", path.display()))
        })?;
        tracing::debug!(
            entries = dataset.len(),
            path = %path.display(),
            "loaded JSON dataset"
        );
        Ok(dataset)
    }

    /// Load a dataset serialized as JSON Lines, one entry per line. Blank
    /// lines are skipped.
    pub fn from_jsonl_path(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: DatasetEntry = serde_json::from_str(line).map_err(|e| {
                AlignError::dataset(format!(
                    "failed to parse {} line {}: {e}",
                    path.display(),
                    line_no + 1
                ))
            })?;
            entries.push(entry);
        }
        tracing::debug!(
            entries = entries.len(),
            path = %path.display(),
            "loaded JSONL dataset"
        );
        Ok(Self { entries })
    }

    /// Check the structural invariant that every entry carries exactly one
    /// label profile per answer option.
    pub fn validate(&self) -> Result<(), AlignError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.label.len() != entry.input.choice_count() {
                return Err(AlignError::dataset(format!(
                    "entry {index} (probe {}) has {} choices but {} label profiles",
                    entry.input.probe_id,
                    entry.input.choice_count(),
                    entry.label.len()
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DatasetEntry;
    type IntoIter = std::slice::Iter<'a, DatasetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
