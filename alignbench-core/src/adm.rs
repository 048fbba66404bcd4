//! The ADM seam: the decision-maker trait, its output records, the
//! output-generation loop, and baseline implementations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EvalConfig;
use crate::dataset::Dataset;
use crate::error::AlignError;
use crate::kdma::KdmaProfile;
use crate::oracle::oracle_choice;
use crate::scenario::ProbeInput;

/// Output record of one ADM invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmDecision {
    /// Index into the probe's choice list; `None` means no choice was made.
    pub choice: Option<usize>,
    /// The ADM's own per-choice KDMA estimates, for self-evaluation against
    /// the ground-truth labels. Index-aligned with the choice list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_kdma_values: Option<Vec<KdmaProfile>>,
    /// Free-form rationale; ignored by the scoring core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl AdmDecision {
    pub fn chose(choice: usize) -> Self {
        Self {
            choice: Some(choice),
            predicted_kdma_values: None,
            justification: None,
        }
    }

    pub fn abstained() -> Self {
        Self {
            choice: None,
            predicted_kdma_values: None,
            justification: None,
        }
    }
}

/// An automated decision-maker under evaluation. Treated as opaque: the
/// harness passes the probe, the alignment target, and the ground-truth
/// labels (for closed-loop setups) and takes whatever decision comes back.
pub trait Adm {
    /// Short identifier used in run records and logs.
    fn name(&self) -> &str;

    /// Decide on one probe. Errors propagate unmodified; the harness never
    /// retries.
    fn decide(
        &self,
        input: &ProbeInput,
        target_kdma_values: &KdmaProfile,
        labels: &[KdmaProfile],
    ) -> Result<AdmDecision, AlignError>;
}

/// Run an ADM over every dataset entry, in dataset order, collecting one
/// decision per entry. A straight pass-through loop with no retries and no
/// error recovery; labels are handed to the ADM untouched.
pub fn run_adm(
    dataset: &Dataset,
    adm: &dyn Adm,
    target_kdma_values: &KdmaProfile,
) -> Result<Vec<AdmDecision>, AlignError> {
    let mut outputs = Vec::with_capacity(dataset.len());
    for entry in dataset {
        let decision = adm.decide(&entry.input, target_kdma_values, &entry.label)?;
        outputs.push(decision);
    }
    tracing::debug!(adm = adm.name(), decisions = outputs.len(), "collected ADM decisions");
    Ok(outputs)
}

/// A completed generation run: the decisions plus identifying metadata for
/// reporting. The scoring core consumes only `decisions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub adm_name: String,
    pub target_kdma_values: KdmaProfile,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub decisions: Vec<AdmDecision>,
}

/// `run_adm` wrapped with run metadata.
pub fn run_adm_recorded(
    dataset: &Dataset,
    adm: &dyn Adm,
    target_kdma_values: &KdmaProfile,
) -> Result<RunRecord, AlignError> {
    let started_at = Utc::now();
    let decisions = run_adm(dataset, adm, target_kdma_values)?;
    Ok(RunRecord {
        run_id: Uuid::new_v4(),
        adm_name: adm.name().to_string(),
        target_kdma_values: target_kdma_values.clone(),
        started_at,
        finished_at: Utc::now(),
        decisions,
    })
}

/// Baseline that picks a uniformly random valid choice. Seedable for
/// reproducible runs; probes with no options yield an abstention.
pub struct RandomAdm {
    rng: Mutex<StdRng>,
}

impl RandomAdm {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomAdm {
    fn default() -> Self {
        Self::new()
    }
}

impl Adm for RandomAdm {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(
        &self,
        _input: &ProbeInput,
        _target_kdma_values: &KdmaProfile,
        labels: &[KdmaProfile],
    ) -> Result<AdmDecision, AlignError> {
        if labels.is_empty() {
            return Ok(AdmDecision::abstained());
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(AdmDecision::chose(rng.gen_range(0..labels.len())))
    }
}

/// Baseline that always picks the oracle-optimal choice for the configured
/// alignment metric. Useful as an upper-bound sanity check: its oracle
/// accuracy is 1.0 by construction.
pub struct AlignedAdm {
    config: EvalConfig,
}

impl AlignedAdm {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }
}

impl Adm for AlignedAdm {
    fn name(&self) -> &str {
        "aligned"
    }

    fn decide(
        &self,
        _input: &ProbeInput,
        target_kdma_values: &KdmaProfile,
        labels: &[KdmaProfile],
    ) -> Result<AdmDecision, AlignError> {
        if labels.is_empty() {
            return Ok(AdmDecision::abstained());
        }
        Ok(AdmDecision::chose(oracle_choice(
            target_kdma_values,
            labels,
            &self.config,
        )))
    }
}
