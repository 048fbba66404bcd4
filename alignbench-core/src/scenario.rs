//! Scenario and probe input records presented to decision-makers.

use serde::{Deserialize, Serialize};

/// One decision point shown to an ADM: the probe prompt plus the answer
/// options it may choose between. The scoring core never inspects the text;
/// it is carried for the ADM itself and for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeInput {
    pub scenario_id: String,
    pub probe_id: String,
    /// Situation description and question posed to the decision-maker.
    pub prompt: String,
    /// Answer options, index-aligned with the per-choice KDMA labels.
    pub choices: Vec<String>,
}

impl ProbeInput {
    pub fn new(
        scenario_id: impl Into<String>,
        probe_id: impl Into<String>,
        prompt: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            probe_id: probe_id.into(),
            prompt: prompt.into(),
            choices,
        }
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}
