//! Top-level evaluation: compose aggregation, metrics, and oracle accuracy
//! into one report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adm::{Adm, AdmDecision, run_adm};
use crate::aggregate::avg_system_kdmas;
use crate::config::EvalConfig;
use crate::dataset::Dataset;
use crate::error::AlignError;
use crate::kdma::KdmaProfile;
use crate::metrics;
use crate::oracle::oracle_accuracy;

/// Alignment metrics of the choices the system actually made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMetrics {
    pub target_kdma_values: KdmaProfile,
    pub system_kdma_values: KdmaProfile,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub soartech_similarity_score: f64,
    pub adept_similarity_score: f64,
    pub kitware_similarity_score: f64,
    pub soartech_similarity_by_kdma: BTreeMap<String, f64>,
    pub adept_similarity_by_kdma: BTreeMap<String, f64>,
    pub kitware_similarity_by_kdma: BTreeMap<String, f64>,
    pub oracle_accuracy: f64,
}

/// Self-evaluation metrics: the system's own per-choice KDMA estimates scored
/// against the ground-truth labels, averaged over every (scenario, choice)
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedKdmaMetrics {
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub soartech_similarity_score: f64,
    pub adept_similarity_score: f64,
    pub kitware_similarity_score: f64,
}

/// Full evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub choice_metrics: ChoiceMetrics,
    /// Present only when at least one output carried per-choice predictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_kdmas_metrics: Option<PredictedKdmaMetrics>,
}

/// Score a set of generated outputs against the alignment target.
///
/// Composes the system-profile aggregation, every profile metric between
/// target and realized profile, and the oracle-accuracy upper bound. When any
/// output carries `predicted_kdma_values`, the five scalar metrics are
/// additionally averaged over all (scenario, choice) label-vs-prediction
/// pairs. Pure: no I/O, no side effects beyond the returned report.
///
/// Fails on structural invariant violations (output/dataset length mismatch,
/// out-of-bounds choice). Panics if the dataset is empty, since oracle
/// accuracy requires at least one scenario.
pub fn evaluate(
    dataset: &Dataset,
    outputs: &[AdmDecision],
    target_kdma_values: &KdmaProfile,
    config: &EvalConfig,
) -> Result<EvaluationReport, AlignError> {
    let system_kdma_values = avg_system_kdmas(dataset, outputs)?;

    let label_sets: Vec<&[KdmaProfile]> =
        dataset.iter().map(|entry| entry.label.as_slice()).collect();
    let choices: Vec<Option<usize>> = outputs.iter().map(|output| output.choice).collect();

    let choice_metrics = ChoiceMetrics {
        mean_absolute_error: metrics::mean_absolute_error(target_kdma_values, &system_kdma_values),
        mean_squared_error: metrics::mean_squared_error(target_kdma_values, &system_kdma_values),
        soartech_similarity_score: metrics::soartech_similarity_score(
            target_kdma_values,
            &system_kdma_values,
            config.soartech_exponent,
        ),
        adept_similarity_score: metrics::adept_similarity_score(
            target_kdma_values,
            &system_kdma_values,
        ),
        kitware_similarity_score: metrics::kitware_similarity_score(
            target_kdma_values,
            &system_kdma_values,
        ),
        soartech_similarity_by_kdma: metrics::soartech_similarity_by_kdma(
            target_kdma_values,
            &system_kdma_values,
            config.soartech_exponent,
        ),
        adept_similarity_by_kdma: metrics::adept_similarity_by_kdma(
            target_kdma_values,
            &system_kdma_values,
        ),
        kitware_similarity_by_kdma: metrics::kitware_similarity_by_kdma(
            target_kdma_values,
            &system_kdma_values,
        ),
        oracle_accuracy: oracle_accuracy(target_kdma_values, &label_sets, &choices, config),
        target_kdma_values: target_kdma_values.clone(),
        system_kdma_values,
    };

    let predicted_kdmas_metrics = predicted_metrics(dataset, outputs, config);

    Ok(EvaluationReport {
        choice_metrics,
        predicted_kdmas_metrics,
    })
}

/// Generate outputs with `adm` and score them in one step.
pub fn run_and_evaluate(
    dataset: &Dataset,
    adm: &dyn Adm,
    target_kdma_values: &KdmaProfile,
    config: &EvalConfig,
) -> Result<EvaluationReport, AlignError> {
    let outputs = run_adm(dataset, adm, target_kdma_values)?;
    evaluate(dataset, &outputs, target_kdma_values, config)
}

fn predicted_metrics(
    dataset: &Dataset,
    outputs: &[AdmDecision],
    config: &EvalConfig,
) -> Option<PredictedKdmaMetrics> {
    if !outputs.iter().any(|o| o.predicted_kdma_values.is_some()) {
        return None;
    }

    let mut mae = Vec::new();
    let mut mse = Vec::new();
    let mut soartech = Vec::new();
    let mut adept = Vec::new();
    let mut kitware = Vec::new();
    for (entry, output) in dataset.iter().zip(outputs) {
        let Some(predicted) = &output.predicted_kdma_values else {
            continue;
        };
        for (label, prediction) in entry.label.iter().zip(predicted) {
            mae.push(metrics::mean_absolute_error(label, prediction));
            mse.push(metrics::mean_squared_error(label, prediction));
            soartech.push(metrics::soartech_similarity_score(
                label,
                prediction,
                config.soartech_exponent,
            ));
            adept.push(metrics::adept_similarity_score(label, prediction));
            kitware.push(metrics::kitware_similarity_score(label, prediction));
        }
    }

    Some(PredictedKdmaMetrics {
        mean_absolute_error: mean_of(&mae),
        mean_squared_error: mean_of(&mse),
        soartech_similarity_score: mean_of(&soartech),
        adept_similarity_score: mean_of(&adept),
        kitware_similarity_score: mean_of(&kitware),
    })
}

fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetEntry;
    use crate::scenario::ProbeInput;

    fn entry(probe_id: &str, values: &[f64]) -> DatasetEntry {
        DatasetEntry {
            input: ProbeInput::new(
                "s1",
                probe_id,
                "prompt",
                (0..values.len()).map(|i| format!("option {i}")).collect(),
            ),
            label: values
                .iter()
                .map(|&v| KdmaProfile::from_pairs([("k", v)]))
                .collect(),
        }
    }

    #[test]
    fn perfectly_aligned_output_scores_perfectly() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);
        let outputs = vec![AdmDecision::chose(1)];

        let report = evaluate(&dataset, &outputs, &target, &EvalConfig::default()).unwrap();
        let cm = &report.choice_metrics;
        // The epsilon-guarded mean puts the system profile a hair under 10.
        assert!(cm.mean_absolute_error < 1e-6);
        assert!((cm.kitware_similarity_score - 1.0).abs() < 1e-6);
        assert!((cm.soartech_similarity_score - 1.0).abs() < 1e-6);
        assert!((cm.adept_similarity_score - 1.0).abs() < 1e-6);
        assert_eq!(cm.oracle_accuracy, 1.0);
        assert!(report.predicted_kdmas_metrics.is_none());
    }

    #[test]
    fn misaligned_output_scores_zero_oracle_accuracy() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);
        let outputs = vec![AdmDecision::chose(0)];

        let report = evaluate(&dataset, &outputs, &target, &EvalConfig::default()).unwrap();
        let cm = &report.choice_metrics;
        assert_eq!(cm.oracle_accuracy, 0.0);
        assert!((cm.mean_absolute_error - 10.0).abs() < 1e-6);
    }

    #[test]
    fn per_kdma_maps_cover_common_names() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);
        let outputs = vec![AdmDecision::chose(1)];

        let report = evaluate(&dataset, &outputs, &target, &EvalConfig::default()).unwrap();
        let cm = &report.choice_metrics;
        assert!(cm.soartech_similarity_by_kdma.contains_key("k"));
        assert!(cm.adept_similarity_by_kdma.contains_key("k"));
        assert!(cm.kitware_similarity_by_kdma.contains_key("k"));
    }

    #[test]
    fn predicted_metrics_appear_only_when_predictions_exist() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);

        // Predictions identical to the labels: perfect self-evaluation.
        let mut output = AdmDecision::chose(1);
        output.predicted_kdma_values = Some(vec![
            KdmaProfile::from_pairs([("k", 0.0)]),
            KdmaProfile::from_pairs([("k", 10.0)]),
        ]);

        let report = evaluate(&dataset, &[output], &target, &EvalConfig::default()).unwrap();
        let pm = report.predicted_kdmas_metrics.expect("predictions supplied");
        assert_eq!(pm.mean_absolute_error, 0.0);
        assert_eq!(pm.mean_squared_error, 0.0);
        assert!((pm.kitware_similarity_score - 1.0).abs() < 1e-12);
        assert!((pm.soartech_similarity_score - 1.0).abs() < 1e-12);
        assert!((pm.adept_similarity_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn imperfect_predictions_average_across_choices() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);

        let mut output = AdmDecision::chose(1);
        output.predicted_kdma_values = Some(vec![
            KdmaProfile::from_pairs([("k", 2.0)]),
            KdmaProfile::from_pairs([("k", 10.0)]),
        ]);

        let report = evaluate(&dataset, &[output], &target, &EvalConfig::default()).unwrap();
        let pm = report.predicted_kdmas_metrics.unwrap();
        // Choice 0 misses by 2, choice 1 is exact: mean of (2, 0).
        assert!((pm.mean_absolute_error - 1.0).abs() < 1e-12);
        assert!((pm.mean_squared_error - 2.0).abs() < 1e-12);
    }

    #[test]
    fn report_serializes_with_conditional_group_omitted() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);
        let outputs = vec![AdmDecision::chose(1)];

        let report = evaluate(&dataset, &outputs, &target, &EvalConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("choice_metrics").is_some());
        assert!(json.get("predicted_kdmas_metrics").is_none());
    }

    #[test]
    fn length_mismatch_is_invalid_input() {
        let dataset = Dataset::new(vec![entry("p1", &[0.0, 10.0])]);
        let target = KdmaProfile::from_pairs([("k", 10.0)]);
        let err = evaluate(&dataset, &[], &target, &EvalConfig::default()).unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput(_)));
    }
}
