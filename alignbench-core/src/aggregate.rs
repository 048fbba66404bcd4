//! Aggregation of chosen-label KDMA values into the system's realized profile.

use std::collections::BTreeMap;

use crate::adm::AdmDecision;
use crate::dataset::Dataset;
use crate::error::AlignError;
use crate::kdma::KdmaProfile;

/// Denominator guard for the aggregate mean. Kept at the reference value so
/// results stay bit-compatible with recorded regression outputs.
pub const MEAN_EPSILON: f64 = 1e-9;

/// Average the KDMA values of each chosen label across all outputs.
///
/// Outputs whose `choice` is `None` (the "no choice made" sentinel) are
/// skipped. Every KDMA value found in a chosen label is accumulated under its
/// name; the result maps each observed name to `sum / (count + 1e-9)`. Names
/// never observed are absent from the result rather than present as 0.
///
/// Fails if the outputs are not index-aligned with the dataset or a choice
/// does not index into its entry's label.
pub fn avg_system_kdmas(
    dataset: &Dataset,
    outputs: &[AdmDecision],
) -> Result<KdmaProfile, AlignError> {
    if dataset.len() != outputs.len() {
        return Err(AlignError::invalid_input(format!(
            "dataset has {} entries but {} outputs were supplied",
            dataset.len(),
            outputs.len()
        )));
    }

    let mut accumulated: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (entry, output) in dataset.iter().zip(outputs) {
        let Some(choice) = output.choice else {
            continue;
        };
        let label = entry.label.get(choice).ok_or_else(|| {
            AlignError::invalid_input(format!(
                "choice {choice} out of bounds for probe {} ({} labeled options)",
                entry.input.probe_id,
                entry.label.len()
            ))
        })?;
        for (name, value) in label.iter() {
            accumulated.entry(name.to_string()).or_default().push(value);
        }
    }

    Ok(accumulated
        .into_iter()
        .map(|(name, values)| {
            let mean = values.iter().sum::<f64>() / (values.len() as f64 + MEAN_EPSILON);
            (name, mean)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetEntry;
    use crate::scenario::ProbeInput;

    fn entry(labels: &[&[(&str, f64)]]) -> DatasetEntry {
        DatasetEntry {
            input: ProbeInput::new(
                "s1",
                "p",
                "prompt",
                (0..labels.len()).map(|i| format!("option {i}")).collect(),
            ),
            label: labels
                .iter()
                .map(|pairs| KdmaProfile::from_pairs(pairs.iter().map(|&(n, v)| (n, v))))
                .collect(),
        }
    }

    fn chose(choice: Option<usize>) -> AdmDecision {
        AdmDecision {
            choice,
            predicted_kdma_values: None,
            justification: None,
        }
    }

    #[test]
    fn averages_chosen_label_values() {
        let dataset = Dataset::new(vec![
            entry(&[&[("k", 2.0)], &[("k", 8.0)]]),
            entry(&[&[("k", 4.0)], &[("k", 6.0)]]),
        ]);
        let outputs = vec![chose(Some(1)), chose(Some(0))];
        let profile = avg_system_kdmas(&dataset, &outputs).unwrap();
        // (8 + 4) / 2 up to the epsilon guard.
        assert!((profile.get("k").unwrap() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn skips_no_choice_outputs() {
        let dataset = Dataset::new(vec![
            entry(&[&[("k", 2.0)]]),
            entry(&[&[("k", 10.0)]]),
        ]);
        let outputs = vec![chose(None), chose(Some(0))];
        let profile = avg_system_kdmas(&dataset, &outputs).unwrap();
        assert!((profile.get("k").unwrap() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn unobserved_names_are_absent() {
        let dataset = Dataset::new(vec![entry(&[&[("k", 2.0)], &[("other", 9.0)]])]);
        let outputs = vec![chose(Some(0))];
        let profile = avg_system_kdmas(&dataset, &outputs).unwrap();
        assert!(profile.get("other").is_none());
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn all_skipped_yields_empty_profile() {
        let dataset = Dataset::new(vec![entry(&[&[("k", 2.0)]])]);
        let outputs = vec![chose(None)];
        let profile = avg_system_kdmas(&dataset, &outputs).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn rejects_length_mismatch() {
        let dataset = Dataset::new(vec![entry(&[&[("k", 2.0)]])]);
        let err = avg_system_kdmas(&dataset, &[]).unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput(_)));
    }

    #[test]
    fn rejects_out_of_bounds_choice() {
        let dataset = Dataset::new(vec![entry(&[&[("k", 2.0)]])]);
        let err = avg_system_kdmas(&dataset, &[chose(Some(3))]).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }
}
