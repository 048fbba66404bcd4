//! Subcommand handlers: file loading, evaluation, report output.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use tracing::info;

use alignbench_core::{
    Adm, AdmDecision, AlignedAdm, Dataset, EvalConfig, EvaluationReport, KdmaProfile, RandomAdm,
    run_adm_recorded,
};

/// Built-in baseline ADMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Baseline {
    /// Uniform random valid choice
    Random,
    /// Oracle-optimal choice under the configured alignment metric
    Aligned,
}

/// Score recorded ADM outputs against a target profile.
pub fn evaluate(
    dataset_path: &Path,
    outputs_path: &Path,
    target_path: &Path,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let dataset = load_dataset(dataset_path)?;
    let target = load_target(target_path)?;
    let config = load_config(config_path)?;

    let content = std::fs::read_to_string(outputs_path)
        .with_context(|| format!("reading outputs from {}", outputs_path.display()))?;
    let outputs: Vec<AdmDecision> = serde_json::from_str(&content)
        .with_context(|| format!("parsing outputs from {}", outputs_path.display()))?;
    info!(outputs = outputs.len(), "loaded recorded decisions");

    let report = alignbench_core::evaluate(&dataset, &outputs, &target, &config)?;
    emit_report(&report, output_path)
}

/// Run a baseline ADM over the dataset, then score it.
pub fn baseline(
    dataset_path: &Path,
    target_path: &Path,
    baseline: Baseline,
    seed: Option<u64>,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let dataset = load_dataset(dataset_path)?;
    let target = load_target(target_path)?;
    let config = load_config(config_path)?;

    let adm: Box<dyn Adm> = match baseline {
        Baseline::Random => Box::new(match seed {
            Some(seed) => RandomAdm::seeded(seed),
            None => RandomAdm::new(),
        }),
        Baseline::Aligned => Box::new(AlignedAdm::new(config.clone())),
    };

    let record = run_adm_recorded(&dataset, adm.as_ref(), &target)?;
    info!(
        run_id = %record.run_id,
        adm = %record.adm_name,
        decisions = record.decisions.len(),
        "baseline run complete"
    );

    let report = alignbench_core::evaluate(&dataset, &record.decisions, &target, &config)?;
    emit_report(&report, output_path)
}

fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let dataset = if path.extension().is_some_and(|ext| ext == "jsonl") {
        Dataset::from_jsonl_path(path)
    } else {
        Dataset::from_json_path(path)
    }
    .with_context(|| format!("loading dataset from {}", path.display()))?;
    dataset
        .validate()
        .with_context(|| format!("validating dataset from {}", path.display()))?;
    Ok(dataset)
}

fn load_target(path: &Path) -> anyhow::Result<KdmaProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading target profile from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing target profile from {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EvalConfig> {
    let Some(path) = path else {
        return Ok(EvalConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config from {}", path.display()))
}

fn emit_report(report: &EvaluationReport, output_path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output_path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture_files(
        dir: &tempfile::TempDir,
    ) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
        let dataset_path = dir.path().join("dataset.json");
        let target_path = dir.path().join("target.json");
        let outputs_path = dir.path().join("outputs.json");

        let dataset = serde_json::json!([
            {
                "input": {
                    "scenario_id": "s1",
                    "probe_id": "p1",
                    "prompt": "Who first?",
                    "choices": ["a", "b"]
                },
                "label": [{"risk": 0.0}, {"risk": 10.0}]
            }
        ]);
        std::fs::write(&dataset_path, dataset.to_string()).unwrap();
        std::fs::write(&target_path, r#"{"risk": 10.0}"#).unwrap();
        std::fs::write(&outputs_path, r#"[{"choice": 1}]"#).unwrap();
        (dataset_path, target_path, outputs_path)
    }

    #[test]
    fn evaluate_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let (dataset_path, target_path, outputs_path) = write_fixture_files(&dir);
        let report_path = dir.path().join("report.json");

        evaluate(
            &dataset_path,
            &outputs_path,
            &target_path,
            None,
            Some(&report_path),
        )
        .unwrap();

        let report: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report.choice_metrics.oracle_accuracy, 1.0);
    }

    #[test]
    fn baseline_aligned_produces_perfect_accuracy() {
        let dir = tempfile::tempdir().unwrap();
        let (dataset_path, target_path, _) = write_fixture_files(&dir);
        let report_path = dir.path().join("report.json");

        baseline(
            &dataset_path,
            &target_path,
            Baseline::Aligned,
            None,
            None,
            Some(&report_path),
        )
        .unwrap();

        let report: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report.choice_metrics.oracle_accuracy, 1.0);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("eval.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "alignment_metric = \"adept\"").unwrap();
        writeln!(file, "soartech_exponent = 0.5").unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config.soartech_exponent, 0.5);
        assert_eq!(config.alignment_metric, alignbench_core::AlignmentMetric::Adept);
        assert!(config.maximize);
    }
}
