//! # alignbench-core: KDMA alignment scoring for automated decision-makers
//!
//! This crate measures how closely an automated decision-maker (ADM) tracks a
//! human value profile across simulated triage scenarios. A value profile is
//! a set of Key Decision-Making Attributes (KDMAs): named numeric scales,
//! commonly 0-10, such as risk aversion or urgency.
//!
//! The evaluation pipeline has four stages:
//! 1. Run the ADM over a labeled dataset ([`adm::run_adm`]), one decision per
//!    probe, in order.
//! 2. Aggregate the KDMA values of the chosen options into the system's
//!    realized profile ([`aggregate::avg_system_kdmas`]).
//! 3. Score target vs. realized profile with a family of similarity and
//!    divergence metrics ([`metrics`]).
//! 4. Compare the system's choices against a perfectly-aligned oracle
//!    ([`oracle::oracle_accuracy`]).
//!
//! [`evaluate::evaluate`] composes stages 2-4 into one serializable report.
//! The scoring core is synchronous and performs no I/O; no state survives
//! across calls.

pub mod adm;
pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod kdma;
pub mod metrics;
pub mod oracle;
pub mod scenario;

pub use adm::{Adm, AdmDecision, AlignedAdm, RandomAdm, RunRecord, run_adm, run_adm_recorded};
pub use aggregate::avg_system_kdmas;
pub use config::{AlignmentMetric, EvalConfig};
pub use dataset::{Dataset, DatasetEntry};
pub use error::AlignError;
pub use evaluate::{ChoiceMetrics, EvaluationReport, PredictedKdmaMetrics, evaluate, run_and_evaluate};
pub use kdma::KdmaProfile;
pub use oracle::{oracle_accuracy, oracle_choice};
pub use scenario::ProbeInput;
