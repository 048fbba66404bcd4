//! Error types for the alignbench-core crate.

use thiserror::Error;

/// Top-level error type for alignment-evaluation operations.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("ADM error: {0}")]
    Adm(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AlignError {
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn adm(msg: impl Into<String>) -> Self {
        Self::Adm(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
