//! Error types for the adpulse scoring pipeline
//!
//! This module provides structured error handling using thiserror. The
//! variants keep the pipeline's failure modes distinguishable: an unreachable
//! embedding or toxicity service is never reported as a zero score, and a
//! feature-schema mismatch is never papered over by truncation or padding.

use thiserror::Error;

/// Main error type for adpulse operations
#[derive(Error, Debug)]
pub enum AdPulseError {
    /// Embedding generation failed (service unreachable, bad response, ...)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Toxicity classification failed
    #[error("Toxicity error: {0}")]
    Toxicity(String),

    /// Feature vector does not match the schema a model was trained with
    #[error("Feature schema mismatch: model expects {expected} dimensions, extractor produced {actual}")]
    FeatureSchema { expected: usize, actual: usize },

    /// Model artifact is missing, corrupt, or of an incompatible version
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Predict called on a model that has not been fitted
    #[error("Model has not been fitted yet")]
    ModelNotFitted,

    /// Training or scoring dataset is malformed
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Invalid input or configuration value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model artifact encoding error
    #[error("Artifact encoding error: {0}")]
    Artifact(#[from] bincode::Error),

    /// CSV report error
    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for adpulse operations
pub type Result<T> = std::result::Result<T, AdPulseError>;

/// Convert anyhow::Error to AdPulseError
impl From<anyhow::Error> for AdPulseError {
    fn from(err: anyhow::Error) -> Self {
        AdPulseError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdPulseError::FeatureSchema {
            expected: 388,
            actual: 772,
        };
        assert_eq!(
            err.to_string(),
            "Feature schema mismatch: model expects 388 dimensions, extractor produced 772"
        );
    }

    #[test]
    fn test_service_errors_are_distinct() {
        let embed = AdPulseError::Embedding("connection refused".into());
        let tox = AdPulseError::Toxicity("connection refused".into());
        assert!(matches!(embed, AdPulseError::Embedding(_)));
        assert!(matches!(tox, AdPulseError::Toxicity(_)));
    }
}
