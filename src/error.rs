//! Error taxonomy for the inference pipeline

use crate::models::encoder::CategoricalColumn;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading artifacts or scoring a record
#[derive(Debug, Error)]
pub enum PredictError {
    /// The artifact bundle file does not exist
    #[error("{} not found. Please run train_model.py first to produce the model artifacts.", .path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The artifact bundle exists but cannot be used
    #[error("failed to load artifacts from {}: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// A numeric input field could not be parsed or is out of range
    #[error("invalid {field}: {reason}")]
    InvalidNumericField { field: &'static str, reason: String },

    /// A categorical value was never observed during training
    #[error("cannot encode {column}: unseen label '{value}' (expected one of: {})", .known.join(", "))]
    UnknownCategory {
        column: CategoricalColumn,
        value: String,
        known: Vec<String>,
    },

    /// A feature column the artifact expects is absent from the record
    #[error("feature column '{column}' is not present in the input record")]
    SchemaMismatch { column: String },

    /// The classifier backend failed at scoring time
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// Build an `ArtifactCorrupt` error for the given bundle path
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PredictError::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_mentions_training_step() {
        let err = PredictError::ArtifactNotFound {
            path: PathBuf::from("model_artifacts.json"),
        };
        let msg = err.to_string();
        assert!(msg.contains("model_artifacts.json"));
        assert!(msg.contains("train_model.py"));
    }

    #[test]
    fn test_unknown_category_message() {
        let err = PredictError::UnknownCategory {
            column: CategoricalColumn::WorkType,
            value: "Astronaut".to_string(),
            known: vec!["Private".to_string(), "children".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "cannot encode work_type: unseen label 'Astronaut' (expected one of: Private, children)"
        );
    }
}
