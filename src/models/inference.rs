//! Single-record stroke risk inference

use crate::config::AppConfig;
use crate::error::PredictError;
use crate::models::bundle::ArtifactBundle;
use crate::models::loader::ArtifactLoader;
use crate::types::patient::PatientRecord;
use crate::types::prediction::Prediction;
use tracing::{debug, info};

/// Scores patient records against a loaded artifact bundle
pub struct StrokePredictor {
    bundle: ArtifactBundle,
}

impl StrokePredictor {
    /// Create a predictor over an already loaded bundle
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self { bundle }
    }

    /// Load the bundle named by the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, PredictError> {
        let bundle = ArtifactLoader::new(&config.artifacts.path).load()?;
        info!(
            model = %bundle.model().name(),
            features = bundle.feature_columns().len(),
            "Stroke predictor initialized"
        );
        Ok(Self::new(bundle))
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Preprocess and score a record
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, PredictError> {
        let features = self.bundle.transformer().transform(record)?;
        self.score(&features)
    }

    /// Score an already transformed feature row
    pub fn score(&self, features: &[f64]) -> Result<Prediction, PredictError> {
        let model = self.bundle.model();
        let (label, [_, probability]) = model.classify(features)?;

        debug!(
            model = %model.name(),
            label = label,
            probability = probability,
            "Inference complete"
        );

        Ok(Prediction::new(label, probability))
    }
}
