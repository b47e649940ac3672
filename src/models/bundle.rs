//! Artifact bundle produced by the training step

use crate::error::PredictError;
use crate::feature_extractor::FeatureTransformer;
use crate::models::classifier::{Classifier, ModelSpec};
use crate::models::encoder::Encoders;
use crate::models::scaler::Scaler;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Newest bundle layout this build understands
pub const FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

/// On-disk layout of the artifact bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleFile {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub model: ModelSpec,
    pub scaler: Scaler,
    pub encoders: Encoders,
    pub bmi_median: f64,
    /// Feature columns in the order the scaler and model expect
    pub columns: Vec<String>,
}

impl BundleFile {
    /// Check the bundle is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.format_version > FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (newest supported is {})",
                self.format_version, FORMAT_VERSION
            ));
        }
        if !self.bmi_median.is_finite() {
            return Err("bmi_median must be a finite number".to_string());
        }
        if self.columns.is_empty() {
            return Err("no feature columns".to_string());
        }

        self.scaler.validate()?;
        if self.scaler.n_features() != self.columns.len() {
            return Err(format!(
                "scaler expects {} features but {} columns are listed",
                self.scaler.n_features(),
                self.columns.len()
            ));
        }

        self.encoders.validate()?;

        match &self.model {
            ModelSpec::LogisticRegression(model) => model.validate()?,
            ModelSpec::RandomForest(model) => model.validate()?,
            ModelSpec::Onnx(_) => {}
        }
        Ok(())
    }
}

/// Loaded, validated artifacts, read-only for the process lifetime
pub struct ArtifactBundle {
    model: Box<dyn Classifier>,
    scaler: Scaler,
    encoders: Encoders,
    bmi_median: f64,
    feature_columns: Vec<String>,
}

impl ArtifactBundle {
    /// Validate a deserialized bundle and build its classifier.
    ///
    /// `path` is where the bundle was read from; relative model file paths
    /// resolve against its directory.
    pub fn from_file(file: BundleFile, path: &Path) -> Result<Self, PredictError> {
        file.validate()
            .map_err(|reason| PredictError::corrupt(path, reason))?;

        let model = build_model(file.model, path)?;
        if let Some(width) = model.n_features() {
            if width != file.columns.len() {
                return Err(PredictError::corrupt(
                    path,
                    format!(
                        "model expects {} features but {} columns are listed",
                        width,
                        file.columns.len()
                    ),
                ));
            }
        }

        Ok(Self {
            model,
            scaler: file.scaler,
            encoders: file.encoders,
            bmi_median: file.bmi_median,
            feature_columns: file.columns,
        })
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn encoders(&self) -> &Encoders {
        &self.encoders
    }

    pub fn bmi_median(&self) -> f64 {
        self.bmi_median
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Feature transformer over this bundle's preprocessing artifacts
    pub fn transformer(&self) -> FeatureTransformer<'_> {
        FeatureTransformer::new(
            &self.encoders,
            &self.scaler,
            self.bmi_median,
            &self.feature_columns,
        )
    }
}

fn build_model(spec: ModelSpec, path: &Path) -> Result<Box<dyn Classifier>, PredictError> {
    match spec {
        ModelSpec::LogisticRegression(model) => Ok(Box::new(model)),
        ModelSpec::RandomForest(model) => Ok(Box::new(model)),
        #[cfg(feature = "onnx")]
        ModelSpec::Onnx(spec) => Ok(Box::new(crate::models::onnx::OnnxClassifier::load(
            &spec, path,
        )?)),
        #[cfg(not(feature = "onnx"))]
        ModelSpec::Onnx(spec) => Err(PredictError::corrupt(
            path,
            format!(
                "model {} is an ONNX model but this build lacks the `onnx` feature",
                spec.path.display()
            ),
        )),
    }
}
