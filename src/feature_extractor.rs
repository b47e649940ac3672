//! Feature transformation for stroke model inference.
//!
//! Reproduces the preprocessing done by the training pipeline, in the same
//! fixed order: BMI imputation, categorical encoding, column reordering,
//! then scaling.

use crate::error::PredictError;
use crate::models::encoder::Encoders;
use crate::models::scaler::Scaler;
use crate::types::patient::{EncodedRecord, ImputedRecord, PatientRecord};
use tracing::debug;

/// Transforms patient records into scaled model input features.
///
/// Borrows the preprocessing artifacts of a loaded bundle.
pub struct FeatureTransformer<'a> {
    encoders: &'a Encoders,
    scaler: &'a Scaler,
    bmi_median: f64,
    feature_columns: &'a [String],
}

impl<'a> FeatureTransformer<'a> {
    pub fn new(
        encoders: &'a Encoders,
        scaler: &'a Scaler,
        bmi_median: f64,
        feature_columns: &'a [String],
    ) -> Self {
        Self {
            encoders,
            scaler,
            bmi_median,
            feature_columns,
        }
    }

    /// Fill missing values
    pub fn impute(&self, record: &PatientRecord) -> ImputedRecord {
        let imputed = record.impute(self.bmi_median);
        if imputed.bmi_imputed {
            debug!(bmi_median = self.bmi_median, "BMI missing, imputed with training median");
        }
        imputed
    }

    /// Encode categorical columns
    pub fn encode(&self, record: &ImputedRecord) -> Result<EncodedRecord, PredictError> {
        record.encode(self.encoders)
    }

    /// Arrange encoded values in feature-column order, before scaling
    pub fn reorder(&self, record: &EncodedRecord) -> Result<Vec<f64>, PredictError> {
        record.reorder(self.feature_columns)
    }

    /// Run the full preprocessing pipeline.
    ///
    /// Returns one scaled value per feature column, in column order.
    pub fn transform(&self, record: &PatientRecord) -> Result<Vec<f64>, PredictError> {
        let imputed = self.impute(record);
        let encoded = self.encode(&imputed)?;
        let row = self.reorder(&encoded)?;
        let features = self.scaler.transform(&row);

        debug!(row = ?row, features = ?features, "Features transformed");
        Ok(features)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        self.feature_columns.len()
    }
}
