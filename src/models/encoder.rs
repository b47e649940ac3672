//! Categorical label encoders fitted at training time

use crate::error::PredictError;
use crate::types::patient::FeatureColumn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of categorical columns the training pipeline encodes.
///
/// Serialized with the training-time column names, so an encoder keyed by
/// anything else fails to deserialize when the bundle is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    #[serde(rename = "gender")]
    Gender,
    #[serde(rename = "ever_married")]
    EverMarried,
    #[serde(rename = "work_type")]
    WorkType,
    #[serde(rename = "Residence_type")]
    ResidenceType,
    #[serde(rename = "smoking_status")]
    SmokingStatus,
}

impl CategoricalColumn {
    /// Training-time column name
    pub fn name(self) -> &'static str {
        self.feature().name()
    }

    /// The feature column this categorical column occupies
    pub fn feature(self) -> FeatureColumn {
        match self {
            CategoricalColumn::Gender => FeatureColumn::Gender,
            CategoricalColumn::EverMarried => FeatureColumn::EverMarried,
            CategoricalColumn::WorkType => FeatureColumn::WorkType,
            CategoricalColumn::ResidenceType => FeatureColumn::ResidenceType,
            CategoricalColumn::SmokingStatus => FeatureColumn::SmokingStatus,
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fitted mapping from category labels to integer codes.
///
/// The code of a label is its index in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Encode a single label
    pub fn transform(&self, column: CategoricalColumn, value: &str) -> Result<usize, PredictError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| PredictError::UnknownCategory {
                column,
                value: value.to_string(),
                known: self.classes.clone(),
            })
    }

    /// Check the class list is usable: non-empty and duplicate-free
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(format!("duplicate class '{}'", class));
            }
        }
        Ok(())
    }
}

/// Per-column encoders, keyed by the closed categorical column set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoders(BTreeMap<CategoricalColumn, LabelEncoder>);

impl Encoders {
    pub fn new(encoders: BTreeMap<CategoricalColumn, LabelEncoder>) -> Self {
        Self(encoders)
    }

    pub fn get(&self, column: CategoricalColumn) -> Option<&LabelEncoder> {
        self.0.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoricalColumn, &LabelEncoder)> {
        self.0.iter().map(|(column, encoder)| (*column, encoder))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every encoder, naming the offending column on failure
    pub fn validate(&self) -> Result<(), String> {
        for (column, encoder) in self.iter() {
            encoder
                .validate()
                .map_err(|reason| format!("encoder for {}: {}", column, reason))?;
        }
        Ok(())
    }
}
