//! Patient input record and its preprocessing stages.
//!
//! A record moves through three values, each produced from the previous one:
//! [`PatientRecord`] (raw, BMI may be missing) → [`ImputedRecord`] (every
//! field concrete) → [`EncodedRecord`] (every column numeric).

use crate::error::PredictError;
use crate::models::encoder::{CategoricalColumn, Encoders};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Feature columns of the training-time schema, in training order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureColumn {
    Gender,
    Age,
    Hypertension,
    HeartDisease,
    EverMarried,
    WorkType,
    ResidenceType,
    AvgGlucoseLevel,
    Bmi,
    SmokingStatus,
}

impl FeatureColumn {
    pub const ALL: [FeatureColumn; 10] = [
        FeatureColumn::Gender,
        FeatureColumn::Age,
        FeatureColumn::Hypertension,
        FeatureColumn::HeartDisease,
        FeatureColumn::EverMarried,
        FeatureColumn::WorkType,
        FeatureColumn::ResidenceType,
        FeatureColumn::AvgGlucoseLevel,
        FeatureColumn::Bmi,
        FeatureColumn::SmokingStatus,
    ];

    /// Column name as used by the training data
    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Gender => "gender",
            FeatureColumn::Age => "age",
            FeatureColumn::Hypertension => "hypertension",
            FeatureColumn::HeartDisease => "heart_disease",
            FeatureColumn::EverMarried => "ever_married",
            FeatureColumn::WorkType => "work_type",
            FeatureColumn::ResidenceType => "Residence_type",
            FeatureColumn::AvgGlucoseLevel => "avg_glucose_level",
            FeatureColumn::Bmi => "bmi",
            FeatureColumn::SmokingStatus => "smoking_status",
        }
    }

    /// Look up a column by its training-time name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Body mass index as supplied on the command line: a value or missing.
///
/// Parses from an empty string or `nan` (any case) as missing. Any other
/// text, including whitespace alone, must be a number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bmi(pub Option<f64>);

impl Bmi {
    pub fn value(self) -> Option<f64> {
        self.0
    }
}

impl FromStr for Bmi {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the empty string is blank; whitespace alone is not a number
        if s.is_empty() || s.trim().eq_ignore_ascii_case("nan") {
            return Ok(Bmi(None));
        }
        parse_measurement("bmi", s).map(|v| Bmi(Some(v)))
    }
}

/// Parse a finite, non-negative real measurement
pub fn parse_measurement(field: &'static str, s: &str) -> Result<f64, PredictError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| PredictError::InvalidNumericField {
            field,
            reason: format!("'{}' is not a number", s),
        })?;

    if !value.is_finite() {
        return Err(PredictError::InvalidNumericField {
            field,
            reason: format!("'{}' is not a finite number", s),
        });
    }
    if value < 0.0 {
        return Err(PredictError::InvalidNumericField {
            field,
            reason: format!("{} must not be negative", value),
        });
    }
    Ok(value)
}

/// A single patient row matching the training-time schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub gender: String,
    pub age: f64,
    /// Hypertension flag (0 or 1)
    pub hypertension: u8,
    /// Heart disease flag (0 or 1)
    pub heart_disease: u8,
    pub ever_married: String,
    pub work_type: String,
    #[serde(rename = "Residence_type", alias = "residence_type")]
    pub residence_type: String,
    pub avg_glucose_level: f64,
    /// Missing when not measured
    pub bmi: Option<f64>,
    pub smoking_status: String,
}

impl PatientRecord {
    /// Fill in missing BMI with the training-set median
    pub fn impute(&self, bmi_median: f64) -> ImputedRecord {
        ImputedRecord {
            gender: self.gender.clone(),
            age: self.age,
            hypertension: self.hypertension,
            heart_disease: self.heart_disease,
            ever_married: self.ever_married.clone(),
            work_type: self.work_type.clone(),
            residence_type: self.residence_type.clone(),
            avg_glucose_level: self.avg_glucose_level,
            bmi: self.bmi.unwrap_or(bmi_median),
            bmi_imputed: self.bmi.is_none(),
            smoking_status: self.smoking_status.clone(),
        }
    }
}

/// Patient row with every field concrete
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedRecord {
    pub gender: String,
    pub age: f64,
    pub hypertension: u8,
    pub heart_disease: u8,
    pub ever_married: String,
    pub work_type: String,
    pub residence_type: String,
    pub avg_glucose_level: f64,
    pub bmi: f64,
    /// Whether `bmi` came from the median rather than the input
    pub bmi_imputed: bool,
    pub smoking_status: String,
}

impl ImputedRecord {
    /// Raw string value of a categorical column
    pub fn category(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Gender => &self.gender,
            CategoricalColumn::EverMarried => &self.ever_married,
            CategoricalColumn::WorkType => &self.work_type,
            CategoricalColumn::ResidenceType => &self.residence_type,
            CategoricalColumn::SmokingStatus => &self.smoking_status,
        }
    }

    /// Replace every categorical value that has an encoder with its code.
    ///
    /// Categorical columns without an encoder have no numeric value and are
    /// left out of the result.
    pub fn encode(&self, encoders: &Encoders) -> Result<EncodedRecord, PredictError> {
        let mut values = BTreeMap::new();
        values.insert(FeatureColumn::Age, self.age);
        values.insert(FeatureColumn::Hypertension, f64::from(self.hypertension));
        values.insert(FeatureColumn::HeartDisease, f64::from(self.heart_disease));
        values.insert(FeatureColumn::AvgGlucoseLevel, self.avg_glucose_level);
        values.insert(FeatureColumn::Bmi, self.bmi);

        for (column, encoder) in encoders.iter() {
            let code = encoder.transform(column, self.category(column))?;
            values.insert(column.feature(), code as f64);
        }

        Ok(EncodedRecord { values })
    }
}

/// Patient row with a numeric value per available column
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    values: BTreeMap<FeatureColumn, f64>,
}

impl EncodedRecord {
    pub fn get(&self, column: FeatureColumn) -> Option<f64> {
        self.values.get(&column).copied()
    }

    /// Arrange values in the given column order.
    ///
    /// Fails with `SchemaMismatch` on the first column that is unknown or has
    /// no numeric value in this record.
    pub fn reorder<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<f64>, PredictError> {
        columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                FeatureColumn::from_name(name)
                    .and_then(|column| self.get(column))
                    .ok_or_else(|| PredictError::SchemaMismatch {
                        column: name.to_string(),
                    })
            })
            .collect()
    }
}
