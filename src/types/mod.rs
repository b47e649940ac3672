//! Type definitions for the stroke inference pipeline

pub mod patient;
pub mod prediction;

pub use patient::{Bmi, EncodedRecord, FeatureColumn, ImputedRecord, PatientRecord};
pub use prediction::{OutputFormat, Prediction};
