//! Stroke Risk Predictor Library
//!
//! Single-record inference for a stroke risk classifier trained offline:
//! artifact loading, preprocessing identical to training, and scoring.

pub mod cli;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::PredictError;
pub use feature_extractor::FeatureTransformer;
pub use models::inference::StrokePredictor;
pub use types::{patient::PatientRecord, prediction::Prediction};
