//! Prediction result and output formatting

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a prediction is written to standard output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Prediction: <label>` / `Probability: <p>` lines
    #[default]
    Text,
    /// Single-line JSON object
    Json,
}

/// Outcome of scoring one patient record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Class label (0 = no stroke, 1 = stroke)
    #[serde(rename = "prediction")]
    pub label: u8,
    /// Probability of the positive class, as reported by the model
    pub probability: f64,
}

impl Prediction {
    pub fn new(label: u8, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Render in the requested output format (no trailing newline)
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.to_string(),
            OutputFormat::Json => serde_json::json!({
                "prediction": self.label,
                "probability": self.probability,
            })
            .to_string(),
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prediction: {}", self.label)?;
        write!(f, "Probability: {:.4}", self.probability)
    }
}
