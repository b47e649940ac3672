//! Fitted numerical scaler

use serde::{Deserialize, Serialize};

/// Column-wise scaler with parameters fixed at training time.
///
/// Parameters are positional: entry `i` applies to feature column `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardization: `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// Range scaling: `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of feature columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { scale, .. } | Scaler::MinMax { scale, .. } => scale.len(),
        }
    }

    /// Check parameter vectors agree in length and are finite
    pub fn validate(&self) -> Result<(), String> {
        let (offsets, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
        };
        if offsets.len() != scale.len() {
            return Err(format!(
                "scaler parameter lengths differ ({} vs {})",
                offsets.len(),
                scale.len()
            ));
        }
        if offsets.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if matches!(self, Scaler::Standard { .. }) && scale.iter().any(|&s| s == 0.0) {
            return Err("standard scaler has a zero scale".to_string());
        }
        Ok(())
    }

    /// Scale a row given in feature-column order
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        debug_assert_eq!(row.len(), self.n_features());

        match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale.iter()))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        }
    }
}
