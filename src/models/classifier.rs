//! Classifier capability and the natively evaluated model kinds

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Binary classifier scoring a single scaled feature row.
///
/// Implementations provide framework-specific evaluation.
pub trait Classifier: Send + Sync {
    /// Model kind identifier
    fn name(&self) -> &str;

    /// Number of input features, when the model records it
    fn n_features(&self) -> Option<usize>;

    /// Class label for the row (0 = no stroke, 1 = stroke)
    fn predict(&self, features: &[f64]) -> Result<u8, PredictError>;

    /// Class probabilities `[p0, p1]` for the row
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictError>;

    /// Label and probabilities together. Backends that produce both from one
    /// evaluation override this.
    fn classify(&self, features: &[f64]) -> Result<(u8, [f64; 2]), PredictError> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }
}

/// Model section of the artifact bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    Onnx(OnnxModelSpec),
}

/// Reference to an exported ONNX model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnnxModelSpec {
    /// Model file, relative to the bundle's directory unless absolute
    pub path: PathBuf,
    /// Input tensor name (defaults to the model's first input)
    #[serde(default)]
    pub input: Option<String>,
    /// Probability output name (defaults to the first output named like "prob")
    #[serde(default)]
    pub probability_output: Option<String>,
    /// Label output name (defaults to the first output named like "label")
    #[serde(default)]
    pub label_output: Option<String>,
}

fn check_width(name: &str, expected: usize, features: &[f64]) -> Result<(), PredictError> {
    if features.len() != expected {
        return Err(PredictError::Inference(format!(
            "{} expects {} features, got {}",
            name,
            expected,
            features.len()
        )));
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted binary logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    /// Signed distance to the decision boundary
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, PredictError> {
        check_width(self.name(), self.coef.len(), features)?;
        Ok(self
            .coef
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("logistic regression has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err("logistic regression parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coef.len())
    }

    fn predict(&self, features: &[f64]) -> Result<u8, PredictError> {
        let z = self.decision_function(features)?;
        Ok(u8::from(z > 0.0))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictError> {
        let p = sigmoid(self.decision_function(features)?);
        Ok([1.0 - p, p])
    }
}

/// A single fitted decision tree in parallel-array layout.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise the row goes
/// left when `x[feature[i]] <= threshold[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights `[c0, c1]`
    pub value: Vec<[f64; 2]>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    /// Number of nodes in this tree
    pub fn num_nodes(&self) -> usize {
        self.children_left.len()
    }

    /// Check array lengths agree and every split points forward, in range
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.num_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree arrays differ in length".to_string());
        }

        for i in 0..n {
            let left = self.children_left[i];
            let right = self.children_right[i];
            if left == LEAF {
                let [c0, c1] = self.value[i];
                if !(c0 >= 0.0 && c1 >= 0.0 && c0 + c1 > 0.0) {
                    return Err(format!("leaf {} has invalid class weights", i));
                }
                continue;
            }
            // Children are stored after their parent, so traversal terminates
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} has out-of-order child {}", i, child));
                }
            }
            let feature = self.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", i, feature));
            }
        }
        Ok(())
    }

    /// Normalized class weights of the leaf the row lands in.
    ///
    /// The tree must have passed `validate` and `features` must be at least
    /// as wide as the forest; indexing panics otherwise.
    fn leaf_proba(&self, features: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let x = features[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [c0, c1] = self.value[node];
        let total = c0 + c1;
        [c0 / total, c1 / total]
    }
}

/// Fitted random forest: mean of per-tree leaf probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| format!("tree {}: {}", i, reason))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &[f64]) -> Result<u8, PredictError> {
        let [p0, p1] = self.predict_proba(features)?;
        Ok(u8::from(p1 > p0))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictError> {
        check_width(self.name(), self.n_features, features)?;

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_proba(features);
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}
