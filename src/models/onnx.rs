//! ONNX Runtime classifier backend

use crate::error::PredictError;
use crate::models::classifier::{Classifier, OnnxModelSpec};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    /// ONNX Runtime session (running needs mutable access)
    session: RwLock<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name for probabilities
    probability_output: String,
    /// Output name for class labels, if the model exports one
    label_output: Option<String>,
}

impl OnnxClassifier {
    /// Load an ONNX model; `bundle_path` is the artifact bundle it belongs to
    pub fn load(spec: &OnnxModelSpec, bundle_path: &Path) -> Result<Self, PredictError> {
        let path = model_path(spec, bundle_path);
        let corrupt = |e: String| PredictError::corrupt(bundle_path, e);

        info!(path = %path.display(), "Loading ONNX model");
        if !path.is_file() {
            return Err(corrupt(format!("model file {} does not exist", path.display())));
        }

        let session = Session::builder()
            .map_err(|e| corrupt(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| corrupt(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| corrupt(e.to_string()))?
            .commit_from_file(&path)
            .map_err(|e| corrupt(format!("failed to load model from {}: {}", path.display(), e)))?;

        let inputs: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (input_name, probability_output, label_output) =
            resolve_names(spec, &inputs, &outputs).map_err(corrupt)?;

        info!(
            input = %input_name,
            probability_output = %probability_output,
            label_output = ?label_output,
            "ONNX model loaded successfully"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            probability_output,
            label_output,
        })
    }

    /// Run the model, returning the class-1 probability and the exported label
    fn run(&self, features: &[f64]) -> Result<(f64, Option<u8>), PredictError> {
        let inference = |e: String| PredictError::Inference(e);

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| inference(format!("failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .write()
            .map_err(|e| inference(format!("lock error: {}", e)))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| inference(e.to_string()))?;

        let probs = outputs.get(self.probability_output.as_str()).ok_or_else(|| {
            inference(format!("model produced no '{}' output", self.probability_output))
        })?;
        let (shape, data) = probs.try_extract_tensor::<f32>().map_err(|e| {
            inference(format!(
                "'{}' is not a float tensor (export with zipmap disabled): {}",
                self.probability_output, e
            ))
        })?;
        let dims: Vec<i64> = shape.iter().copied().collect();
        let probability = positive_class_probability(&dims, data)
            .ok_or_else(|| inference(format!("unexpected probability shape {:?}", dims)))?;

        let label = match &self.label_output {
            Some(name) => {
                let output = outputs
                    .get(name.as_str())
                    .ok_or_else(|| inference(format!("model produced no '{}' output", name)))?;
                let (_, labels) = output
                    .try_extract_tensor::<i64>()
                    .map_err(|e| inference(format!("'{}' is not an int64 tensor: {}", name, e)))?;
                let label = labels
                    .first()
                    .ok_or_else(|| inference(format!("'{}' output is empty", name)))?;
                Some(u8::from(*label == 1))
            }
            None => None,
        };

        debug!(probability = probability, label = ?label, "ONNX inference complete");
        Ok((probability, label))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &[f64]) -> Result<u8, PredictError> {
        self.classify(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], PredictError> {
        let (probability, _) = self.run(features)?;
        Ok([1.0 - probability, probability])
    }

    fn classify(&self, features: &[f64]) -> Result<(u8, [f64; 2]), PredictError> {
        let (probability, label) = self.run(features)?;
        let label = label.unwrap_or_else(|| fallback_label(probability));
        Ok((label, [1.0 - probability, probability]))
    }
}

/// Model file location: relative paths resolve against the bundle's directory
fn model_path(spec: &OnnxModelSpec, bundle_path: &Path) -> PathBuf {
    match bundle_path.parent() {
        Some(dir) if spec.path.is_relative() => dir.join(&spec.path),
        _ => spec.path.clone(),
    }
}

/// Most probable class, for models that export no label; ties go to class 0
fn fallback_label(probability: f64) -> u8 {
    u8::from(probability > 1.0 - probability)
}

/// Pick input, probability output and label output names.
///
/// Names set in the bundle must exist. Otherwise the first input is used,
/// the probability output is the first output named like "prob" (else the
/// last output) and the label output is the first named like "label".
fn resolve_names(
    spec: &OnnxModelSpec,
    inputs: &[String],
    outputs: &[String],
) -> Result<(String, String, Option<String>), String> {
    let require = |name: &String, available: &[String], what: &str| {
        if available.contains(name) {
            Ok(name.clone())
        } else {
            Err(format!("model has no {} named '{}' (available: {:?})", what, name, available))
        }
    };

    let input = match &spec.input {
        Some(name) => require(name, inputs, "input")?,
        None => inputs
            .first()
            .cloned()
            .ok_or_else(|| "model has no inputs".to_string())?,
    };

    let probability = match &spec.probability_output {
        Some(name) => require(name, outputs, "output")?,
        None => outputs
            .iter()
            .find(|o| o.contains("prob"))
            .or_else(|| outputs.last())
            .cloned()
            .ok_or_else(|| "model has no outputs".to_string())?,
    };

    let label = match &spec.label_output {
        Some(name) => Some(require(name, outputs, "output")?),
        None => outputs
            .iter()
            .find(|o| o.contains("label") && **o != probability)
            .cloned(),
    };

    Ok((input, probability, label))
}

/// Class-1 probability from a `[batch, classes]`, `[classes]` or `[batch, 1]` tensor
fn positive_class_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    let num_classes = match dims {
        [_, classes] | [classes] => *classes,
        _ => return None,
    };
    match num_classes {
        // Single column holds the positive-class probability
        1 => data.first().map(|&p| p as f64),
        n if n >= 2 => data.get(1).map(|&p| p as f64),
        _ => None,
    }
}
