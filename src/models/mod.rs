//! Model artifacts and inference components

pub mod bundle;
pub mod classifier;
pub mod encoder;
pub mod inference;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use bundle::ArtifactBundle;
pub use classifier::Classifier;
pub use inference::StrokePredictor;
pub use loader::ArtifactLoader;
