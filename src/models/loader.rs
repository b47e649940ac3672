//! Artifact bundle loader

use crate::error::PredictError;
use crate::models::bundle::{ArtifactBundle, BundleFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Well-known location of the bundle written by the training step
pub const DEFAULT_ARTIFACT_PATH: &str = "model_artifacts.json";

/// Loader for the artifact bundle
pub struct ArtifactLoader {
    path: PathBuf,
}

impl ArtifactLoader {
    /// Create a loader for the bundle at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read, deserialize and validate the bundle
    pub fn load(&self) -> Result<ArtifactBundle, PredictError> {
        info!(path = %self.path.display(), "Loading model artifacts");

        let contents = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PredictError::ArtifactNotFound {
                path: self.path.clone(),
            },
            _ => PredictError::corrupt(&self.path, e),
        })?;

        let file: BundleFile =
            serde_json::from_str(&contents).map_err(|e| PredictError::corrupt(&self.path, e))?;
        debug!(
            format_version = file.format_version,
            columns = ?file.columns,
            encoders = file.encoders.len(),
            "Artifact bundle parsed"
        );

        let bundle = ArtifactBundle::from_file(file, &self.path)?;

        info!(
            model = %bundle.model().name(),
            features = bundle.feature_columns().len(),
            bmi_median = bundle.bmi_median(),
            "Model artifacts loaded successfully"
        );

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "model": {"kind": "logistic_regression", "coef": [0.04, 0.9], "intercept": -3.0},
        "scaler": {"kind": "standard", "mean": [43.2, 28.9], "scale": [22.6, 7.7]},
        "encoders": {},
        "bmi_median": 28.1,
        "columns": ["age", "bmi"]
    }"#;

    #[test]
    fn test_load_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_artifacts.json");
        std::fs::write(&path, BUNDLE).unwrap();

        let bundle = ArtifactLoader::new(&path).load().unwrap();
        assert_eq!(bundle.bmi_median(), 28.1);
        assert_eq!(bundle.feature_columns().len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_artifacts.json");

        match ArtifactLoader::new(&path).load() {
            Err(PredictError::ArtifactNotFound { path: missing }) => assert_eq!(missing, path),
            Err(other) => panic!("expected ArtifactNotFound, got {:?}", other),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_artifacts.json");
        std::fs::write(&path, "\u{80}PICKLE").unwrap();

        assert!(matches!(
            ArtifactLoader::new(&path).load(),
            Err(PredictError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_artifacts.json");
        std::fs::write(&path, BUNDLE.replace(r#""bmi_median": 28.1,"#, "")).unwrap();

        match ArtifactLoader::new(&path).load() {
            Err(PredictError::ArtifactCorrupt { reason, .. }) => {
                assert!(reason.contains("bmi_median"))
            }
            Err(other) => panic!("expected ArtifactCorrupt, got {:?}", other),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_directory_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ArtifactLoader::new(dir.path()).load(),
            Err(PredictError::ArtifactCorrupt { .. })
        ));
    }
}
