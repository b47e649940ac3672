use std::path::PathBuf;
use stroke_predict::models::ArtifactLoader;
use stroke_predict::{PatientRecord, PredictError, StrokePredictor};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn predictor(name: &str) -> StrokePredictor {
    StrokePredictor::new(ArtifactLoader::new(fixture(name)).load().expect("load fixture"))
}

fn example_patient() -> PatientRecord {
    PatientRecord {
        gender: "Male".to_string(),
        age: 67.0,
        hypertension: 0,
        heart_disease: 1,
        ever_married: "Yes".to_string(),
        work_type: "Private".to_string(),
        residence_type: "Urban".to_string(),
        avg_glucose_level: 228.69,
        bmi: Some(36.6),
        smoking_status: "formerly smoked".to_string(),
    }
}

fn child_patient() -> PatientRecord {
    PatientRecord {
        gender: "Female".to_string(),
        age: 5.0,
        hypertension: 0,
        heart_disease: 0,
        ever_married: "No".to_string(),
        work_type: "children".to_string(),
        residence_type: "Rural".to_string(),
        avg_glucose_level: 80.0,
        bmi: None,
        smoking_status: "Unknown".to_string(),
    }
}

#[test]
fn example_patient_scores_with_logistic_regression() {
    let prediction = predictor("model_artifacts.json")
        .predict(&example_patient())
        .unwrap();
    assert_eq!(prediction.label, 1);
    assert_eq!(
        prediction.to_string(),
        "Prediction: 1\nProbability: 0.9653"
    );
}

#[test]
fn example_patient_scores_with_random_forest() {
    let predictor = predictor("forest_artifacts.json");

    let prediction = predictor.predict(&example_patient()).unwrap();
    assert_eq!(prediction.to_string(), "Prediction: 1\nProbability: 0.6000");

    let prediction = predictor.predict(&child_patient()).unwrap();
    assert_eq!(prediction.to_string(), "Prediction: 0\nProbability: 0.2000");
}

#[test]
fn labels_and_probabilities_are_in_range() {
    let predictor = predictor("model_artifacts.json");
    for record in [example_patient(), child_patient()] {
        let prediction = predictor.predict(&record).unwrap();
        assert!(prediction.label <= 1);
        assert!((0.0..=1.0).contains(&prediction.probability));
    }
}

#[test]
fn probability_is_positive_class_of_predict_proba() {
    let predictor = predictor("model_artifacts.json");
    let bundle = predictor.bundle();
    let features = bundle.transformer().transform(&example_patient()).unwrap();

    let [p0, p1] = bundle.model().predict_proba(&features).unwrap();
    let prediction = predictor.score(&features).unwrap();
    assert_eq!(prediction.probability, p1);
    assert!((p0 + p1 - 1.0).abs() < 1e-12);
}

#[test]
fn repeated_predictions_are_identical() {
    let predictor = predictor("model_artifacts.json");
    let first = predictor.predict(&example_patient()).unwrap();
    let second = predictor.predict(&example_patient()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_bmi_transforms_like_the_median() {
    let predictor = predictor("model_artifacts.json");
    let transformer = predictor.bundle().transformer();

    let mut literal = child_patient();
    literal.bmi = Some(predictor.bundle().bmi_median());

    assert_eq!(
        transformer.transform(&child_patient()).unwrap(),
        transformer.transform(&literal).unwrap()
    );
}

#[test]
fn unseen_work_type_is_rejected() {
    let mut record = example_patient();
    record.work_type = "Astronaut".to_string();

    match predictor("model_artifacts.json").predict(&record) {
        Err(PredictError::UnknownCategory { column, value, .. }) => {
            assert_eq!(column.name(), "work_type");
            assert_eq!(value, "Astronaut");
        }
        other => panic!("expected UnknownCategory, got {:?}", other),
    }
}

#[test]
fn missing_bundle_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ArtifactLoader::new(dir.path().join("model_artifacts.json")).load(),
        Err(PredictError::ArtifactNotFound { .. })
    ));
}

#[test]
fn bundle_with_unknown_column_is_schema_mismatch() {
    let contents = std::fs::read_to_string(fixture("model_artifacts.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model_artifacts.json");
    std::fs::write(&path, contents.replace("\"Residence_type\",", "\"residence\",")).unwrap();

    let predictor = StrokePredictor::new(ArtifactLoader::new(&path).load().unwrap());
    match predictor.predict(&example_patient()) {
        Err(PredictError::SchemaMismatch { column }) => assert_eq!(column, "residence"),
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn bundle_with_unknown_encoder_is_corrupt() {
    let contents = std::fs::read_to_string(fixture("model_artifacts.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model_artifacts.json");
    std::fs::write(&path, contents.replace("\"gender\": {", "\"sex\": {")).unwrap();

    assert!(matches!(
        ArtifactLoader::new(&path).load(),
        Err(PredictError::ArtifactCorrupt { .. })
    ));
}
