//! Command-line interface

use crate::error::PredictError;
use crate::types::patient::{parse_measurement, Bmi, PatientRecord};
use crate::types::prediction::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Stroke Prediction
///
/// Scores a single patient against the trained stroke risk model.
#[derive(Debug, Clone, Parser)]
#[command(name = "stroke-predict", author, version, about, long_about = None)]
pub struct Cli {
    /// Gender, e.g. Male, Female, Other
    #[arg(long)]
    pub gender: String,

    /// Age in years
    #[arg(long, allow_negative_numbers = true, value_parser = parse_age)]
    pub age: f64,

    /// Hypertension flag (0 or 1)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub hypertension: u8,

    /// Heart disease flag (0 or 1)
    #[arg(long = "heart_disease", alias = "heart-disease", value_parser = clap::value_parser!(u8).range(0..=1))]
    pub heart_disease: u8,

    /// Ever married: Yes or No
    #[arg(long = "ever_married", alias = "ever-married")]
    pub ever_married: String,

    /// Work type, e.g. Private, Self-employed, Govt_job, children, Never_worked
    #[arg(long = "work_type", alias = "work-type")]
    pub work_type: String,

    /// Residence type: Urban or Rural
    #[arg(long = "residence_type", alias = "residence-type")]
    pub residence_type: String,

    /// Average glucose level (mg/dL)
    #[arg(long = "avg_glucose_level", alias = "avg-glucose-level", allow_negative_numbers = true, value_parser = parse_glucose)]
    pub avg_glucose_level: f64,

    /// Body mass index; an empty string or "nan" marks it as not measured
    #[arg(long, allow_hyphen_values = true)]
    pub bmi: Bmi,

    /// Smoking status, e.g. "never smoked", "formerly smoked", smokes, Unknown
    #[arg(long = "smoking_status", alias = "smoking-status")]
    pub smoking_status: String,

    /// Artifact bundle path (overrides the configured one)
    #[arg(long, value_name = "PATH")]
    pub artifacts: Option<PathBuf>,

    /// Configuration file (default: config/predict.toml, if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

fn parse_age(s: &str) -> Result<f64, PredictError> {
    parse_measurement("age", s)
}

fn parse_glucose(s: &str) -> Result<f64, PredictError> {
    parse_measurement("avg_glucose_level", s)
}

impl Cli {
    /// Build the patient record described by the flags
    pub fn record(&self) -> PatientRecord {
        PatientRecord {
            gender: self.gender.clone(),
            age: self.age,
            hypertension: self.hypertension,
            heart_disease: self.heart_disease,
            ever_married: self.ever_married.clone(),
            work_type: self.work_type.clone(),
            residence_type: self.residence_type.clone(),
            avg_glucose_level: self.avg_glucose_level,
            bmi: self.bmi.value(),
            smoking_status: self.smoking_status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const ARGS: [&str; 20] = [
        "--gender",
        "Male",
        "--age",
        "67",
        "--hypertension",
        "0",
        "--heart_disease",
        "1",
        "--ever_married",
        "Yes",
        "--work_type",
        "Private",
        "--residence_type",
        "Urban",
        "--avg_glucose_level",
        "228.69",
        "--bmi",
        "36.6",
        "--smoking_status",
        "formerly smoked",
    ];

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("stroke-predict").chain(args.iter().copied()))
    }

    fn with(flag: &str, value: &str) -> Vec<String> {
        let mut args: Vec<String> = ARGS.iter().map(|s| s.to_string()).collect();
        let i = args.iter().position(|a| a == flag).unwrap();
        args[i + 1] = value.to_string();
        args
    }

    fn parse_owned(args: &[String]) -> Result<Cli, clap::Error> {
        let borrowed: Vec<&str> = args.iter().map(String::as_str).collect();
        parse(&borrowed)
    }

    #[test]
    fn test_parse_full_record() {
        let cli = parse(&ARGS).unwrap();
        let record = cli.record();
        assert_eq!(record.gender, "Male");
        assert_eq!(record.age, 67.0);
        assert_eq!(record.heart_disease, 1);
        assert_eq!(record.residence_type, "Urban");
        assert_eq!(record.bmi, Some(36.6));
        assert_eq!(record.smoking_status, "formerly smoked");
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.artifacts.is_none());
    }

    #[test]
    fn test_flag_order_does_not_matter() {
        let mut reversed: Vec<&str> = Vec::new();
        for pair in ARGS.chunks(2).rev() {
            reversed.extend_from_slice(pair);
        }
        assert_eq!(parse(&ARGS).unwrap().record(), parse(&reversed).unwrap().record());
    }

    #[test]
    fn test_blank_and_nan_bmi_are_missing() {
        assert_eq!(parse_owned(&with("--bmi", "")).unwrap().record().bmi, None);
        assert_eq!(parse_owned(&with("--bmi", "NaN")).unwrap().record().bmi, None);
    }

    #[test]
    fn test_invalid_bmi_is_rejected() {
        let err = parse_owned(&with("--bmi", "tall")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_whitespace_only_bmi_is_rejected() {
        let err = parse_owned(&with("--bmi", "   ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_flags_must_be_binary() {
        let err = parse_owned(&with("--hypertension", "2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_negative_age_is_rejected() {
        let err = parse_owned(&with("--age", "-4")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_missing_flag_is_rejected() {
        let err = parse(&ARGS[..18]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_kebab_case_aliases() {
        let args: Vec<String> = ARGS
            .iter()
            .map(|a| if a.starts_with("--") { a.replace('_', "-") } else { a.to_string() })
            .collect();
        assert_eq!(parse_owned(&args).unwrap().record(), parse(&ARGS).unwrap().record());
    }

    #[test]
    fn test_output_and_artifact_overrides() {
        let mut args: Vec<String> = ARGS.iter().map(|s| s.to_string()).collect();
        args.extend(["--output", "json", "--artifacts", "elsewhere.json"].map(String::from));
        let cli = parse_owned(&args).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.artifacts, Some(PathBuf::from("elsewhere.json")));
    }
}
