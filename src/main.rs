//! Stroke Predictor - Main Entry Point
//!
//! Loads the trained model artifacts, scores one patient given on the
//! command line and prints the label and positive-class probability.

use anyhow::Result;
use clap::Parser;
use stroke_predict::{
    cli::Cli,
    config::{AppConfig, LogFormat, LoggingConfig},
    StrokePredictor,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(path) = &cli.artifacts {
        config = config.with_artifact_path(path);
    }

    init_logging(&config.logging);
    info!(artifacts = %config.artifacts.path.display(), "Configuration loaded");

    let predictor = StrokePredictor::from_config(&config)?;
    let prediction = predictor.predict(&cli.record())?;

    println!("{}", prediction.render(cli.output));
    Ok(())
}

/// Initialize logging on stderr; `RUST_LOG` takes precedence over the config
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stroke_predict={}", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
