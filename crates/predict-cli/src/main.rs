//! predict-cli: Score a single filing snapshot into a 30-day alpha forecast.
//!
//! Reads a JSON document holding the quote, AI assessment, and analyst
//! activity for one filing, runs extraction + scoring, and prints the
//! prediction as JSON.
//!
//! Usage:
//!   cargo run -p predict-cli -- --input filing.json
//!   cargo run -p predict-cli -- --input filing.json --model model/custom.json
//!   cargo run -p predict-cli -- --input filing.json --compact

use alpha_model::AlphaModel;
use anyhow::{bail, Context};
use feature_extractor::FeatureExtractor;
use prediction_core::{AiAssessment, AnalystActivity, ModelCalibration, QuoteSnapshot};
use serde::Deserialize;

/// One filing's raw inputs, as upstream providers deliver them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest {
    quote: QuoteSnapshot,
    #[serde(default)]
    ai_assessment: AiAssessment,
    analyst_activity: AnalystActivity,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "predict_cli=info,alpha_model=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let compact = args.iter().any(|a| a == "--compact");
    let input_path = flag_value(&args, "--input");
    let model_path = flag_value(&args, "--model");

    let Some(input_path) = input_path else {
        bail!("missing required flag: --input <filing.json>");
    };

    let model = match model_path {
        Some(path) => {
            let calibration = ModelCalibration::load_from_path(&path)
                .with_context(|| format!("failed to load calibration from {path}"))?;
            AlphaModel::new(calibration)?
        }
        None => AlphaModel::champion()?,
    };

    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read {input_path}"))?;
    let request: ScoreRequest =
        serde_json::from_str(&raw).with_context(|| format!("invalid filing JSON in {input_path}"))?;

    let extractor = FeatureExtractor::from_calibration(model.calibration());
    let features = extractor.extract(
        &request.quote,
        &request.ai_assessment,
        &request.analyst_activity,
    )?;

    let result = model.predict(&features);
    tracing::info!(
        signal = %result.signal,
        confidence = %result.confidence,
        raw_score = result.raw_score,
        "scored filing"
    );

    let output = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");

    Ok(())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
