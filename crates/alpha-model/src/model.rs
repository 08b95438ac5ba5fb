use std::collections::BTreeMap;

use prediction_core::{
    round_to, ConfidenceTier, FeatureVector, ModelCalibration, PercentileBand, PredictionError,
    PredictionResult, ScoreThresholds, Signal,
};

/// The shipped champion calibration, embedded at build time.
const CHAMPION_V3: &str = include_str!("../model/champion-v3.json");

/// Linear alpha-forecast model over the 8-feature vector.
///
/// Pure and stateless after construction: `predict` does no I/O and touches
/// no shared mutable state, so one model can serve any number of concurrent
/// callers without synchronization.
pub struct AlphaModel {
    calibration: ModelCalibration,
}

impl AlphaModel {
    /// Build a model from an explicit calibration. The calibration is
    /// validated here so every later `predict` call is infallible.
    pub fn new(calibration: ModelCalibration) -> Result<Self, PredictionError> {
        calibration.validate()?;
        tracing::info!(
            model_version = %calibration.model_version,
            horizon_days = calibration.horizon_days,
            "loaded alpha model calibration"
        );
        Ok(Self { calibration })
    }

    /// Build the model from the embedded champion artifact.
    pub fn champion() -> Result<Self, PredictionError> {
        Self::new(ModelCalibration::from_json(CHAMPION_V3)?)
    }

    pub fn calibration(&self) -> &ModelCalibration {
        &self.calibration
    }

    /// Score one feature vector into a 30-day alpha forecast.
    ///
    /// Weighted z-score sum, then percentile-bucketed signal and confidence.
    /// Classification uses the rounded raw score so signal and confidence
    /// always agree at the shared p25/p75 cut points.
    pub fn predict(&self, features: &FeatureVector) -> PredictionResult {
        let values = features.as_array();
        let stats = self.calibration.features.as_array();

        let mut feature_contributions = BTreeMap::new();
        let mut total = 0.0;
        for ((name, value), stat) in FeatureVector::FIELD_NAMES.iter().zip(values).zip(stats) {
            let z = (value - stat.mean) / stat.std_dev;
            let contribution = stat.weight * z;
            total += contribution;
            feature_contributions.insert((*name).to_string(), round_to(contribution, 6));
        }

        let raw_score = round_to(total, 4);
        let (signal, confidence, percentile) = classify(&self.calibration.thresholds, raw_score);

        let expected_alpha = round_to(raw_score * self.calibration.alpha_per_score, 2);
        let predicted_30d_return = round_to(
            expected_alpha + self.calibration.market_baseline_return,
            2,
        );

        PredictionResult {
            raw_score,
            feature_contributions,
            expected_alpha,
            predicted_30d_return,
            signal,
            confidence,
            percentile,
            model_version: self.calibration.model_version.clone(),
        }
    }
}

/// Bucket a raw score against the training-distribution cut points.
///
/// The five bands form a total, non-overlapping partition of the real line.
/// p25 and p75 are shared between the signal and confidence classifications;
/// scores sitting exactly on either cut stay in the neutral central band.
fn classify(
    thresholds: &ScoreThresholds,
    raw_score: f64,
) -> (Signal, ConfidenceTier, PercentileBand) {
    let signal = if raw_score > thresholds.p75 {
        Signal::Long
    } else if raw_score < thresholds.p25 {
        Signal::Short
    } else {
        Signal::Neutral
    };

    let (confidence, percentile) = if raw_score > thresholds.p90 {
        (ConfidenceTier::High, PercentileBand::Above90th)
    } else if raw_score > thresholds.p75 {
        (ConfidenceTier::Medium, PercentileBand::UpperTail)
    } else if raw_score < thresholds.p10 {
        (ConfidenceTier::High, PercentileBand::Below10th)
    } else if raw_score < thresholds.p25 {
        (ConfidenceTier::Medium, PercentileBand::LowerTail)
    } else {
        (ConfidenceTier::Low, PercentileBand::Central)
    };

    (signal, confidence, percentile)
}
