use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PredictionError;
use crate::types::FeatureVector;

/// Training statistics and fitted coefficient for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Population mean over the training corpus; doubles as the fallback
    /// value for missing optional inputs.
    pub mean: f64,
    /// Population standard deviation. Must be positive.
    pub std_dev: f64,
    /// Signed linear coefficient fitted alongside the stats.
    pub weight: f64,
}

/// The full per-feature statistics table, one entry per model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub price_to_low: FeatureStats,
    pub price_to_high: FeatureStats,
    pub analyst_upside_potential: FeatureStats,
    pub major_downgrades: FeatureStats,
    pub concern_level: FeatureStats,
    pub market_cap: FeatureStats,
    pub sentiment_score: FeatureStats,
    pub upgrades_last_30d: FeatureStats,
}

impl TrainingStats {
    /// Entries in [`FeatureVector::FIELD_NAMES`] order.
    pub fn as_array(&self) -> [&FeatureStats; FeatureVector::NUM_FEATURES] {
        [
            &self.price_to_low,
            &self.price_to_high,
            &self.analyst_upside_potential,
            &self.major_downgrades,
            &self.concern_level,
            &self.market_cap,
            &self.sentiment_score,
            &self.upgrades_last_30d,
        ]
    }

    /// The feature vector where every field sits at its training mean.
    /// Scores to ≈0 by construction.
    pub fn mean_vector(&self) -> FeatureVector {
        FeatureVector {
            price_to_low: self.price_to_low.mean,
            price_to_high: self.price_to_high.mean,
            analyst_upside_potential: self.analyst_upside_potential.mean,
            major_downgrades: self.major_downgrades.mean,
            concern_level: self.concern_level.mean,
            market_cap: self.market_cap.mean,
            sentiment_score: self.sentiment_score.mean,
            upgrades_last_30d: self.upgrades_last_30d.mean,
        }
    }
}

/// Percentile cut points of the training raw-score distribution.
///
/// The distribution is asymmetric: p25 is negative while p75 is positive, so
/// the neutral band is not centered on zero. Ordering invariant:
/// `p10 < p25 <= 0 <= p75 < p90`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

/// A fitted, versioned model calibration.
///
/// This is an immutable configuration artifact: the statistics table, score
/// thresholds, and alpha conversion fitted on the historical training set.
/// Changing any value changes prediction semantics and is a model version
/// bump, never a runtime tweak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCalibration {
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
    /// Forecast horizon in calendar days.
    pub horizon_days: u32,
    /// Number of filings in the training corpus.
    pub training_samples: u32,
    pub features: TrainingStats,
    pub thresholds: ScoreThresholds,
    /// Percentage points of 30-day alpha per unit of raw score.
    pub alpha_per_score: f64,
    /// Assumed average market return over the horizon, percent.
    pub market_baseline_return: f64,
}

impl ModelCalibration {
    /// Parse an artifact from its JSON representation and validate it.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        let calibration: Self = serde_json::from_str(json)?;
        calibration.validate()?;
        Ok(calibration)
    }

    /// Load an artifact from a file path and validate it.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject artifacts that cannot produce meaningful predictions.
    pub fn validate(&self) -> Result<(), PredictionError> {
        for (name, stats) in FeatureVector::FIELD_NAMES
            .iter()
            .zip(self.features.as_array())
        {
            if !stats.mean.is_finite() || !stats.std_dev.is_finite() || !stats.weight.is_finite() {
                return Err(PredictionError::InvalidCalibration(format!(
                    "non-finite statistics for {name}"
                )));
            }
            if stats.std_dev <= 0.0 {
                return Err(PredictionError::InvalidCalibration(format!(
                    "std_dev for {name} must be positive, got {}",
                    stats.std_dev
                )));
            }
        }

        let t = &self.thresholds;
        let ordered = [t.p10, t.p25, t.p75, t.p90];
        if ordered.iter().any(|v| !v.is_finite()) {
            return Err(PredictionError::InvalidCalibration(
                "non-finite score threshold".to_string(),
            ));
        }
        if !(t.p10 < t.p25 && t.p25 <= 0.0 && 0.0 <= t.p75 && t.p75 < t.p90) {
            return Err(PredictionError::InvalidCalibration(format!(
                "thresholds must satisfy p10 < p25 <= 0 <= p75 < p90, got {ordered:?}"
            )));
        }

        if !self.alpha_per_score.is_finite() || !self.market_baseline_return.is_finite() {
            return Err(PredictionError::InvalidCalibration(
                "non-finite alpha conversion constants".to_string(),
            ));
        }

        Ok(())
    }
}
