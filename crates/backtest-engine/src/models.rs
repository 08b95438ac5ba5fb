use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prediction_core::{ConfidenceTier, MarketCapCategory, PredictionResult, Signal};

/// A stored prediction joined with the returns that actually materialized
/// over the 30 days after the filing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub ticker: String,
    pub filing_date: DateTime<Utc>,
    pub prediction: PredictionResult,
    /// Market cap at filing time, dollars. Used for cohort breakdowns.
    pub market_cap: f64,
    /// Realized 30-day total return, percent.
    pub actual_30d_return: f64,
    /// Realized 30-day return in excess of the market benchmark, percent.
    pub actual_30d_alpha: f64,
}

/// Accuracy and realized-alpha statistics for one signal bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalBucketStats {
    pub signal: Signal,
    pub count: usize,
    /// Fraction of calls whose realized alpha had the called sign.
    /// `None` for the NEUTRAL bucket, which makes no directional claim.
    pub direction_accuracy: Option<f64>,
    pub mean_actual_alpha: f64,
    pub mean_expected_alpha: f64,
}

/// Predicted-vs-realized quality for one confidence tier, mirroring how
/// per-tier hit rates are tracked for signal quality monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStats {
    pub tier: ConfidenceTier,
    pub count: usize,
    /// Fraction of directional calls in this tier that were correct.
    pub hit_rate: Option<f64>,
    /// Mean |predicted 30d return − actual 30d return|, percent.
    pub mean_abs_error: f64,
}

/// Direction accuracy within one market-cap cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: MarketCapCategory,
    pub count: usize,
    pub direction_accuracy: Option<f64>,
}

/// Aggregate evaluation of a batch of stored predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub generated_at: DateTime<Utc>,
    pub total_predictions: usize,
    /// LONG + SHORT calls; NEUTRAL makes no directional claim.
    pub directional_count: usize,
    /// Fraction of directional calls with the correct alpha sign.
    pub direction_accuracy: Option<f64>,
    /// Mean |predicted 30d return − actual 30d return| over all records.
    pub mean_abs_error: f64,
    /// Mean realized alpha of LONG calls minus mean realized alpha of SHORT
    /// calls. The headline number: positive means the model ranks filings.
    pub long_short_spread: Option<f64>,
    pub by_signal: Vec<SignalBucketStats>,
    pub by_confidence: Vec<TierStats>,
    pub by_market_cap: Vec<CategoryStats>,
}
