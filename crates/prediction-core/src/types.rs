use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Price and market snapshot for a company at filing time.
///
/// `fifty_two_week_high`/`fifty_two_week_low` of `0.0` mean "unavailable from
/// the quote provider" and are never used as denominators. `market_cap` has no
/// fallback: a `None` here is a caller error surfaced at extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub current_price: f64,
    #[serde(default)]
    pub fifty_two_week_high: f64,
    #[serde(default)]
    pub fifty_two_week_low: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub analyst_target_price: Option<f64>,
}

/// AI-derived assessment of a filing. Either field may be absent when the
/// upstream analysis did not produce it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    #[serde(default)]
    pub concern_level: Option<f64>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

/// Analyst upgrade/downgrade counts over the trailing 30 days.
///
/// Both counts are required; there is no population-average fallback for
/// analyst activity, so missing fields fail at deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystActivity {
    pub upgrades_last_30d: u32,
    pub major_downgrades_last_30d: u32,
}

/// Fully-resolved model input: 8 scalar features, no gaps.
///
/// Produced only by the feature extractor, which substitutes training means
/// for every optional input it could not compute. Field order in
/// [`as_array`](Self::as_array) matches [`FIELD_NAMES`](Self::FIELD_NAMES) and
/// is the order the scoring model walks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Current price / 52-week low, as a ratio (≈1.0–3.0).
    pub price_to_low: f64,
    /// Current price / 52-week high, as a ratio (≈0–1.0).
    pub price_to_high: f64,
    /// (target / current − 1) × 100, signed percent.
    pub analyst_upside_potential: f64,
    /// Major-firm downgrades in the trailing window.
    pub major_downgrades: f64,
    /// AI concern score, 0–10.
    pub concern_level: f64,
    /// Market capitalization in dollars.
    pub market_cap: f64,
    /// AI filing sentiment, −1..+1.
    pub sentiment_score: f64,
    /// Analyst upgrades in the trailing 30 days.
    pub upgrades_last_30d: f64,
}

impl FeatureVector {
    pub const NUM_FEATURES: usize = 8;

    /// Wire names, in model order. Downstream consumers key
    /// `featureContributions` by these.
    pub const FIELD_NAMES: [&'static str; Self::NUM_FEATURES] = [
        "priceToLow",
        "priceToHigh",
        "analystUpsidePotential",
        "majorDowngrades",
        "concernLevel",
        "marketCap",
        "sentimentScore",
        "upgradesLast30d",
    ];

    pub fn as_array(&self) -> [f64; Self::NUM_FEATURES] {
        [
            self.price_to_low,
            self.price_to_high,
            self.analyst_upside_potential,
            self.major_downgrades,
            self.concern_level,
            self.market_cap,
            self.sentiment_score,
            self.upgrades_last_30d,
        ]
    }
}

/// Discrete directional call derived from the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Long => "LONG",
            Signal::Short => "SHORT",
            Signal::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calibrated confidence tier, bucketed from the training score distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentile band of the raw score within the training distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentileBand {
    #[serde(rename = ">90th")]
    Above90th,
    #[serde(rename = "75th-90th")]
    UpperTail,
    #[serde(rename = "25th-75th")]
    Central,
    #[serde(rename = "10th-25th")]
    LowerTail,
    #[serde(rename = "<10th")]
    Below10th,
}

impl PercentileBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PercentileBand::Above90th => ">90th",
            PercentileBand::UpperTail => "75th-90th",
            PercentileBand::Central => "25th-75th",
            PercentileBand::LowerTail => "10th-25th",
            PercentileBand::Below10th => "<10th",
        }
    }
}

impl fmt::Display for PercentileBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market-cap size bucket used for cohort breakdowns in backtest reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCapCategory {
    Mega,
    Large,
    Mid,
    Small,
    Micro,
}

impl MarketCapCategory {
    /// Bucket a market cap in dollars. Cutoffs: $200B / $10B / $2B / $300M.
    pub fn from_market_cap(market_cap: f64) -> Self {
        if market_cap >= 200e9 {
            MarketCapCategory::Mega
        } else if market_cap >= 10e9 {
            MarketCapCategory::Large
        } else if market_cap >= 2e9 {
            MarketCapCategory::Mid
        } else if market_cap >= 300e6 {
            MarketCapCategory::Small
        } else {
            MarketCapCategory::Micro
        }
    }
}

/// Output of one scoring call. Immutable value object; created fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Weighted sum of per-feature z-scores, rounded to 4 decimals.
    pub raw_score: f64,
    /// Per-feature weighted z-score contributions, keyed by wire name.
    /// Sums to `raw_score` within 0.02.
    pub feature_contributions: BTreeMap<String, f64>,
    /// Forecast 30-day alpha vs the market benchmark, percent, 2 decimals.
    pub expected_alpha: f64,
    /// `expected_alpha` plus the assumed market baseline return, 2 decimals.
    pub predicted_30d_return: f64,
    pub signal: Signal,
    pub confidence: ConfidenceTier,
    pub percentile: PercentileBand,
    /// Which calibration artifact produced this prediction.
    pub model_version: String,
}
