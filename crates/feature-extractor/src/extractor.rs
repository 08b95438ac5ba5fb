use prediction_core::{
    AiAssessment, AnalystActivity, FeatureStats, FeatureVector, ModelCalibration, PredictionError,
    QuoteSnapshot, TrainingStats,
};

/// Resolves raw, possibly-gappy provider data into a complete [`FeatureVector`].
///
/// Missing optional inputs (AI fields, analyst target, unavailable 52-week
/// range) degrade to the training mean for that feature, so the output vector
/// is always fully populated. Market cap and analyst activity have no
/// fallback; a missing market cap is the one caller-facing error here.
pub struct FeatureExtractor {
    stats: TrainingStats,
}

impl FeatureExtractor {
    pub fn new(stats: TrainingStats) -> Self {
        Self { stats }
    }

    pub fn from_calibration(calibration: &ModelCalibration) -> Self {
        Self::new(calibration.features.clone())
    }

    /// Normalize one filing's raw inputs into the model's feature vector.
    ///
    /// Each field is computed independently; no inter-field dependencies.
    pub fn extract(
        &self,
        quote: &QuoteSnapshot,
        ai: &AiAssessment,
        activity: &AnalystActivity,
    ) -> Result<FeatureVector, PredictionError> {
        let market_cap = quote
            .market_cap
            .ok_or(PredictionError::MissingInput("marketCap"))?;

        // Ratios, never percentages. A zero 52-week bound means the quote
        // provider had no range data, not a zero price.
        let price_to_low = ratio_or_mean(
            quote.current_price,
            quote.fifty_two_week_low,
            &self.stats.price_to_low,
            "priceToLow",
        );
        let price_to_high = ratio_or_mean(
            quote.current_price,
            quote.fifty_two_week_high,
            &self.stats.price_to_high,
            "priceToHigh",
        );

        let analyst_upside_potential = match quote.analyst_target_price {
            Some(target) => (target / quote.current_price - 1.0) * 100.0,
            None => {
                tracing::debug!("analystTargetPrice unavailable, using training mean");
                self.stats.analyst_upside_potential.mean
            }
        };

        let concern_level = pass_through_or_mean(
            ai.concern_level,
            &self.stats.concern_level,
            "concernLevel",
        );
        let sentiment_score = pass_through_or_mean(
            ai.sentiment_score,
            &self.stats.sentiment_score,
            "sentimentScore",
        );

        Ok(FeatureVector {
            price_to_low,
            price_to_high,
            analyst_upside_potential,
            major_downgrades: f64::from(activity.major_downgrades_last_30d),
            concern_level,
            market_cap,
            sentiment_score,
            upgrades_last_30d: f64::from(activity.upgrades_last_30d),
        })
    }
}

fn ratio_or_mean(numerator: f64, denominator: f64, stats: &FeatureStats, field: &str) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        tracing::debug!("{field} denominator unavailable, using training mean");
        stats.mean
    }
}

fn pass_through_or_mean(value: Option<f64>, stats: &FeatureStats, field: &str) -> f64 {
    match value {
        Some(v) => v,
        None => {
            tracing::debug!("{field} unavailable, using training mean");
            stats.mean
        }
    }
}
