use chrono::Utc;
use rayon::prelude::*;
use statrs::statistics::Statistics;

use prediction_core::{ConfidenceTier, MarketCapCategory, Signal};

use crate::models::{
    BacktestReport, CategoryStats, PredictionRecord, SignalBucketStats, TierStats,
};

/// Minimum records before a report is meaningful.
const MIN_RECORDS: usize = 5;

/// Per-record evaluation, computed once and aggregated many ways.
struct Outcome {
    signal: Signal,
    tier: ConfidenceTier,
    category: MarketCapCategory,
    /// Realized-alpha sign matched the call; `None` for NEUTRAL.
    correct: Option<bool>,
    abs_error: f64,
    actual_alpha: f64,
    expected_alpha: f64,
}

fn evaluate_record(record: &PredictionRecord) -> Outcome {
    let correct = match record.prediction.signal {
        Signal::Long => Some(record.actual_30d_alpha > 0.0),
        Signal::Short => Some(record.actual_30d_alpha < 0.0),
        Signal::Neutral => None,
    };

    Outcome {
        signal: record.prediction.signal,
        tier: record.prediction.confidence,
        category: MarketCapCategory::from_market_cap(record.market_cap),
        correct,
        abs_error: (record.prediction.predicted_30d_return - record.actual_30d_return).abs(),
        actual_alpha: record.actual_30d_alpha,
        expected_alpha: record.prediction.expected_alpha,
    }
}

fn accuracy(outcomes: &[&Outcome]) -> Option<f64> {
    let directional: Vec<bool> = outcomes.iter().filter_map(|o| o.correct).collect();
    if directional.is_empty() {
        return None;
    }
    let hits = directional.iter().filter(|&&c| c).count();
    Some(hits as f64 / directional.len() as f64)
}

/// Evaluate a batch of stored predictions against their realized returns.
///
/// Returns `None` when fewer than 5 records are supplied. Records are scored
/// in parallel, then aggregated into per-signal, per-tier, and per-cap-cohort
/// breakdowns.
pub fn evaluate(records: &[PredictionRecord]) -> Option<BacktestReport> {
    if records.len() < MIN_RECORDS {
        return None;
    }

    let outcomes: Vec<Outcome> = records.par_iter().map(evaluate_record).collect();

    let directional: Vec<&Outcome> = outcomes.iter().filter(|o| o.correct.is_some()).collect();
    let all: Vec<&Outcome> = outcomes.iter().collect();

    let abs_errors: Vec<f64> = outcomes.iter().map(|o| o.abs_error).collect();
    let mean_abs_error = abs_errors.mean();

    let long_alphas: Vec<f64> = outcomes
        .iter()
        .filter(|o| o.signal == Signal::Long)
        .map(|o| o.actual_alpha)
        .collect();
    let short_alphas: Vec<f64> = outcomes
        .iter()
        .filter(|o| o.signal == Signal::Short)
        .map(|o| o.actual_alpha)
        .collect();
    let long_short_spread = if long_alphas.is_empty() || short_alphas.is_empty() {
        None
    } else {
        Some(long_alphas.as_slice().mean() - short_alphas.as_slice().mean())
    };

    let by_signal = [Signal::Long, Signal::Short, Signal::Neutral]
        .into_iter()
        .filter_map(|signal| {
            let bucket: Vec<&Outcome> = outcomes.iter().filter(|o| o.signal == signal).collect();
            if bucket.is_empty() {
                return None;
            }
            let actual: Vec<f64> = bucket.iter().map(|o| o.actual_alpha).collect();
            let expected: Vec<f64> = bucket.iter().map(|o| o.expected_alpha).collect();
            Some(SignalBucketStats {
                signal,
                count: bucket.len(),
                direction_accuracy: accuracy(&bucket),
                mean_actual_alpha: actual.mean(),
                mean_expected_alpha: expected.mean(),
            })
        })
        .collect();

    let by_confidence = [
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
    ]
    .into_iter()
    .filter_map(|tier| {
        let bucket: Vec<&Outcome> = outcomes.iter().filter(|o| o.tier == tier).collect();
        if bucket.is_empty() {
            return None;
        }
        let errors: Vec<f64> = bucket.iter().map(|o| o.abs_error).collect();
        Some(TierStats {
            tier,
            count: bucket.len(),
            hit_rate: accuracy(&bucket),
            mean_abs_error: errors.mean(),
        })
    })
    .collect();

    let by_market_cap = [
        MarketCapCategory::Mega,
        MarketCapCategory::Large,
        MarketCapCategory::Mid,
        MarketCapCategory::Small,
        MarketCapCategory::Micro,
    ]
    .into_iter()
    .filter_map(|category| {
        let bucket: Vec<&Outcome> = outcomes.iter().filter(|o| o.category == category).collect();
        if bucket.is_empty() {
            return None;
        }
        Some(CategoryStats {
            category,
            count: bucket.len(),
            direction_accuracy: accuracy(&bucket),
        })
    })
    .collect();

    let report = BacktestReport {
        generated_at: Utc::now(),
        total_predictions: outcomes.len(),
        directional_count: directional.len(),
        direction_accuracy: accuracy(&all),
        mean_abs_error,
        long_short_spread,
        by_signal,
        by_confidence,
        by_market_cap,
    };

    tracing::debug!(
        total = report.total_predictions,
        directional = report.directional_count,
        "evaluated prediction batch"
    );

    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prediction_core::{PercentileBand, PredictionResult};
    use std::collections::BTreeMap;

    fn record(
        signal: Signal,
        tier: ConfidenceTier,
        market_cap: f64,
        expected_alpha: f64,
        actual_30d_alpha: f64,
    ) -> PredictionRecord {
        let percentile = match signal {
            Signal::Long => PercentileBand::Above90th,
            Signal::Short => PercentileBand::Below10th,
            Signal::Neutral => PercentileBand::Central,
        };
        PredictionRecord {
            ticker: "TEST".to_string(),
            filing_date: Utc::now(),
            prediction: PredictionResult {
                raw_score: expected_alpha / 2.0,
                feature_contributions: BTreeMap::new(),
                expected_alpha,
                predicted_30d_return: expected_alpha + 0.9,
                signal,
                confidence: tier,
                percentile,
                model_version: "champion-v3".to_string(),
            },
            market_cap,
            actual_30d_return: actual_30d_alpha + 0.9,
            actual_30d_alpha,
        }
    }

    #[test]
    fn test_too_few_records_yields_no_report() {
        let records = vec![record(
            Signal::Long,
            ConfidenceTier::High,
            1e12,
            4.0,
            5.0,
        )];
        assert!(evaluate(&records).is_none());
    }

    #[test]
    fn test_direction_accuracy_counts_only_directional_calls() {
        let records = vec![
            record(Signal::Long, ConfidenceTier::High, 1e12, 4.0, 5.0), // hit
            record(Signal::Long, ConfidenceTier::Medium, 1e12, 1.0, -2.0), // miss
            record(Signal::Short, ConfidenceTier::High, 1e9, -3.0, -4.0), // hit
            record(Signal::Short, ConfidenceTier::Medium, 1e9, -1.0, -0.5), // hit
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.1, 0.2), // excluded
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, -0.1, 1.0), // excluded
        ];

        let report = evaluate(&records).unwrap();

        assert_eq!(report.total_predictions, 6);
        assert_eq!(report.directional_count, 4);
        assert_eq!(report.direction_accuracy, Some(0.75));
    }

    #[test]
    fn test_long_short_spread() {
        let records = vec![
            record(Signal::Long, ConfidenceTier::High, 1e12, 4.0, 6.0),
            record(Signal::Long, ConfidenceTier::High, 1e12, 4.0, 2.0),
            record(Signal::Short, ConfidenceTier::High, 1e9, -3.0, -5.0),
            record(Signal::Short, ConfidenceTier::High, 1e9, -3.0, -1.0),
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.0, 0.5),
        ];

        let report = evaluate(&records).unwrap();

        // Long mean +4, short mean -3.
        assert_eq!(report.long_short_spread, Some(7.0));
    }

    #[test]
    fn test_spread_absent_without_both_sides() {
        let records = vec![
            record(Signal::Long, ConfidenceTier::High, 1e12, 4.0, 6.0),
            record(Signal::Long, ConfidenceTier::Medium, 1e12, 2.0, 2.0),
            record(Signal::Long, ConfidenceTier::Medium, 1e12, 2.0, 1.0),
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.0, 0.5),
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.0, -0.5),
        ];

        let report = evaluate(&records).unwrap();
        assert_eq!(report.long_short_spread, None);
    }

    #[test]
    fn test_confidence_tiers_report_hit_rate_and_error() {
        let records = vec![
            record(Signal::Long, ConfidenceTier::High, 1e12, 4.0, 5.0),
            record(Signal::Short, ConfidenceTier::High, 1e9, -3.0, 1.0),
            record(Signal::Long, ConfidenceTier::Medium, 1e12, 1.0, 2.0),
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.1, 0.3),
            record(Signal::Neutral, ConfidenceTier::Low, 1e10, 0.0, 0.1),
        ];

        let report = evaluate(&records).unwrap();

        let high = report
            .by_confidence
            .iter()
            .find(|t| t.tier == ConfidenceTier::High)
            .unwrap();
        assert_eq!(high.count, 2);
        assert_eq!(high.hit_rate, Some(0.5));

        let low = report
            .by_confidence
            .iter()
            .find(|t| t.tier == ConfidenceTier::Low)
            .unwrap();
        assert_eq!(low.hit_rate, None);
    }

    #[test]
    fn test_market_cap_cohorts() {
        let records = vec![
            record(Signal::Long, ConfidenceTier::High, 2e12, 4.0, 5.0),
            record(Signal::Long, ConfidenceTier::High, 50e9, 4.0, 5.0),
            record(Signal::Short, ConfidenceTier::High, 5e7, -3.0, -1.0),
            record(Signal::Short, ConfidenceTier::High, 5e7, -3.0, 1.0),
            record(Signal::Neutral, ConfidenceTier::Low, 5e9, 0.0, 0.0),
        ];

        let report = evaluate(&records).unwrap();

        let micro = report
            .by_market_cap
            .iter()
            .find(|c| c.category == MarketCapCategory::Micro)
            .unwrap();
        assert_eq!(micro.count, 2);
        assert_eq!(micro.direction_accuracy, Some(0.5));

        assert!(report
            .by_market_cap
            .iter()
            .all(|c| c.count > 0));
    }
}
