// Score Aggregation
// Sums indicator contributions into the composite score and derives percentages

use crate::models::IndicatorResult;

/// Composite AI-likelihood score, clamped to [0, 1]
pub fn aggregate_indicators(indicators: &[IndicatorResult]) -> f64 {
    let total: f64 = indicators.iter().map(|r| r.contribution).sum();
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 1.0)
}

/// (aiContentPercent, humanContentPercent); the pair always sums to 100
pub fn content_percentages(score: f64) -> (u8, u8) {
    let ai = (score.clamp(0.0, 1.0) * 100.0).round() as u8;
    (ai, 100 - ai)
}
