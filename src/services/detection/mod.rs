// Detection Module
// Heuristic AI-content scoring organized into specialized submodules:
// - indicators: five bounded heuristics over one text sample
// - aggregation: composite score and content percentages
// - confidence: qualitative confidence label
// - risk: risk level and risk score from aiContentPercent
// - alerts: the per-scan user-facing alert

pub mod indicators;
pub mod aggregation;
pub mod confidence;
pub mod risk;
pub mod alerts;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{Alert, DetectionResult, ScanSummary, ScoreVector, TextSample};

pub use aggregation::{aggregate_indicators, content_percentages};
pub use alerts::generate_alerts;
pub use confidence::estimate_confidence;
pub use indicators::{compute_indicator, compute_indicators, population_variance, AI_PHRASES};
pub use risk::{classify_risk, risk_score};

/// Full outcome of one analysis, including per-indicator contributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub indicators: ScoreVector,
    pub score: f64,
}

pub fn analyze_sample(sample: &TextSample) -> ScanReport {
    if sample.is_empty() {
        return ScanReport {
            summary: ScanSummary::empty(),
            indicators: Vec::new(),
            score: 0.0,
        };
    }

    let indicators = compute_indicators(sample);
    let score = aggregate_indicators(&indicators);
    let (ai_content_percent, human_content_percent) = content_percentages(score);
    let confidence = estimate_confidence(sample.word_count(), score);

    debug!(
        words = sample.word_count(),
        score,
        ai_percent = ai_content_percent,
        confidence = confidence.as_str(),
        "scan.analyzed"
    );

    ScanReport {
        summary: ScanSummary {
            ai_content_percent,
            human_content_percent,
            confidence,
            words_analyzed: sample.word_count(),
        },
        indicators,
        score,
    }
}

/// The `analyzePage` computation over an already extracted string
pub fn analyze_text(text: &str) -> ScanSummary {
    analyze_sample(&TextSample::new(text)).summary
}

/// Caller-side stage: risk classification and alerts from a boundary summary
pub fn derive_detection(
    summary: &ScanSummary,
    scanned_at: Option<DateTime<Utc>>,
) -> (DetectionResult, Vec<Alert>) {
    let percent = summary.ai_content_percent;
    let detection = DetectionResult {
        ai_content_percent: percent,
        human_content_percent: summary.human_content_percent,
        confidence: summary.confidence,
        words_analyzed: summary.words_analyzed,
        risk_level: classify_risk(percent),
        risk_score: risk_score(percent),
        last_scan: scanned_at,
    };
    (detection, generate_alerts(percent))
}
