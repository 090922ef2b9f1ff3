// AI Content Detector Data Models
// Records exchanged between the scoring pipeline, the store and the boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::text_extractor::split_words;

// ============ Text Sample ============

/// Normalized analysis text together with its whitespace tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSample {
    normalized_text: String,
    words: Vec<String>,
}

impl TextSample {
    pub fn new(text: impl Into<String>) -> Self {
        let normalized_text = text.into();
        let words = split_words(&normalized_text);
        Self { normalized_text, words }
    }

    pub fn text(&self) -> &str {
        &self.normalized_text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// ============ Indicators ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    SentenceUniformity,
    AiPhrases,
    Formality,
    VocabularyDiversity,
    ParagraphUniformity,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::SentenceUniformity,
        IndicatorKind::AiPhrases,
        IndicatorKind::Formality,
        IndicatorKind::VocabularyDiversity,
        IndicatorKind::ParagraphUniformity,
    ];

    /// Upper bound of the partial score this indicator can contribute.
    pub fn max_contribution(self) -> f64 {
        match self {
            IndicatorKind::SentenceUniformity => 0.15,
            IndicatorKind::AiPhrases => 0.2,
            IndicatorKind::Formality => 0.1,
            IndicatorKind::VocabularyDiversity => 0.15,
            IndicatorKind::ParagraphUniformity => 0.1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::SentenceUniformity => "sentence_uniformity",
            IndicatorKind::AiPhrases => "ai_phrases",
            IndicatorKind::Formality => "formality",
            IndicatorKind::VocabularyDiversity => "vocabulary_diversity",
            IndicatorKind::ParagraphUniformity => "paragraph_uniformity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub name: IndicatorKind,
    pub contribution: f64,
}

impl IndicatorResult {
    /// Indicator did not fire.
    pub fn idle(name: IndicatorKind) -> Self {
        Self { name, contribution: 0.0 }
    }

    /// Indicator fired with its full fixed contribution.
    pub fn fired(name: IndicatorKind) -> Self {
        Self {
            name,
            contribution: name.max_contribution(),
        }
    }

    /// Indicator fired with a partial contribution, bounded by its maximum.
    pub fn partial(name: IndicatorKind, amount: f64) -> Self {
        Self {
            name,
            contribution: amount.clamp(0.0, name.max_contribution()),
        }
    }
}

/// Ordered indicator results for one sample; the sum may exceed 1 before aggregation.
pub type ScoreVector = Vec<IndicatorResult>;

// ============ Detection ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "N/A")]
    NotApplicable,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::NotApplicable => "N/A",
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Payload returned by the `analyzePage` boundary: raw detection without risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub ai_content_percent: u8,
    pub human_content_percent: u8,
    pub confidence: Confidence,
    pub words_analyzed: usize,
}

impl ScanSummary {
    /// Result for extraction that produced nothing to analyze.
    pub fn empty() -> Self {
        Self {
            ai_content_percent: 0,
            human_content_percent: 100,
            confidence: Confidence::NotApplicable,
            words_analyzed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub ai_content_percent: u8,
    pub human_content_percent: u8,
    pub confidence: Confidence,
    pub words_analyzed: usize,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
}

// ============ Alerts ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Info,
    Warning,
    Danger,
    Success,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Info => "info",
            AlertType::Warning => "warning",
            AlertType::Danger => "danger",
            AlertType::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(alert_type: AlertType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            alert_type,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ============ Settings ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSensitivity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub detection_sensitivity: DetectionSensitivity,
    pub notifications_enabled: bool,
    pub auto_scan: bool,
    pub theme: Theme,
}

// ============ Verification ============

/// Mocked content-verification record shown next to detection data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainData {
    pub status: String,
    pub hash: String,
    pub timestamp: String,
}

// ============ Events ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
}

/// Events pushed to boundary subscribers outside of request/response pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServiceEvent {
    DataUpdated { data: DetectionResult },
    Notification { notification: Notification },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_sample_tokenization() {
        let sample = TextSample::new("  The quick\tbrown \n fox  ");
        assert_eq!(sample.words(), &["The", "quick", "brown", "fox"]);
        assert_eq!(sample.word_count(), 4);
        assert!(!sample.is_empty());
        assert!(TextSample::new(" \n\t ").is_empty());
    }

    #[test]
    fn test_partial_contribution_is_bounded() {
        let r = IndicatorResult::partial(IndicatorKind::AiPhrases, 0.45);
        assert_eq!(r.contribution, 0.2);
        let r = IndicatorResult::partial(IndicatorKind::Formality, -1.0);
        assert_eq!(r.contribution, 0.0);
    }

    #[test]
    fn test_summary_serialization() {
        let json = serde_json::to_value(ScanSummary::empty()).unwrap();
        assert_eq!(json["aiContentPercent"], 0);
        assert_eq!(json["humanContentPercent"], 100);
        assert_eq!(json["confidence"], "N/A");
        assert_eq!(json["wordsAnalyzed"], 0);
    }

    #[test]
    fn test_alert_type_field_name() {
        let alert = Alert::new(AlertType::Danger, "t", "m");
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "danger");
    }

    #[test]
    fn test_service_event_tagging() {
        let event = ServiceEvent::Notification {
            notification: Notification {
                title: "x".to_string(),
                message: "y".to_string(),
                priority: NotificationPriority::High,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["notification"]["priority"], "high");
    }
}
