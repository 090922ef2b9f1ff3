// Canonical default values for every stored key.
// Callers rely on these impls instead of redefining fallbacks.

use crate::models::{
    BlockchainData, Confidence, DetectionResult, DetectionSensitivity, RiskLevel, Settings, Theme,
};

/// Risk bar value shown before the first scan.
pub const DEFAULT_RISK_SCORE: u8 = 10;

impl Default for DetectionResult {
    fn default() -> Self {
        Self {
            ai_content_percent: 0,
            human_content_percent: 100,
            confidence: Confidence::NotApplicable,
            words_analyzed: 0,
            risk_level: RiskLevel::Low,
            risk_score: DEFAULT_RISK_SCORE,
            last_scan: None,
        }
    }
}

impl Default for BlockchainData {
    fn default() -> Self {
        Self {
            status: "Not Verified".to_string(),
            hash: "--".to_string(),
            timestamp: "--".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detection_sensitivity: DetectionSensitivity::Medium,
            notifications_enabled: true,
            auto_scan: false,
            theme: Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detection_data() {
        let d = DetectionResult::default();
        assert_eq!(d.ai_content_percent + d.human_content_percent, 100);
        assert_eq!(d.confidence, Confidence::NotApplicable);
        assert_eq!(d.risk_score, 10);
        assert!(d.last_scan.is_none());
    }

    #[test]
    fn test_default_settings_json() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["detectionSensitivity"], "medium");
        assert_eq!(json["notificationsEnabled"], true);
        assert_eq!(json["autoScan"], false);
        assert_eq!(json["theme"], "light");
    }
}
