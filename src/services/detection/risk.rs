// Risk Classification
// Maps aiContentPercent to a discrete level and a saturating numeric score

use crate::models::RiskLevel;

const HIGH_RISK_PERCENT: u8 = 70;
const MEDIUM_RISK_PERCENT: u8 = 40;

/// Both cuts are inclusive (`>=`). The alert thresholds in `alerts` are not.
pub fn classify_risk(ai_content_percent: u8) -> RiskLevel {
    if ai_content_percent >= HIGH_RISK_PERCENT {
        RiskLevel::High
    } else if ai_content_percent >= MEDIUM_RISK_PERCENT {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn risk_score(ai_content_percent: u8) -> u8 {
    ai_content_percent.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_levels() {
        let levels: Vec<RiskLevel> = [0u8, 39, 40, 69, 70, 100]
            .iter()
            .map(|&p| classify_risk(p))
            .collect();
        assert_eq!(
            levels,
            vec![
                RiskLevel::Low,
                RiskLevel::Low,
                RiskLevel::Medium,
                RiskLevel::Medium,
                RiskLevel::High,
                RiskLevel::High,
            ]
        );
    }

    #[test]
    fn test_risk_score_saturates() {
        assert_eq!(risk_score(0), 0);
        assert_eq!(risk_score(55), 55);
        assert_eq!(risk_score(100), 100);
        assert_eq!(risk_score(250), 100);
    }
}
