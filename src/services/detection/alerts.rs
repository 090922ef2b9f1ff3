// Alert Generation
// One user-facing alert per scan, chosen by aiContentPercent

use crate::models::{Alert, AlertType};

const DANGER_ABOVE_PERCENT: u8 = 70;
const WARNING_ABOVE_PERCENT: u8 = 40;

// NOTE: exclusive cuts; at exactly 70% this yields a warning while the risk level is already high.
pub fn generate_alerts(ai_content_percent: u8) -> Vec<Alert> {
    let alert = if ai_content_percent > DANGER_ABOVE_PERCENT {
        Alert::new(
            AlertType::Danger,
            "High AI Content Detected",
            format!("{}% of the content appears to be AI-generated", ai_content_percent),
        )
    } else if ai_content_percent > WARNING_ABOVE_PERCENT {
        Alert::new(
            AlertType::Warning,
            "Moderate AI Content Detected",
            format!("{}% of the content may be AI-generated", ai_content_percent),
        )
    } else {
        Alert::new(
            AlertType::Success,
            "Low AI Content",
            "Content appears to be primarily human-written",
        )
    };

    vec![alert]
}
