// Dashboard Controller
// Caller side of a scan: derives risk and alerts, persists them, renders a snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::ServiceError;
use super::protocol::{Request, Response};
use super::router::ServiceHandle;
use crate::models::{Alert, AlertType, BlockchainData, DetectionResult, ScanSummary};
use crate::services::detection::derive_detection;
use crate::services::{Clock, DetectionRepository, StoredDetectionData};

/// What a scan should analyze.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    /// The document attached to the content analyzer
    Attached,
    Text(String),
    File(PathBuf),
}

impl ScanTarget {
    fn into_request(self) -> Request {
        match self {
            ScanTarget::Attached => Request::analyze_attached(),
            ScanTarget::Text(text) => Request::AnalyzePage {
                text: Some(text),
                path: None,
            },
            ScanTarget::File(path) => Request::AnalyzePage {
                text: None,
                path: Some(path),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub detection: DetectionResult,
    pub alerts: Vec<Alert>,
}

/// Render-ready view of the stored state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub detection: DetectionResult,
    pub risk_label: String,
    pub last_scan_label: Option<String>,
    pub alerts: Vec<Alert>,
    pub blockchain: BlockchainData,
}

pub struct DashboardController {
    handle: ServiceHandle,
    repo: DetectionRepository,
    clock: Arc<dyn Clock>,
}

impl DashboardController {
    pub fn new(handle: ServiceHandle, repo: DetectionRepository, clock: Arc<dyn Clock>) -> Self {
        Self { handle, repo, clock }
    }

    async fn send(&self, request: Request, fallback: &str) -> Result<Response, ServiceError> {
        self.handle.request(request).await?.into_result(fallback)
    }

    pub async fn scan(&self, target: ScanTarget) -> Result<ScanOutcome, ServiceError> {
        let response = self.send(target.into_request(), "Failed to scan page").await?;
        let data = response
            .data
            .ok_or_else(|| ServiceError::ScanFailed("Scan returned no data".to_string()))?;
        let summary: ScanSummary = serde_json::from_value(data)?;

        let (detection, alerts) = derive_detection(&summary, Some(self.clock.now()));

        self.send(
            Request::UpdateDetectionData {
                data: detection.clone(),
            },
            "Failed to store detection data",
        )
        .await?;
        // Insert in reverse so the first generated alert ends up newest
        for alert in alerts.iter().rev() {
            self.send(
                Request::AddSecurityAlert {
                    alert: alert.clone(),
                },
                "Failed to store alert",
            )
            .await?;
        }

        info!(
            ai_percent = detection.ai_content_percent,
            risk = detection.risk_level.as_str(),
            alerts = alerts.len(),
            "dashboard.scan_completed"
        );
        Ok(ScanOutcome { detection, alerts })
    }

    async fn stored(&self) -> Result<StoredDetectionData, ServiceError> {
        let response = self
            .send(Request::GetDetectionData, "Failed to load data")
            .await?;
        let data = response
            .data
            .ok_or_else(|| ServiceError::ScanFailed("Failed to load data".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, ServiceError> {
        let stored = self.stored().await?;
        let now = self.clock.now();

        let alerts = if stored.security_alerts.is_empty() {
            vec![Alert::new(
                AlertType::Info,
                "No threats detected",
                "Page is currently safe",
            )]
        } else {
            stored.security_alerts
        };

        Ok(DashboardSnapshot {
            risk_label: capitalize(stored.detection_data.risk_level.as_str()),
            last_scan_label: stored
                .detection_data
                .last_scan
                .map(|ts| format_timestamp(ts, now)),
            detection: stored.detection_data,
            alerts,
            blockchain: stored.blockchain_data,
        })
    }

    pub async fn export_logs(&self) -> Result<serde_json::Value, ServiceError> {
        let stored = self.stored().await?;
        Ok(json!({
            "exportDate": self.clock.now().to_rfc3339(),
            "detectionData": stored.detection_data,
            "securityAlerts": stored.security_alerts,
            "blockchainData": stored.blockchain_data,
        }))
    }

    /// Write the export as `ai-detector-logs-<millis>.json` under `dir`
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, ServiceError> {
        let export = self.export_logs().await?;
        let file = dir.join(format!(
            "ai-detector-logs-{}.json",
            self.clock.now().timestamp_millis()
        ));
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&file, serde_json::to_string_pretty(&export)?).await?;
        info!(path = %file.display(), "dashboard.exported");
        Ok(file)
    }

    /// Record a mocked verification of the current content
    pub async fn verify(&self) -> Result<BlockchainData, ServiceError> {
        let record = BlockchainData {
            status: "Verified".to_string(),
            hash: mock_hash(),
            timestamp: self.clock.now().to_rfc3339(),
        };
        self.repo.set_blockchain_data(&record).await?;
        info!(hash = %record.hash, "dashboard.verified");
        Ok(record)
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.send(Request::ClearData, "Failed to clear data").await?;
        Ok(())
    }
}

fn mock_hash() -> String {
    let hex = format!("0x{}", Uuid::new_v4().simple());
    format!("{}...", &hex[..20])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Relative label for a past instant
pub fn format_timestamp(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - ts).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}
