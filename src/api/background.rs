// Background Service
// Owns persisted state and answers the administrative actions

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::error::ServiceError;
use super::protocol::{Request, Response};
use crate::models::{
    Alert, DetectionResult, Notification, NotificationPriority, RiskLevel, ServiceEvent, Settings,
};
use crate::services::{DetectionRepository, Notifier};

pub struct BackgroundService {
    repo: DetectionRepository,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<ServiceEvent>,
}

impl BackgroundService {
    pub fn new(
        repo: DetectionRepository,
        notifier: Arc<dyn Notifier>,
        events: broadcast::Sender<ServiceEvent>,
    ) -> Self {
        Self {
            repo,
            notifier,
            events,
        }
    }

    /// Seed defaults for keys that have never been written
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        self.repo.initialize().await?;
        info!("background.initialized");
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events.subscribe()
    }

    pub async fn handle(&self, request: Request) -> Result<Response, ServiceError> {
        match request {
            Request::GetDetectionData => {
                let snapshot = self.repo.snapshot().await?;
                Response::with_data(&snapshot)
            }
            Request::UpdateDetectionData { data } => {
                self.update_detection_data(data).await?;
                Ok(Response::ok())
            }
            Request::AddSecurityAlert { alert } => {
                self.add_security_alert(alert).await?;
                Ok(Response::ok())
            }
            Request::GetSettings => Ok(Response::with_settings(self.repo.settings().await?)),
            Request::UpdateSettings { settings } => {
                self.update_settings(settings).await?;
                Ok(Response::ok())
            }
            Request::ClearData => {
                self.repo.reset().await?;
                info!("background.data_cleared");
                Ok(Response::ok())
            }
            // Page analysis belongs to the content analyzer
            Request::AnalyzePage { .. } => Err(ServiceError::UnknownAction("analyzePage".to_string())),
        }
    }

    async fn update_detection_data(&self, data: DetectionResult) -> Result<(), ServiceError> {
        self.repo.set_detection_data(&data).await?;
        info!(
            ai_percent = data.ai_content_percent,
            risk = data.risk_level.as_str(),
            "background.detection_updated"
        );

        let _ = self.events.send(ServiceEvent::DataUpdated { data: data.clone() });
        self.check_and_notify(&data).await
    }

    async fn add_security_alert(&self, alert: Alert) -> Result<(), ServiceError> {
        let stored = self.repo.push_security_alert(alert).await?;
        info!(alerts = stored.len(), "background.alert_added");
        Ok(())
    }

    async fn update_settings(&self, settings: Settings) -> Result<(), ServiceError> {
        self.repo.set_settings(&settings).await?;
        info!(
            notifications = settings.notifications_enabled,
            "background.settings_updated"
        );
        Ok(())
    }

    async fn check_and_notify(&self, data: &DetectionResult) -> Result<(), ServiceError> {
        if data.risk_level != RiskLevel::High {
            return Ok(());
        }
        let settings = self.repo.settings().await?;
        if !settings.notifications_enabled {
            warn!(ai_percent = data.ai_content_percent, "background.high_risk_muted");
            return Ok(());
        }

        self.notifier.notify(Notification {
            title: "High AI Content Detected".to_string(),
            message: format!(
                "{}% of the content appears to be AI-generated",
                data.ai_content_percent
            ),
            priority: NotificationPriority::High,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertType, Confidence};
    use crate::services::{MemoryStore, StoredDetectionData, ALERT_CAPACITY};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    fn service() -> (BackgroundService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let (events, _) = broadcast::channel(8);
        let repo = DetectionRepository::new(Arc::new(MemoryStore::new()));
        (BackgroundService::new(repo, notifier.clone(), events), notifier)
    }

    fn detection(percent: u8, risk_level: RiskLevel) -> DetectionResult {
        DetectionResult {
            ai_content_percent: percent,
            human_content_percent: 100 - percent,
            confidence: Confidence::High,
            words_analyzed: 300,
            risk_level,
            risk_score: percent,
            last_scan: None,
        }
    }

    #[tokio::test]
    async fn test_get_detection_data_defaults() {
        let (svc, _) = service();
        svc.initialize().await.unwrap();
        let resp = svc.handle(Request::GetDetectionData).await.unwrap();
        let stored: StoredDetectionData = serde_json::from_value(resp.data.unwrap()).unwrap();
        assert_eq!(stored.detection_data, DetectionResult::default());
        assert!(stored.security_alerts.is_empty());
        assert_eq!(stored.blockchain_data.status, "Not Verified");
    }

    #[tokio::test]
    async fn test_high_risk_update_notifies() {
        let (svc, notifier) = service();
        let mut rx = svc.subscribe();
        svc.handle(Request::UpdateDetectionData {
            data: detection(82, RiskLevel::High),
        })
        .await
        .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "High AI Content Detected");
        assert_eq!(sent[0].message, "82% of the content appears to be AI-generated");
        drop(sent);

        assert!(matches!(
            rx.recv().await.unwrap(),
            ServiceEvent::DataUpdated { data } if data.ai_content_percent == 82
        ));
    }

    #[tokio::test]
    async fn test_no_notification_below_high_or_when_disabled() {
        let (svc, notifier) = service();
        svc.handle(Request::UpdateDetectionData {
            data: detection(55, RiskLevel::Medium),
        })
        .await
        .unwrap();

        let mut settings = Settings::default();
        settings.notifications_enabled = false;
        svc.handle(Request::UpdateSettings { settings }).await.unwrap();
        svc.handle(Request::UpdateDetectionData {
            data: detection(90, RiskLevel::High),
        })
        .await
        .unwrap();

        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_security_alert_caps_history() {
        let (svc, _) = service();
        for n in 0..11 {
            svc.handle(Request::AddSecurityAlert {
                alert: Alert::new(AlertType::Info, format!("#{}", n), "m"),
            })
            .await
            .unwrap();
        }
        let resp = svc.handle(Request::GetDetectionData).await.unwrap();
        let stored: StoredDetectionData = serde_json::from_value(resp.data.unwrap()).unwrap();
        assert_eq!(stored.security_alerts.len(), ALERT_CAPACITY);
        assert_eq!(stored.security_alerts[0].title, "#10");
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_clear() {
        let (svc, _) = service();
        let mut settings = Settings::default();
        settings.auto_scan = true;
        svc.handle(Request::UpdateSettings { settings: settings.clone() })
            .await
            .unwrap();
        let resp = svc.handle(Request::GetSettings).await.unwrap();
        assert_eq!(resp.settings, Some(settings));

        svc.handle(Request::ClearData).await.unwrap();
        let resp = svc.handle(Request::GetSettings).await.unwrap();
        assert_eq!(resp.settings, Some(Settings::default()));
    }

    #[tokio::test]
    async fn test_analyze_page_is_not_handled_here() {
        let (svc, _) = service();
        let err = svc.handle(Request::analyze_attached()).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownAction(_)));
    }
}
