// User-facing notification sinks

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::models::{Notification, NotificationPriority, ServiceEvent};

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.priority {
            NotificationPriority::High => warn!(
                title = %notification.title,
                message = %notification.message,
                "notification"
            ),
            NotificationPriority::Normal => info!(
                title = %notification.title,
                message = %notification.message,
                "notification"
            ),
        }
    }
}

/// Publishes notifications to boundary subscribers as `ServiceEvent`s.
#[derive(Debug, Clone)]
pub struct EventNotifier {
    events: broadcast::Sender<ServiceEvent>,
}

impl EventNotifier {
    pub fn new(events: broadcast::Sender<ServiceEvent>) -> Self {
        Self { events }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        // No subscribers is not an error
        let _ = self.events.send(ServiceEvent::Notification { notification });
    }
}
