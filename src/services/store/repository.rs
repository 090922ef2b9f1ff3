// Detection Repository
// Typed access to the stored keys with default fallbacks and the alert cap

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{
    KeyValueStore, StoreError, KEY_BLOCKCHAIN_DATA, KEY_DETECTION_DATA, KEY_SECURITY_ALERTS,
    KEY_SETTINGS,
};
use crate::models::{Alert, BlockchainData, DetectionResult, Settings};

/// Maximum number of security alerts retained, newest first.
pub const ALERT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDetectionData {
    pub detection_data: DetectionResult,
    pub security_alerts: Vec<Alert>,
    pub blockchain_data: BlockchainData,
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode_or_default<T: DeserializeOwned + Default>(
    entries: &mut HashMap<String, Value>,
    key: &str,
) -> Result<T, StoreError> {
    match entries.remove(key) {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => decode(key, value),
    }
}

#[derive(Clone)]
pub struct DetectionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl DetectionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.store
            .set(HashMap::from([(key.to_string(), value)]))
            .await
    }

    /// Write defaults for detection data and settings when absent
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let existing = self.store.get(&[KEY_DETECTION_DATA, KEY_SETTINGS]).await?;

        let mut missing = HashMap::new();
        if !existing.contains_key(KEY_DETECTION_DATA) {
            missing.insert(
                KEY_DETECTION_DATA.to_string(),
                serde_json::to_value(DetectionResult::default())?,
            );
        }
        if !existing.contains_key(KEY_SETTINGS) {
            missing.insert(
                KEY_SETTINGS.to_string(),
                serde_json::to_value(Settings::default())?,
            );
        }

        if !missing.is_empty() {
            info!(keys = missing.len(), "store.defaults_initialized");
            self.store.set(missing).await?;
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<StoredDetectionData, StoreError> {
        let mut entries = self
            .store
            .get(&[KEY_DETECTION_DATA, KEY_SECURITY_ALERTS, KEY_BLOCKCHAIN_DATA])
            .await?;

        Ok(StoredDetectionData {
            detection_data: decode_or_default(&mut entries, KEY_DETECTION_DATA)?,
            security_alerts: decode_or_default(&mut entries, KEY_SECURITY_ALERTS)?,
            blockchain_data: decode_or_default(&mut entries, KEY_BLOCKCHAIN_DATA)?,
        })
    }

    pub async fn detection_data(&self) -> Result<DetectionResult, StoreError> {
        let mut entries = self.store.get(&[KEY_DETECTION_DATA]).await?;
        decode_or_default(&mut entries, KEY_DETECTION_DATA)
    }

    pub async fn set_detection_data(&self, data: &DetectionResult) -> Result<(), StoreError> {
        self.put(KEY_DETECTION_DATA, data).await
    }

    pub async fn security_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        let mut entries = self.store.get(&[KEY_SECURITY_ALERTS]).await?;
        decode_or_default(&mut entries, KEY_SECURITY_ALERTS)
    }

    /// Insert at the front and evict beyond `ALERT_CAPACITY`; returns the stored list.
    pub async fn push_security_alert(&self, alert: Alert) -> Result<Vec<Alert>, StoreError> {
        let mut alerts = self.security_alerts().await?;
        alerts.insert(0, alert);
        alerts.truncate(ALERT_CAPACITY);
        self.put(KEY_SECURITY_ALERTS, &alerts).await?;
        Ok(alerts)
    }

    pub async fn blockchain_data(&self) -> Result<BlockchainData, StoreError> {
        let mut entries = self.store.get(&[KEY_BLOCKCHAIN_DATA]).await?;
        decode_or_default(&mut entries, KEY_BLOCKCHAIN_DATA)
    }

    pub async fn set_blockchain_data(&self, data: &BlockchainData) -> Result<(), StoreError> {
        self.put(KEY_BLOCKCHAIN_DATA, data).await
    }

    pub async fn settings(&self) -> Result<Settings, StoreError> {
        let mut entries = self.store.get(&[KEY_SETTINGS]).await?;
        decode_or_default(&mut entries, KEY_SETTINGS)
    }

    pub async fn set_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.put(KEY_SETTINGS, settings).await
    }

    /// Clear every key and restore defaults
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.initialize().await
    }
}
