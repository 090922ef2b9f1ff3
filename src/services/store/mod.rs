// Persistence Layer
// Key-value storage for detection data, alerts, verification record and settings

pub mod defaults;
pub mod file;
pub mod memory;
pub mod repository;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::{DetectionRepository, StoredDetectionData, ALERT_CAPACITY};

pub const KEY_DETECTION_DATA: &str = "detectionData";
pub const KEY_SECURITY_ALERTS: &str = "securityAlerts";
pub const KEY_BLOCKCHAIN_DATA: &str = "blockchainData";
pub const KEY_SETTINGS: &str = "settings";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode storage: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored value for '{key}' is malformed: {message}")]
    Malformed { key: String, message: String },
    #[error("Storage directory unavailable")]
    NoStorageDir,
}

/// Process-wide store that survives restarts when backed by disk.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values for the requested keys; absent keys are omitted.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>, StoreError>;

    /// Write all entries in one operation.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
