// JSON File Store
// Persists the key-value map to disk as one pretty JSON document

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::{KeyValueStore, StoreError};

const STORAGE_FILE: &str = "storage.json";

pub struct JsonFileStore {
    storage_dir: PathBuf,
    storage_file: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(storage_dir: PathBuf) -> Self {
        let storage_file = storage_dir.join(STORAGE_FILE);
        Self {
            storage_dir,
            storage_file,
            lock: Mutex::new(()),
        }
    }

    /// Get default storage directory
    pub fn default_storage_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("ai-detector"))
    }

    pub fn storage_file(&self) -> &Path {
        &self.storage_file
    }

    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        if !fs::try_exists(&self.storage_file).await? {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.storage_file).await?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Malformed {
                key: STORAGE_FILE.to_string(),
                message: format!("expected object, found {}", json_kind(&other)),
            }),
        }
    }

    async fn save(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.storage_dir).await?;

        let content = serde_json::to_string_pretty(map)?;
        let tmp = self.storage_file.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.storage_file).await?;
        debug!(path = %self.storage_file.display(), keys = map.len(), "store.saved");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let map = self.load().await?;
        Ok(keys
            .iter()
            .filter_map(|k| map.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.extend(entries);
        self.save(&map).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.save(&Map::new()).await
    }
}
