//! Key-value preferences that survive restarts.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::{config::Config, error::PreferenceError};

/// Key under which the last committed city name is stored.
pub const LAST_CITY_KEY: &str = "city";

#[async_trait]
pub trait PreferenceStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as a flat JSON object in a single file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: RwLock<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: RwLock::new(()) }
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self, PreferenceError> {
        let dirs = Config::project_dirs().map_err(|_| PreferenceError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, PreferenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.read().await;
        let mut all = self.read_all().await?;
        Ok(all.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.write().await;
        // A corrupt file is rewritten from scratch rather than blocking every later write.
        let mut all = match self.read_all().await {
            Err(PreferenceError::Format(err)) => {
                warn!(path = %self.path.display(), error = %err, "discarding unreadable preferences");
                HashMap::new()
            }
            other => other?,
        };
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&all)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Process-local preferences; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let values = HashMap::from([(key.to_string(), value.to_string())]);
        Self { values: RwLock::new(values) }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
