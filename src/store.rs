use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error};
use tokio::sync::{Mutex, RwLock};

use crate::share::ShareRecord;

type ShareMap = BTreeMap<String, ShareRecord>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access share database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode share database: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Keyed persistence for share snapshots.
#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ShareRecord>, StoreError>;

    async fn put(&self, id: &str, record: ShareRecord) -> Result<(), StoreError>;
}

/// A single JSON object on disk mapping share id to record.
///
/// The whole file is read on every lookup and rewritten on every insert.
/// A rewrite goes to a sibling temp file that is then renamed over the
/// database, so readers never see a half-written file. Writers inside this
/// process take `write_lock` so they do not clobber each other; other
/// processes writing the same file are not coordinated.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<ShareMap, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ShareMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(ShareMap::new());
        }

        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                error!("Failed to parse share database {}: {}", self.path.display(), e);
                Ok(ShareMap::new())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Callers hold `write_lock`, which keeps the temp path private to one writer.
    async fn save(&self, map: &ShareMap) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(map)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|source| StoreError::Io {
                path: temp.clone(),
                source,
            })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl ShareStore for JsonFileStore {
    async fn get(&self, id: &str) -> Result<Option<ShareRecord>, StoreError> {
        let mut map = self.load().await?;
        Ok(map.remove(id))
    }

    async fn put(&self, id: &str, record: ShareRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.insert(id.to_string(), record);
        self.save(&map).await?;
        debug!("Stored share {} ({} total)", id, map.len());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    shares: RwLock<ShareMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<ShareRecord>, StoreError> {
        Ok(self.shares.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, record: ShareRecord) -> Result<(), StoreError> {
        self.shares.write().await.insert(id.to_string(), record);
        Ok(())
    }
}
