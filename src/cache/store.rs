//! Cache store implementations

use crate::cache::StoredEntry;
use crate::core::path::ensure_dir;
use crate::core::{TagwatchError, TagwatchResult};
use crate::di::traits::CacheStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::sync::RwLock;

/// Process-local store backed by a map
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> TagwatchResult<Option<StoredEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> TagwatchResult<()> {
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> TagwatchResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> TagwatchResult<usize> {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        Ok(count)
    }
}

/// On-disk record: the entry plus its full key, so hash collisions read as misses
#[derive(Serialize, Deserialize)]
struct FileRecord {
    key: String,
    entry: StoredEntry,
}

/// Store keeping one JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: PathBuf) -> TagwatchResult<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the entry for `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", Self::key_hash(key)))
    }

    /// Temp file for one write. Unique per process and per write, so
    /// concurrent writers of the same key never share it.
    fn tmp_path(&self, path: &Path) -> PathBuf {
        static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq))
    }

    /// Hash a key for use as a filename
    fn key_hash(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        hex::encode(&hash[..16]) // Use first 16 bytes for shorter filename
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> TagwatchResult<Option<StoredEntry>> {
        let path = self.entry_path(key);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TagwatchError::Cache(format!(
                    "Failed to read from cache: {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<FileRecord>(&data) {
            Ok(record) if record.key == key => Ok(Some(record.entry)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt cache file");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> TagwatchResult<()> {
        let path = self.entry_path(key);
        let record = FileRecord {
            key: key.to_string(),
            entry,
        };
        let data = serde_json::to_vec(&record)?;

        fs::create_dir_all(&self.root).await?;

        // Write then rename so readers never see a partial file
        let tmp_path = self.tmp_path(&path);
        fs::write(&tmp_path, &data).await.map_err(|e| {
            TagwatchError::Cache(format!(
                "Failed to write to cache: {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        fs::rename(&tmp_path, &path).await.map_err(|e| {
            TagwatchError::Cache(format!(
                "Failed to write to cache: {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> TagwatchResult<()> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> TagwatchResult<usize> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Err(e) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove cache file");
            } else {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
