use std::{path::PathBuf, time::Duration};

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::{utils, warning};

/// On-disk document wrapping a cached payload. `timestamp` is unix millis at
/// write time; `ttl` records the TTL the entry was written with (millis) and
/// is informational only, expiry on read is judged against the TTL the
/// reader supplies.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CacheEntry<T> {
    data: T,
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u64>,
}

/// Content-addressed cache: one JSON file per logical key, named by a SHA-256
/// digest of the key. The cache is a pure optimization, never a source of
/// truth. Reads degrade to a miss on any failure, writes are best-effort,
/// and concurrent writers to the same key are a benign last-writer-wins race.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Cache rooted in the user's local data directory, where all other
    /// application state lives.
    pub fn open_default() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("spomixcli/cache");
        Self::new(path)
    }

    /// Looks up `key`. Returns `None` if no entry exists, if `ttl` is given
    /// and the entry is older than it (the stale unit is deleted), or if the
    /// unit cannot be read or parsed. Errors never reach the caller.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, ttl: Option<Duration>) -> Option<T> {
        let path = self.entry_path(key);

        let content = async_fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warning!("Cache read error for {}: {}", key, e);
                return None;
            }
        };

        if let Some(ttl) = ttl {
            let age = Utc::now().timestamp_millis() - entry.timestamp;
            if age < 0 || age as u128 > ttl.as_millis() {
                // expired, drop the unit
                let _ = async_fs::remove_file(&path).await;
                return None;
            }
        }

        Some(entry.data)
    }

    /// Writes `value` under `key`, overwriting any prior entry. Best-effort:
    /// failures are logged and swallowed so a cache write can never fail the
    /// calling operation.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let entry = CacheEntry {
            data: value,
            timestamp: Utc::now().timestamp_millis(),
            ttl: ttl.map(|t| t.as_millis() as u64),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warning!("Cache serialize error for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = async_fs::create_dir_all(&self.root).await {
            warning!("Cache write error for {}: {}", key, e);
            return;
        }
        if let Err(e) = async_fs::write(self.entry_path(key), json).await {
            warning!("Cache write error for {}: {}", key, e);
        }
    }

    /// Removes the entry for `key`; an absent entry is not an error.
    pub async fn delete(&self, key: &str) {
        let _ = async_fs::remove_file(self.entry_path(key)).await;
    }

    /// Removes every entry. Maintenance tooling only, not the hot path.
    pub async fn clear(&self) {
        if let Err(e) = async_fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warning!("Cache clear error: {}", e);
                return;
            }
        }
        let _ = async_fs::create_dir_all(&self.root).await;
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", utils::cache_key_digest(key)))
    }
}
