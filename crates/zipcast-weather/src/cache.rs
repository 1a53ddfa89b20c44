//! Generic TTL cache over the local key-value storage medium.
//!
//! Entries carry an absolute expiry computed at write time from the
//! store-wide TTL; expiry is checked lazily on read (no background
//! sweep). Storage failures degrade to "as if the cache were empty" and
//! never reach the caller.

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::KeyValueStorage;

/// Prefix keeping cache entries clear of unrelated keys (e.g. the
/// location registry) on the shared medium.
const CACHE_PREFIX: &str = "weather_cache_";

/// Storage key for the persisted TTL configuration.
const CONFIG_KEY: &str = "cache_config";

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Default TTL: 2 hours.
const DEFAULT_TTL_MS: i64 = 2 * 60 * 60 * 1000;

/// A cached payload with its write-time expiry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    /// Millisecond Unix timestamp of the write.
    stored_at: i64,
    /// stored_at + the TTL in force at write time. Invariant: > stored_at.
    expires_at: i64,
    key: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CacheConfig {
    /// Time-to-live in milliseconds, applied to writes only.
    ttl: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL_MS }
    }
}

/// Key-value cache with lazy TTL expiry.
pub struct TtlCache {
    storage: Arc<dyn KeyValueStorage>,
    config: Mutex<CacheConfig>,
}

impl TtlCache {
    /// Create a cache over `storage`, loading any persisted TTL
    /// configuration (falling back to the 2-hour default).
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let config = Self::load_config(storage.as_ref());
        Self {
            storage,
            config: Mutex::new(config),
        }
    }

    /// Store a value under `key`.
    ///
    /// Persistence failures are logged and ignored; prior state is left
    /// unchanged and the caller is never interrupted.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        let now = Utc::now().timestamp_millis();
        let ttl = self.config.lock().ttl;
        let entry = CacheEntry {
            data,
            stored_at: now,
            expires_at: now + ttl,
            key: key.to_string(),
        };

        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.storage_key(key), &serialized) {
            tracing::error!("Failed to persist cache entry {}: {:#}", key, e);
        }
    }

    /// Read a value, or `None` if missing, expired, or undecodable.
    ///
    /// An expired entry is deleted on read (lazy expiry) and never
    /// returned. Corrupted entries are treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(&self.storage_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache entry {}: {:#}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Discarding corrupted cache entry {}: {}", key, e);
                return None;
            }
        };

        if Utc::now().timestamp_millis() > entry.expires_at {
            tracing::debug!("Cache entry {} expired, removing", key);
            self.remove(key);
            return None;
        }

        Some(entry.data)
    }

    /// Delete the entry for `key` if present. Idempotent.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(&self.storage_key(key)) {
            tracing::warn!("Failed to remove cache entry {}: {:#}", key, e);
        }
    }

    /// Current TTL in hours (for display in settings).
    pub fn ttl_hours(&self) -> f64 {
        self.config.lock().ttl as f64 / MILLIS_PER_HOUR
    }

    /// Update the TTL. Takes effect for entries written after the
    /// change; existing entries keep their original expiry. Non-positive
    /// values are rejected.
    pub fn set_ttl_hours(&self, hours: f64) {
        if !hours.is_finite() || hours <= 0.0 {
            tracing::warn!("Ignoring non-positive cache TTL: {} hours", hours);
            return;
        }

        {
            let mut config = self.config.lock();
            config.ttl = (hours * MILLIS_PER_HOUR).round() as i64;
        }
        self.save_config();
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", CACHE_PREFIX, key)
    }

    fn load_config(storage: &dyn KeyValueStorage) -> CacheConfig {
        match storage.get(CONFIG_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Discarding corrupted cache config: {}", e);
                    CacheConfig::default()
                }
            },
            Ok(None) => CacheConfig::default(),
            Err(e) => {
                tracing::warn!("Failed to load cache config: {:#}", e);
                CacheConfig::default()
            }
        }
    }

    fn save_config(&self) {
        let config = *self.config.lock();
        let serialized = match serde_json::to_string(&config) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to serialize cache config: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(CONFIG_KEY, &serialized) {
            tracing::error!("Failed to persist cache config: {:#}", e);
        }
    }
}
