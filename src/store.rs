//! Namespaced JSON key-value store
//!
//! Values go in as anything `Serialize` and come back as `serde_json::Value`
//! (or a typed `DeserializeOwned`). Every operation is total:
//! - missing or undecodable entries read as `None`
//! - rejected writes (serialization, quota, I/O) return `false`
//! - removing or clearing absent data is a no-op
//!
//! Failures are logged through `tracing` and counted in [`StoreMetrics`];
//! none of them reach the caller as an error.
//!
//! The store takes its medium by value, so `clear()` wipes exactly the entries
//! this store can see. Use [`KeyValueStore::clear_prefix`] to drop one
//! namespace only.

use crate::medium::{MediumError, MemoryMedium, StorageMedium};
use crate::metrics::{StorageUsage, StoreMetrics};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, warn};

/// JSON key-value store over a [`StorageMedium`]
pub struct KeyValueStore<M: StorageMedium = MemoryMedium> {
    medium: Mutex<M>,
    /// Cumulative counters (interior mutability for observability)
    metrics: Mutex<StoreMetrics>,
}

impl KeyValueStore<MemoryMedium> {
    /// Store backed by a fresh in-memory medium
    pub fn in_memory() -> Self {
        Self::new(MemoryMedium::new())
    }
}

impl<M: StorageMedium> KeyValueStore<M> {
    /// Create a store owning `medium`
    pub fn new(medium: M) -> Self {
        KeyValueStore {
            medium: Mutex::new(medium),
            metrics: Mutex::new(StoreMetrics::new()),
        }
    }

    /// Give the medium back, e.g. to reopen it elsewhere
    pub fn into_inner(self) -> M {
        self.medium
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serialize `value` as JSON and store it under `key`
    ///
    /// Returns `false` if serialization fails or the medium rejects the write;
    /// the previous value (if any) is then left untouched.
    pub fn set<T: Serialize + ?Sized>(&self, key: impl AsRef<str>, value: &T) -> bool {
        let key = key.as_ref();

        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(err) => {
                warn!(key = %key, error = %err, "value not serializable, write rejected");
                self.record(|m| m.rejected_writes += 1);
                return false;
            }
        };

        match self.with_medium(|medium| medium.write(key, text)) {
            Some(Ok(())) => {
                self.record(|m| m.writes += 1);
                true
            }
            Some(Err(err)) => {
                log_rejected_write(key, &err);
                self.record(|m| m.rejected_writes += 1);
                false
            }
            None => {
                self.record(|m| m.rejected_writes += 1);
                false
            }
        }
    }

    /// Parsed JSON at `key`, or `None` if absent or not valid JSON
    pub fn get(&self, key: impl AsRef<str>) -> Option<Value> {
        self.get_as(key)
    }

    /// Typed read; text that does not decode into `T` is treated as absent
    pub fn get_as<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Option<T> {
        let key = key.as_ref();

        let Some(text) = self.with_medium(|medium| medium.read(key)).flatten() else {
            self.record(|m| m.misses += 1);
            return None;
        };

        match serde_json::from_str(&text) {
            Ok(value) => {
                self.record(|m| m.hits += 1);
                Some(value)
            }
            Err(err) => {
                debug!(key = %key, error = %err, "stored entry not decodable, treating as absent");
                self.record(|m| m.corrupt_reads += 1);
                None
            }
        }
    }

    /// Whether an entry exists at `key` (decodable or not)
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        self.with_medium(|medium| medium.read(key).is_some()).unwrap_or(false)
    }

    /// Delete `key` if present
    pub fn remove(&self, key: impl AsRef<str>) {
        let key = key.as_ref();

        let removed = self.with_medium(|medium| {
            let existed = medium.read(key).is_some();
            medium.delete(key).map(|()| existed)
        });

        match removed {
            Some(Ok(true)) => self.record(|m| m.removals += 1),
            Some(Ok(false)) | None => {}
            Some(Err(err)) => warn!(key = %key, error = %err, "remove failed"),
        }
    }

    /// Delete every entry in this store's medium
    pub fn clear(&self) {
        if let Some(Err(err)) = self.with_medium(|medium| medium.clear()) {
            warn!(error = %err, "clear failed");
            return;
        }
        self.record(|m| m.clears += 1);
    }

    /// Delete entries whose key starts with `prefix`, returning how many were removed
    pub fn clear_prefix(&self, prefix: &str) -> usize {
        let removed = self
            .with_medium(|medium| {
                let mut removed = 0;
                for key in medium.keys().into_iter().filter(|k| k.starts_with(prefix)) {
                    match medium.delete(&key) {
                        Ok(()) => removed += 1,
                        Err(err) => warn!(key = %key, error = %err, "remove failed"),
                    }
                }
                removed
            })
            .unwrap_or(0);

        self.record(|m| m.clears += 1);
        removed
    }

    /// Approximate bytes in use
    ///
    /// Sum over entries of the UTF-8 byte length of the key plus the UTF-8
    /// byte length of the serialized JSON. Not the medium's physical footprint.
    pub fn get_size(&self) -> usize {
        self.with_medium(|medium| medium.used_bytes()).unwrap_or(0)
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.with_medium(|medium| medium.keys()).unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.with_medium(|medium| medium.keys().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of cumulative operation counters
    pub fn metrics(&self) -> StoreMetrics {
        self.metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_else(|_| StoreMetrics::new())
    }

    /// Current usage against the medium's quota
    pub fn usage(&self) -> StorageUsage {
        self.with_medium(|medium| StorageUsage {
            entries: medium.keys().len(),
            bytes: medium.used_bytes(),
            quota: medium.quota(),
        })
        .unwrap_or(StorageUsage {
            entries: 0,
            bytes: 0,
            quota: None,
        })
    }

    /// Run `f` under the medium lock; `None` if the lock is poisoned
    fn with_medium<R>(&self, f: impl FnOnce(&mut M) -> R) -> Option<R> {
        match self.medium.lock() {
            Ok(mut medium) => Some(f(&mut *medium)),
            Err(_) => {
                warn!("storage medium lock poisoned");
                None
            }
        }
    }

    fn record(&self, update: impl FnOnce(&mut StoreMetrics)) {
        if let Ok(mut metrics) = self.metrics.lock() {
            update(&mut *metrics);
        }
    }
}

impl Default for KeyValueStore<MemoryMedium> {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn log_rejected_write(key: &str, err: &MediumError) {
    match err {
        MediumError::QuotaExceeded { requested, quota } => {
            warn!(key = %key, requested, quota, "storage quota exceeded, write rejected");
        }
        _ => warn!(key = %key, error = %err, "medium rejected write"),
    }
}
