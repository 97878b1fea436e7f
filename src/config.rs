//! Store configuration
//!
//! `StoreConfig` selects the medium and quota and is the only place where
//! opening storage can fail. An unavailable medium is reported once, here,
//! never per operation.
//!
//! ```json
//! { "medium": { "file": { "path": "/var/lib/caro/storage.json" } }, "quota_bytes": 5242880 }
//! ```

use crate::medium::{MediumError, MemoryMedium, StorageMedium};
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "file-medium")]
use crate::medium::FileMedium;

/// Default quota: the customary 5MB local-storage budget
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Errors raised while opening a store
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("storage medium unavailable: {0}")]
    MediumUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Medium(#[from] MediumError),
}

/// Which medium backs the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediumConfig {
    /// Process-local, lost on exit
    Memory,
    /// JSON snapshot file; `None` means [`default_storage_path`]
    File { path: Option<PathBuf> },
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub medium: MediumConfig,
    /// `None` disables the quota
    pub quota_bytes: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            medium: MediumConfig::File { path: None },
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }
}

impl StoreConfig {
    /// In-memory store with the default quota
    pub fn memory() -> Self {
        StoreConfig {
            medium: MediumConfig::Memory,
            ..Self::default()
        }
    }

    /// File store at `path` with the default quota
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            medium: MediumConfig::File {
                path: Some(path.into()),
            },
            ..Self::default()
        }
    }

    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Parse a JSON configuration document; missing fields take defaults
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::InvalidConfig(e.to_string()))
    }

    /// Open the configured medium and wrap it in a store
    ///
    /// # Errors
    /// - `MediumUnavailable` if no storage location can be determined, or the
    ///   binary was built without the `file-medium` feature
    /// - `Medium` if the snapshot exists but cannot be read or verified
    pub fn open(&self) -> Result<KeyValueStore<Box<dyn StorageMedium>>, StoreError> {
        let medium: Box<dyn StorageMedium> = match &self.medium {
            MediumConfig::Memory => Box::new(match self.quota_bytes {
                Some(quota) => MemoryMedium::with_quota(quota),
                None => MemoryMedium::new(),
            }),
            MediumConfig::File { path } => self.open_file(path.clone())?,
        };

        debug!(medium = ?self.medium, quota = ?self.quota_bytes, "storage opened");
        Ok(KeyValueStore::new(medium))
    }

    #[cfg(feature = "file-medium")]
    fn open_file(&self, path: Option<PathBuf>) -> Result<Box<dyn StorageMedium>, StoreError> {
        let path = match path {
            Some(path) => path,
            None => default_storage_path().ok_or_else(|| {
                StoreError::MediumUnavailable("no local data directory for this user".into())
            })?,
        };
        Ok(Box::new(FileMedium::open(path, self.quota_bytes)?))
    }

    #[cfg(not(feature = "file-medium"))]
    fn open_file(&self, _path: Option<PathBuf>) -> Result<Box<dyn StorageMedium>, StoreError> {
        Err(StoreError::MediumUnavailable(
            "file medium not compiled in (enable feature `file-medium`)".into(),
        ))
    }
}

/// `<data_local_dir>/caro/storage.json`, if the platform has a data directory
#[cfg(feature = "file-medium")]
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("caro").join("storage.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.medium, MediumConfig::File { path: None });
        assert_eq!(config.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
    }

    #[test]
    fn test_parse_memory() {
        let config = StoreConfig::from_json(r#"{"medium": "memory"}"#).unwrap();
        assert_eq!(config.medium, MediumConfig::Memory);
        assert_eq!(config.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
    }

    #[test]
    fn test_parse_file_with_quota() {
        let config = StoreConfig::from_json(
            r#"{"medium": {"file": {"path": "/tmp/caro.json"}}, "quota_bytes": 1024}"#,
        )
        .unwrap();
        assert_eq!(config, StoreConfig::file("/tmp/caro.json").with_quota(Some(1024)));
    }

    #[test]
    fn test_parse_disabled_quota() {
        let config = StoreConfig::from_json(r#"{"medium": "memory", "quota_bytes": null}"#).unwrap();
        assert_eq!(config.quota_bytes, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = StoreConfig::from_json(r#"{"medium": "floppy"}"#);
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_open_memory_enforces_quota() {
        let store = StoreConfig::memory().with_quota(Some(16)).open().unwrap();
        assert!(store.set("k", &json!("ok")));
        assert!(!store.set("k", &json!("x".repeat(32))));
        assert_eq!(store.usage().quota, Some(16));
    }

    #[cfg(feature = "file-medium")]
    #[test]
    fn test_open_file_reports_corrupt_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();

        let result = StoreConfig::file(&path).open();
        assert!(matches!(
            result,
            Err(StoreError::Medium(MediumError::Corrupted(_)))
        ));
    }

    #[cfg(feature = "file-medium")]
    #[test]
    fn test_default_path_layout() {
        if let Some(path) = default_storage_path() {
            assert!(path.ends_with("caro/storage.json"));
        }
    }
}
