//! Persistent key/text media
//!
//! A medium is the raw storage a [`crate::KeyValueStore`] sits on: string keys
//! mapped to opaque text. It knows nothing about JSON.
//!
//! Two implementations ship with the crate:
//! - [`MemoryMedium`]: process-local map, mainly for tests and ephemeral sessions
//! - [`FileMedium`]: checksummed JSON snapshot on disk (feature `file-medium`)
//!
//! Both account usage as UTF-8 bytes of key plus text and reject writes that
//! would push the total past an optional quota.

#[cfg(feature = "file-medium")]
pub mod file;
#[cfg(feature = "file-medium")]
pub use file::FileMedium;

use std::collections::HashMap;
use thiserror::Error;

/// Error types for medium operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MediumError {
    #[error("quota exceeded: {requested} bytes requested, {quota} bytes allowed")]
    QuotaExceeded { requested: usize, quota: usize },

    #[error("i/o failed: {0}")]
    Io(String),

    #[error("snapshot corrupted: {0}")]
    Corrupted(String),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot exceeds maximum size")]
    SnapshotTooLarge,
}

impl From<std::io::Error> for MediumError {
    fn from(e: std::io::Error) -> Self {
        MediumError::Io(e.to_string())
    }
}

/// Key/text storage consumed by the store
pub trait StorageMedium: Send {
    /// Raw text at `key`, `None` if absent
    fn read(&self, key: &str) -> Option<String>;

    /// Write `text` under `key`, replacing any prior entry
    fn write(&mut self, key: &str, text: String) -> Result<(), MediumError>;

    /// Remove `key`; absent keys are not an error
    fn delete(&mut self, key: &str) -> Result<(), MediumError>;

    /// All keys currently stored, in no particular order
    fn keys(&self) -> Vec<String>;

    /// Remove every entry
    fn clear(&mut self) -> Result<(), MediumError>;

    /// Configured quota in bytes, if any
    fn quota(&self) -> Option<usize> {
        None
    }

    /// Bytes in use: sum of key and text lengths (UTF-8)
    fn used_bytes(&self) -> usize {
        self.keys()
            .iter()
            .map(|k| entry_size(k, self.read(k).as_deref().unwrap_or("")))
            .sum()
    }
}

impl<M: StorageMedium + ?Sized> StorageMedium for Box<M> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, text: String) -> Result<(), MediumError> {
        (**self).write(key, text)
    }

    fn delete(&mut self, key: &str) -> Result<(), MediumError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }

    fn clear(&mut self) -> Result<(), MediumError> {
        (**self).clear()
    }

    fn quota(&self) -> Option<usize> {
        (**self).quota()
    }

    fn used_bytes(&self) -> usize {
        (**self).used_bytes()
    }
}

/// Accounted size of one entry
pub(crate) fn entry_size(key: &str, text: &str) -> usize {
    key.len() + text.len()
}

/// Usage after replacing `previous` (if any) with `key` => `text`, checked against `quota`
///
/// A write that does not grow usage is always accepted, so a medium already
/// over its quota can still shrink.
pub(crate) fn usage_after_write(
    used: usize,
    key: &str,
    previous: Option<&str>,
    text: &str,
    quota: Option<usize>,
) -> Result<usize, MediumError> {
    let released = previous.map(|p| entry_size(key, p)).unwrap_or(0);
    let requested = used.saturating_sub(released) + entry_size(key, text);

    match quota {
        Some(quota) if requested > quota && requested > used => {
            Err(MediumError::QuotaExceeded { requested, quota })
        }
        _ => Ok(requested),
    }
}

/// In-process medium backed by a `HashMap`
///
/// Contents are lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
    used_bytes: usize,
    quota: Option<usize>,
}

impl MemoryMedium {
    /// Create an empty medium without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty medium rejecting writes beyond `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        MemoryMedium {
            quota: Some(quota),
            ..Self::default()
        }
    }
}

impl StorageMedium for MemoryMedium {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, text: String) -> Result<(), MediumError> {
        let previous = self.entries.get(key).map(String::as_str);
        let used = usage_after_write(self.used_bytes, key, previous, &text, self.quota)?;

        self.entries.insert(key.to_string(), text);
        self.used_bytes = used;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), MediumError> {
        if let Some(text) = self.entries.remove(key) {
            self.used_bytes -= entry_size(key, &text);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), MediumError> {
        self.entries.clear();
        self.used_bytes = 0;
        Ok(())
    }

    fn quota(&self) -> Option<usize> {
        self.quota
    }

    fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}
