//! File-backed medium with xxHash3 integrity
//!
//! The whole medium lives in one JSON snapshot file:
//!
//! ```json
//! { "version": 1, "checksum": "<xxh3-64 hex>", "entries": { "key": "text" } }
//! ```
//!
//! - Checksum covers the canonical (sorted) serialization of `entries`
//! - Every mutation rewrites the snapshot via synced temp file + rename
//! - 64MB snapshot limit, checked before the file is read
//!
//! A snapshot that fails any check is refused at [`FileMedium::open`]; the
//! medium never starts from partially trusted data.

use super::{MediumError, StorageMedium, entry_size, usage_after_write};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Snapshot format version written by this release
pub const SNAPSHOT_VERSION: u32 = 1;

/// Maximum snapshot file size (64MB)
const MAX_SNAPSHOT_SIZE: u64 = 64 * 1024 * 1024;

/// On-disk snapshot of every entry
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// xxHash3-64 of the serialized entries, big-endian hex
    pub checksum: String,
    pub entries: BTreeMap<String, String>,
}

impl Snapshot {
    /// Seal entries with a fresh checksum
    pub fn seal(entries: BTreeMap<String, String>) -> Result<Self, MediumError> {
        let checksum = checksum_entries(&entries)?;
        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            checksum,
            entries,
        })
    }

    /// Validate version and checksum, returning the entries
    pub fn open(self) -> Result<BTreeMap<String, String>, MediumError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(MediumError::UnsupportedVersion(self.version));
        }

        let computed = checksum_entries(&self.entries)?;
        if computed != self.checksum {
            return Err(MediumError::Corrupted("checksum mismatch".into()));
        }

        Ok(self.entries)
    }

    /// Parse and validate snapshot bytes
    pub fn decode(bytes: &[u8]) -> Result<BTreeMap<String, String>, MediumError> {
        if bytes.len() as u64 > MAX_SNAPSHOT_SIZE {
            return Err(MediumError::SnapshotTooLarge);
        }

        let snapshot: Snapshot =
            serde_json::from_slice(bytes).map_err(|e| MediumError::Corrupted(e.to_string()))?;
        snapshot.open()
    }
}

fn checksum_entries(entries: &BTreeMap<String, String>) -> Result<String, MediumError> {
    let canonical = serde_json::to_vec(entries).map_err(|e| MediumError::Io(e.to_string()))?;
    Ok(hex::encode(xxh3_64(&canonical).to_be_bytes()))
}

/// Medium persisted to a single snapshot file
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    used_bytes: usize,
    quota: Option<usize>,
}

impl FileMedium {
    /// Open (or create) the snapshot at `path`
    ///
    /// A missing file yields an empty medium; the file is first written on the
    /// first mutation. Parent directories are created as needed.
    pub fn open(path: impl AsRef<Path>, quota: Option<usize>) -> Result<Self, MediumError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            if fs::metadata(&path)?.len() > MAX_SNAPSHOT_SIZE {
                return Err(MediumError::SnapshotTooLarge);
            }
            Snapshot::decode(&fs::read(&path)?)?
        } else {
            BTreeMap::new()
        };

        let used_bytes = entries.iter().map(|(k, v)| entry_size(k, v)).sum();

        info!(
            path = %path.display(),
            entries = entries.len(),
            used_bytes,
            "opened file storage medium"
        );

        Ok(FileMedium {
            path,
            entries,
            used_bytes,
            quota,
        })
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Rewrite the snapshot atomically
    fn persist(&self) -> Result<(), MediumError> {
        let snapshot = Snapshot::seal(self.entries.clone())?;
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| MediumError::Io(e.to_string()))?;

        if bytes.len() as u64 > MAX_SNAPSHOT_SIZE {
            return Err(MediumError::SnapshotTooLarge);
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        sync_parent_dir(&self.path)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "persisted snapshot");
        Ok(())
    }

    /// Persist, or put `key` back to `previous` if the write fails
    fn persist_or_restore(
        &mut self,
        key: &str,
        previous: Option<String>,
    ) -> Result<(), MediumError> {
        let result = self.persist();
        if let Err(err) = &result {
            warn!(key = %key, error = %err, "snapshot write failed, rolling back entry");
            match previous {
                Some(text) => {
                    self.entries.insert(key.to_string(), text);
                }
                None => {
                    self.entries.remove(key);
                }
            }
            self.used_bytes = self.entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        }
        result
    }
}

impl StorageMedium for FileMedium {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, text: String) -> Result<(), MediumError> {
        let used = usage_after_write(
            self.used_bytes,
            key,
            self.entries.get(key).map(String::as_str),
            &text,
            self.quota,
        )?;

        let previous = self.entries.insert(key.to_string(), text);
        self.used_bytes = used;
        self.persist_or_restore(key, previous)
    }

    fn delete(&mut self, key: &str) -> Result<(), MediumError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        self.used_bytes -= entry_size(key, &previous);
        self.persist_or_restore(key, Some(previous))
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), MediumError> {
        let previous = std::mem::take(&mut self.entries);
        let previous_used = std::mem::replace(&mut self.used_bytes, 0);

        if let Err(err) = self.persist() {
            warn!(error = %err, "snapshot write failed, clear rolled back");
            self.entries = previous;
            self.used_bytes = previous_used;
            return Err(err);
        }
        Ok(())
    }

    fn quota(&self) -> Option<usize> {
        self.quota
    }

    fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

/// Make a completed rename durable
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), MediumError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), MediumError> {
    Ok(())
}
