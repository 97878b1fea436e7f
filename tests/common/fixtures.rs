//! Test fixtures for caro-store tests.
//!
//! Typed records mirroring what the application persists under each canonical
//! key, plus helpers for building stores on temporary files.

#![allow(dead_code)]

#[cfg(feature = "file-medium")]
use caro_store::{FileMedium, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub token: String,
    pub token_digest: String,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub telemetry: bool,
    pub crash_reports: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCommand {
    pub prompt: String,
    pub command: String,
    pub shell: String,
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        id: "user-42".into(),
        display_name: "Ada 世界 🚀".into(),
        email: None,
    }
}

pub fn sample_commands() -> Vec<LocalCommand> {
    vec![
        LocalCommand {
            prompt: "list files by size".into(),
            command: "ls -lS".into(),
            shell: "bash".into(),
        },
        LocalCommand {
            prompt: "find rust sources".into(),
            command: "find . -name '*.rs'".into(),
            shell: "zsh".into(),
        },
    ]
}

// ============================================================================
// Helpers
// ============================================================================

/// Temp dir plus the snapshot path inside it; keep the dir alive for the test
pub fn temp_snapshot() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("storage.json");
    (dir, path)
}

/// File-backed store without a quota
#[cfg(feature = "file-medium")]
pub fn file_store(path: &Path) -> KeyValueStore<FileMedium> {
    KeyValueStore::new(FileMedium::open(path, None).expect("open file medium"))
}

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
