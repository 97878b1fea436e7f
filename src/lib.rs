//! # caro-store
//!
//! Namespaced JSON key-value persistence, SHA-256 content digests, secure random identifiers.
//!
//! Callers take canonical keys from [`StorageKey`], read and write values through a
//! [`KeyValueStore`], and derive tokens or digests with [`RandomIdGenerator`] and
//! [`HashProvider`] before persisting them.
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |:--------|:------------|:-------:|
//! | `file-medium` | Checksummed JSON snapshot file (xxHash3-64) under the user data dir | Yes |
//!
//! ## Quick Start
//!
//! ```rust
//! use caro_store::{KeyValueStore, StorageKey};
//! use serde_json::json;
//!
//! let store = KeyValueStore::in_memory();
//!
//! assert!(store.set(StorageKey::PrivacySettings, &json!({"telemetry": false})));
//! assert_eq!(
//!     store.get(StorageKey::PrivacySettings),
//!     Some(json!({"telemetry": false}))
//! );
//!
//! // Missing and corrupt entries both read as None
//! assert_eq!(store.get("never-written"), None);
//! ```
//!
//! ## Tokens and Digests
//!
//! ```rust,no_run
//! use caro_store::{HashProvider, KeyValueStore, RandomIdGenerator, StorageKey};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), caro_store::CryptoError> {
//! let ids = RandomIdGenerator::new()?; // fails only if the OS has no entropy source
//! let token = ids.generate_session_token()?;
//! let digest = HashProvider::new().hash(&token).await?;
//!
//! let store = KeyValueStore::in_memory();
//! store.set(StorageKey::AuthState, &json!({"token": token, "digest": digest}));
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Model
//!
//! - **Store operations are total**: absence and corruption read as `None`, rejected
//!   writes return `false`, nothing is retried
//! - **Opening storage can fail**: [`StoreConfig::open`] reports an unavailable or
//!   tampered medium once, at startup
//! - **No entropy fallback**: [`RandomIdGenerator::new`] fails rather than degrade

// Canonical key registry
pub mod storage_keys;
pub use storage_keys::{NAMESPACE_PREFIX, StorageKey};

// Raw key/text media
pub mod medium;
#[cfg(feature = "file-medium")]
pub use medium::FileMedium;
pub use medium::{MediumError, MemoryMedium, StorageMedium};

// JSON store
pub mod store;
pub use store::KeyValueStore;

// Metrics and observability
pub mod metrics;
pub use metrics::{StorageUsage, StoreMetrics};

// Configuration and startup
pub mod config;
pub use config::{DEFAULT_QUOTA_BYTES, MediumConfig, StoreConfig, StoreError};

// Digests and identifiers
pub mod crypto;
pub use crypto::{CryptoError, HashDigest, HashProvider, RandomIdGenerator};
