//! Content digests and secure random identifiers
//!
//! # Features
//! - SHA-256 content digests, 64-character lowercase hex. Not salted, not truncated.
//! - Random identifiers from the operating system CSPRNG via `ring::rand::SystemRandom`
//! - Entropy source probed once at construction; no fallback source
//!
//! Neither component retains what it produces. Callers decide whether a digest
//! or token is persisted through [`crate::KeyValueStore`].

pub mod hash;
pub mod random;

// Re-exports for convenience
pub use hash::{HashDigest, HashProvider};
pub use random::{MAX_BYTE_LENGTH, RandomIdGenerator, SESSION_TOKEN_BYTES};

use thiserror::Error;

/// Errors that can occur in digest or identifier generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CryptoError {
    #[error("Random number generation failed")]
    RngFailure,

    #[error("Invalid byte length: expected 1..={max}, got {0}", max = MAX_BYTE_LENGTH)]
    InvalidByteLength(usize),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Digest task failed: {0}")]
    DigestTaskFailed(String),
}
