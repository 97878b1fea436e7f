//! SHA-256 content digests
//!
//! [`HashProvider::hash`] is the asynchronous entry point: inside a tokio
//! runtime the digest runs on the blocking pool and the caller resumes once it
//! is ready. Polled from any other executor it digests inline.
//! [`HashProvider::digest`] is the synchronous core.

use super::CryptoError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Hex length of a SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// 256-bit digest as 64 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashDigest(String);

impl HashDigest {
    /// Parse a persisted digest
    ///
    /// Rejects anything that is not exactly 64 lowercase hex characters.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        if text.len() != DIGEST_HEX_LEN {
            return Err(CryptoError::InvalidDigest(format!(
                "expected {DIGEST_HEX_LEN} characters, got {}",
                text.len()
            )));
        }

        if !text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CryptoError::InvalidDigest(
                "expected lowercase hex characters".into(),
            ));
        }

        Ok(HashDigest(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this digest is the digest of `input`
    ///
    /// Comparison time does not depend on where the digests differ.
    pub fn matches(&self, input: &str) -> bool {
        let computed = sha256_hex(input);
        let diff = self
            .0
            .bytes()
            .zip(computed.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        self.0.len() == computed.len() && diff == 0
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HashDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for HashDigest {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for HashDigest {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<HashDigest> for String {
    fn from(digest: HashDigest) -> Self {
        digest.0
    }
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Deterministic SHA-256 digests of strings
#[derive(Debug, Clone, Copy, Default)]
pub struct HashProvider;

impl HashProvider {
    pub fn new() -> Self {
        HashProvider
    }

    /// Digest of the UTF-8 bytes of `input`, computed inline
    pub fn digest(&self, input: &str) -> HashDigest {
        HashDigest(sha256_hex(input))
    }

    /// Digest of the UTF-8 bytes of `input`, computed on the blocking pool
    ///
    /// Without a current tokio runtime the digest is computed inline.
    ///
    /// # Errors
    /// `DigestTaskFailed` if the blocking task cannot complete (runtime
    /// shutting down).
    pub async fn hash(&self, input: &str) -> Result<HashDigest, CryptoError> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return Ok(self.digest(input));
        };

        let input = input.to_owned();
        runtime
            .spawn_blocking(move || HashDigest(sha256_hex(&input)))
            .await
            .map_err(|e| CryptoError::DigestTaskFailed(e.to_string()))
    }
}
