//! Secure random identifiers
//!
//! Bytes come from `ring::rand::SystemRandom` (getrandom / OS CSPRNG) and are
//! hex encoded, so a request for `n` bytes yields `2n` characters. The raw
//! bytes are zeroized once encoded.

use super::CryptoError;
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use zeroize::Zeroizing;

/// Largest single request (bytes)
pub const MAX_BYTE_LENGTH: usize = 65_536;

/// Entropy in a session token (256 bits)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Hex identifiers from the operating system CSPRNG
pub struct RandomIdGenerator {
    rng: SystemRandom,
}

impl RandomIdGenerator {
    /// Create a generator, probing the entropy source once
    ///
    /// # Errors
    /// `RngFailure` if the operating system cannot supply random bytes. This
    /// is a fatal configuration error; there is no weaker fallback.
    pub fn new() -> Result<Self, CryptoError> {
        let rng = SystemRandom::new();
        let mut probe = Zeroizing::new([0u8; 1]);
        rng.fill(&mut probe[..])
            .map_err(|_| CryptoError::RngFailure)?;
        Ok(RandomIdGenerator { rng })
    }

    /// Random hex string of length `2 * byte_length`
    ///
    /// # Errors
    /// - `InvalidByteLength` if `byte_length` is 0 or exceeds [`MAX_BYTE_LENGTH`]
    /// - `RngFailure` if the entropy source fails
    pub fn generate_random_string(&self, byte_length: usize) -> Result<String, CryptoError> {
        if byte_length == 0 || byte_length > MAX_BYTE_LENGTH {
            return Err(CryptoError::InvalidByteLength(byte_length));
        }

        let mut bytes = Zeroizing::new(vec![0u8; byte_length]);
        self.rng
            .fill(&mut bytes[..])
            .map_err(|_| CryptoError::RngFailure)?;

        Ok(hex::encode(&bytes[..]))
    }

    /// 256-bit token for authentication state
    pub fn generate_session_token(&self) -> Result<String, CryptoError> {
        self.generate_random_string(SESSION_TOKEN_BYTES)
    }
}

impl fmt::Debug for RandomIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomIdGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_lower_hex(s: &str) -> bool {
        s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    #[test]
    fn test_length_is_twice_byte_length() {
        let generator = RandomIdGenerator::new().unwrap();
        for n in [1, 16, 32, 100] {
            let s = generator.generate_random_string(n).unwrap();
            assert_eq!(s.len(), 2 * n);
            assert!(is_lower_hex(&s));
        }
    }

    #[test]
    fn test_independent_calls_differ() {
        let generator = RandomIdGenerator::new().unwrap();
        let a = generator.generate_random_string(32).unwrap();
        let b = generator.generate_random_string(32).unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_length_rejected() {
        let generator = RandomIdGenerator::new().unwrap();
        assert_eq!(
            generator.generate_random_string(0),
            Err(CryptoError::InvalidByteLength(0))
        );
    }

    #[test]
    fn test_oversized_request_rejected() {
        let generator = RandomIdGenerator::new().unwrap();
        assert!(generator.generate_random_string(MAX_BYTE_LENGTH).is_ok());
        assert_eq!(
            generator.generate_random_string(MAX_BYTE_LENGTH + 1),
            Err(CryptoError::InvalidByteLength(MAX_BYTE_LENGTH + 1))
        );
    }

    #[test]
    fn test_session_tokens_unique() {
        let generator = RandomIdGenerator::new().unwrap();
        let tokens: HashSet<String> = (0..1000)
            .map(|_| generator.generate_session_token().unwrap())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }
}
