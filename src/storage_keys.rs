//! Canonical storage keys
//!
//! Every value the application persists lives under one of these keys. The
//! strings are part of the on-disk contract: data written by earlier releases
//! is found again only if they stay byte-for-byte identical.
//!
//! Format: `prefix:category:name`, with the shared prefix [`NAMESPACE_PREFIX`].

use std::fmt;

/// Shared namespace token for every canonical key
pub const NAMESPACE_PREFIX: &str = "caro";

/// Logical names for the values persisted through [`crate::KeyValueStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Authentication state (session token, expiry)
    AuthState,
    /// Signed-in user profile
    UserProfile,
    /// Telemetry and privacy preferences
    PrivacySettings,
    /// Commands saved locally by the user
    LocalCommands,
}

impl StorageKey {
    /// Every canonical key, in declaration order
    pub const ALL: [StorageKey; 4] = [
        StorageKey::AuthState,
        StorageKey::UserProfile,
        StorageKey::PrivacySettings,
        StorageKey::LocalCommands,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AuthState => "caro:auth:state",
            StorageKey::UserProfile => "caro:user:profile",
            StorageKey::PrivacySettings => "caro:privacy:settings",
            StorageKey::LocalCommands => "caro:local:commands",
        }
    }

    /// Category segment (`auth`, `user`, ...)
    pub fn category(&self) -> &'static str {
        match self {
            StorageKey::AuthState => "auth",
            StorageKey::UserProfile => "user",
            StorageKey::PrivacySettings => "privacy",
            StorageKey::LocalCommands => "local",
        }
    }

    /// Reverse lookup from a canonical string
    pub fn from_canonical(key: &str) -> Option<StorageKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Whether `key` carries the shared namespace prefix
    pub fn is_namespaced(key: &str) -> bool {
        key.strip_prefix(NAMESPACE_PREFIX)
            .is_some_and(|rest| rest.starts_with(':'))
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(StorageKey::AuthState.as_str(), "caro:auth:state");
        assert_eq!(StorageKey::UserProfile.as_str(), "caro:user:profile");
        assert_eq!(StorageKey::PrivacySettings.as_str(), "caro:privacy:settings");
        assert_eq!(StorageKey::LocalCommands.as_str(), "caro:local:commands");
    }

    #[test]
    fn test_keys_are_distinct() {
        let unique: HashSet<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(unique.len(), StorageKey::ALL.len());
    }

    #[test]
    fn test_keys_follow_prefix_category_name() {
        for key in StorageKey::ALL {
            let segments: Vec<&str> = key.as_str().split(':').collect();
            assert_eq!(segments.len(), 3, "{key} should have three segments");
            assert_eq!(segments[0], NAMESPACE_PREFIX);
            assert_eq!(segments[1], key.category());
            assert!(!segments[2].is_empty());
        }
    }

    #[test]
    fn test_reverse_lookup() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_canonical(key.as_str()), Some(key));
        }
        assert_eq!(StorageKey::from_canonical("caro:auth"), None);
        assert_eq!(StorageKey::from_canonical("other:auth:state"), None);
    }

    #[test]
    fn test_namespace_detection() {
        assert!(StorageKey::is_namespaced("caro:auth:state"));
        assert!(StorageKey::is_namespaced("caro:custom"));
        assert!(!StorageKey::is_namespaced("carousel:item"));
        assert!(!StorageKey::is_namespaced("test-key"));
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(StorageKey::UserProfile.to_string(), "caro:user:profile");
        assert_eq!(StorageKey::LocalCommands.as_ref(), "caro:local:commands");
    }
}
