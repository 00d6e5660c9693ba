//! Shared-secret API key used to authenticate inbound webhooks.

use core::fmt;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// The process-wide webhook API key.
///
/// There is exactly one key at a time. Rotation replaces it immediately;
/// there is no overlap window and no key history. Keys are alphanumeric
/// only so they paste cleanly into sender configuration without ambiguous
/// symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Length of generated keys.
    pub const GENERATED_LENGTH: usize = 24;

    /// Wrap an existing key value (e.g., one loaded from the database).
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let key: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(Self::GENERATED_LENGTH)
            .map(char::from)
            .collect();
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive exact match against a presented credential.
    ///
    /// An empty stored key never matches anything; a never-configured
    /// receiver denies all requests.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        !self.0.is_empty() && self.0 == presented
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_length_and_charset() {
        let key = ApiKey::generate();
        assert_eq!(key.as_str().len(), ApiKey::GENERATED_LENGTH);
        assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(ApiKey::generate(), ApiKey::generate());
    }

    #[test]
    fn test_matches_is_exact_and_case_sensitive() {
        let key = ApiKey::new("Abc123");
        assert!(key.matches("Abc123"));
        assert!(!key.matches("abc123"));
        assert!(!key.matches("Abc1234"));
        assert!(!key.matches(""));
    }

    #[test]
    fn test_empty_key_never_matches() {
        let key = ApiKey::new("");
        assert!(!key.matches(""));
        assert!(!key.matches("anything"));
    }
}
