//! Credential storage seam.
//!
//! The SDK never touches ambient global storage. Tokens and in-flight PKCE
//! sessions are persisted through the [`CredentialStore`] trait, so any
//! backing works: a file, an encrypted vault, environment-backed config, or
//! the in-memory store used in tests and short-lived CLI runs.

use std::collections::HashMap;
use std::sync::Mutex;

/// A minimal string key-value store for credentials.
///
/// Implementations must be `Send + Sync`; the SDK serializes values to JSON
/// before storing them, so backings only deal in opaque strings.
pub trait CredentialStore: Send + Sync {
    /// Returns the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &str);
}

/// Storage key for the persisted OAuth token.
pub const TOKEN_KEY: &str = "oauth_token";

/// Storage key for the in-flight PKCE session.
pub const PKCE_SESSION_KEY: &str = "pkce_session";

/// An in-memory [`CredentialStore`] backed by a mutex-guarded map.
///
/// # Example
///
/// ```rust
/// use etsy_api::auth::{CredentialStore, MemoryCredentialStore};
///
/// let store = MemoryCredentialStore::new();
/// store.set("k", "v");
/// assert_eq!(store.get("k"), Some("v".to_string()));
/// store.delete("k");
/// assert!(store.get("k").is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete_round_trip() {
        let store = MemoryCredentialStore::new();

        assert!(store.get("missing").is_none());

        store.set("a", "1");
        assert_eq!(store.get("a"), Some("1".to_string()));

        store.set("a", "2");
        assert_eq!(store.get("a"), Some("2".to_string()));

        store.delete("a");
        assert!(store.get("a").is_none());

        // Deleting again is a no-op
        store.delete("a");
    }

    #[test]
    fn test_store_is_usable_behind_dyn() {
        let store: Box<dyn CredentialStore> = Box::new(MemoryCredentialStore::new());
        store.set(TOKEN_KEY, "{}");
        assert_eq!(store.get(TOKEN_KEY), Some("{}".to_string()));
    }
}
