//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear
//! error messages.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated Etsy API keystring.
///
/// On Etsy v3 the API keystring doubles as the OAuth `client_id`, so this one
/// value authenticates both the application (`x-api-key` header) and the
/// authorization flow. The `Debug` implementation masks the value to prevent
/// accidental exposure in logs.
///
/// # Example
///
/// ```rust
/// use etsy_api::ApiKey;
///
/// let key = ApiKey::new("my-keystring").unwrap();
/// assert_eq!(key.as_ref(), "my-keystring");
/// assert_eq!(format!("{key:?}"), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated OAuth redirect URI.
///
/// Must be an absolute `http://` or `https://` URI. Etsy compares this value
/// byte-for-byte between the authorization request and the code exchange, so
/// it is validated once and then reused verbatim for both.
///
/// # Example
///
/// ```rust
/// use etsy_api::RedirectUri;
///
/// let uri = RedirectUri::new("http://localhost").unwrap();
/// assert_eq!(uri.as_ref(), "http://localhost");
///
/// assert!(RedirectUri::new("localhost").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectUri(String);

impl RedirectUri {
    /// Creates a new validated redirect URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRedirectUri`] if the URI is empty or
    /// does not start with `http://` or `https://`.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri = uri.into();
        if uri.is_empty() || !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return Err(ConfigError::InvalidRedirectUri { uri });
        }
        Ok(Self(uri))
    }
}

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_accepts_non_empty() {
        let key = ApiKey::new("abc123").unwrap();
        assert_eq!(key.as_ref(), "abc123");
    }

    #[test]
    fn test_api_key_rejects_empty() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret-keystring").unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "ApiKey(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_redirect_uri_accepts_http_and_https() {
        assert!(RedirectUri::new("http://localhost").is_ok());
        assert!(RedirectUri::new("https://myapp.example.com/callback").is_ok());
    }

    #[test]
    fn test_redirect_uri_rejects_relative_and_empty() {
        assert!(matches!(
            RedirectUri::new("/callback"),
            Err(ConfigError::InvalidRedirectUri { .. })
        ));
        assert!(matches!(
            RedirectUri::new(""),
            Err(ConfigError::InvalidRedirectUri { .. })
        ));
    }

    #[test]
    fn test_redirect_uri_display_round_trips() {
        let uri = RedirectUri::new("http://localhost:8080/cb").unwrap();
        assert_eq!(uri.to_string(), "http://localhost:8080/cb");
    }
}
