//! Configuration types for the Etsy API SDK.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`EtsyConfig`]: The main configuration struct holding all SDK settings
//! - [`EtsyConfigBuilder`]: A builder for constructing [`EtsyConfig`] instances
//! - [`ApiKey`]: A validated API keystring newtype with masked debug output
//! - [`RedirectUri`]: A validated OAuth redirect URI
//!
//! All endpoint URLs default to the live Etsy v3 endpoints but can be
//! overridden, which is how the integration tests point the SDK at a local
//! mock server.
//!
//! # Example
//!
//! ```rust
//! use etsy_api::{EtsyConfig, ApiKey, RedirectUri};
//!
//! let config = EtsyConfig::builder()
//!     .api_key(ApiKey::new("my-keystring").unwrap())
//!     .redirect_uri(RedirectUri::new("http://localhost").unwrap())
//!     .scopes("listings_r listings_w shops_r".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert!(config.api_base_url().starts_with("https://api.etsy.com"));
//! ```

mod newtypes;

pub use newtypes::{ApiKey, RedirectUri};

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Default base URL for authenticated application endpoints.
const DEFAULT_API_BASE_URL: &str = "https://api.etsy.com/v3/application";

/// Default OAuth token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://api.etsy.com/v3/public/oauth/token";

/// Default OAuth authorization page (browser redirect target).
const DEFAULT_AUTH_BASE_URL: &str = "https://www.etsy.com/oauth/connect";

/// Configuration for the Etsy API SDK.
///
/// Holds the API keystring (which is also the OAuth `client_id` on Etsy),
/// the redirect URI, default scopes, and endpoint URLs.
///
/// # Thread Safety
///
/// `EtsyConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct EtsyConfig {
    api_key: ApiKey,
    redirect_uri: RedirectUri,
    scopes: AuthScopes,
    api_base_url: String,
    token_url: String,
    auth_base_url: String,
    user_agent_prefix: Option<String>,
}

impl EtsyConfig {
    /// Creates a new builder for constructing an `EtsyConfig`.
    #[must_use]
    pub fn builder() -> EtsyConfigBuilder {
        EtsyConfigBuilder::new()
    }

    /// Returns the API keystring.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the OAuth redirect URI.
    #[must_use]
    pub const fn redirect_uri(&self) -> &RedirectUri {
        &self.redirect_uri
    }

    /// Returns the default OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the base URL for authenticated application endpoints.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the OAuth token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Returns the OAuth authorization page URL.
    #[must_use]
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify EtsyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EtsyConfig>();
};

/// Builder for constructing [`EtsyConfig`] instances.
///
/// `api_key` and `redirect_uri` are required; everything else has a default.
#[derive(Debug, Default)]
pub struct EtsyConfigBuilder {
    api_key: Option<ApiKey>,
    redirect_uri: Option<RedirectUri>,
    scopes: Option<AuthScopes>,
    api_base_url: Option<String>,
    token_url: Option<String>,
    auth_base_url: Option<String>,
    user_agent_prefix: Option<String>,
}

impl EtsyConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the API keystring (required).
    #[must_use]
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the OAuth redirect URI (required).
    #[must_use]
    pub fn redirect_uri(mut self, redirect_uri: RedirectUri) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    /// Sets the default OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Overrides the application API base URL (no trailing slash).
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Overrides the OAuth token endpoint URL.
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Overrides the OAuth authorization page URL.
    #[must_use]
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Sets a prefix for the User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`EtsyConfig`], validating required fields and URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `redirect_uri` was not set, or [`ConfigError::InvalidBaseUrl`] if a
    /// URL override is not absolute or carries a trailing slash.
    pub fn build(self) -> Result<EtsyConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let redirect_uri = self.redirect_uri.ok_or(ConfigError::MissingRequiredField {
            field: "redirect_uri",
        })?;

        let api_base_url = validate_url(
            self.api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let token_url = validate_url(
            self.token_url
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        )?;
        let auth_base_url = validate_url(
            self.auth_base_url
                .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string()),
        )?;

        Ok(EtsyConfig {
            api_key,
            redirect_uri,
            scopes: self.scopes.unwrap_or_default(),
            api_base_url,
            token_url,
            auth_base_url,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

fn validate_url(url: String) -> Result<String, ConfigError> {
    if url.ends_with('/') || !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl { url });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> EtsyConfigBuilder {
        EtsyConfig::builder()
            .api_key(ApiKey::new("test-keystring").unwrap())
            .redirect_uri(RedirectUri::new("http://localhost").unwrap())
    }

    #[test]
    fn test_build_with_defaults() {
        let config = minimal_builder().build().unwrap();

        assert_eq!(config.api_base_url(), "https://api.etsy.com/v3/application");
        assert_eq!(
            config.token_url(),
            "https://api.etsy.com/v3/public/oauth/token"
        );
        assert_eq!(config.auth_base_url(), "https://www.etsy.com/oauth/connect");
        assert!(config.scopes().is_empty());
    }

    #[test]
    fn test_build_fails_without_api_key() {
        let result = EtsyConfig::builder()
            .redirect_uri(RedirectUri::new("http://localhost").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_build_fails_without_redirect_uri() {
        let result = EtsyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "redirect_uri"
            })
        ));
    }

    #[test]
    fn test_url_overrides_are_validated() {
        let ok = minimal_builder()
            .api_base_url("http://127.0.0.1:8080/v3/application")
            .build();
        assert!(ok.is_ok());

        let trailing = minimal_builder().api_base_url("http://host/v3/").build();
        assert!(matches!(trailing, Err(ConfigError::InvalidBaseUrl { .. })));

        let relative = minimal_builder().token_url("v3/public/oauth/token").build();
        assert!(matches!(relative, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_scopes_are_stored() {
        let config = minimal_builder()
            .scopes("listings_r shops_r".parse().unwrap())
            .build()
            .unwrap();

        assert!(config.scopes().contains("listings_r"));
        assert!(config.scopes().contains("shops_r"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EtsyConfig>();
    }
}
