//! Error types for SDK configuration.
//!
//! This module contains error types used for configuration and validation
//! failures. All configuration constructors return `Result<T, ConfigError>`
//! to enable fail-fast validation.
//!
//! # Example
//!
//! ```rust
//! use etsy_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Etsy API keystring.")]
    EmptyApiKey,

    /// Redirect URI is invalid.
    #[error("Invalid redirect URI '{uri}'. Expected an absolute http(s) URI (e.g., 'http://localhost').")]
    InvalidRedirectUri {
        /// The invalid URI that was provided.
        uri: String,
    },

    /// Scopes are invalid.
    #[error("Invalid scopes: {reason}")]
    InvalidScopes {
        /// The reason the scopes are invalid.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A base URL override is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL without a trailing slash.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}
