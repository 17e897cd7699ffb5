//! Error types for authenticated API requests.
//!
//! The request executor classifies every non-2xx response into a variant of
//! [`ApiError`], so callers can distinguish at the type level between
//! conditions that need a new authorization ([`ApiError::Auth`]), a scope
//! grant ([`ApiError::InsufficientScope`]), a fixed request
//! ([`ApiError::BadRequest`]), and transient conditions the executor already
//! retried ([`ApiError::RateLimitExceeded`], [`ApiError::UpstreamService`]).
//!
//! # Example
//!
//! ```rust,ignore
//! match client.send(request).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(ApiError::InsufficientScope { message }) => {
//!         println!("Re-authorize with more scopes: {message}");
//!     }
//!     Err(ApiError::RateLimitExceeded { tries, .. }) => {
//!         println!("Still throttled after {tries} tries");
//!     }
//!     Err(other) => return Err(other.into()),
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthError;

/// Error returned when an [`ApiRequest`](crate::clients::ApiRequest) fails
/// validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidApiRequestError {
    /// A POST, PUT, or PATCH request was built without a payload.
    #[error("Cannot use {method} without a payload.")]
    MissingPayload {
        /// The HTTP method that requires a payload.
        method: String,
    },

    /// A GET or DELETE request was built with a payload.
    #[error("Cannot send a payload with {method}.")]
    UnexpectedPayload {
        /// The HTTP method that forbids a payload.
        method: String,
    },

    /// The request path does not start with `/`.
    #[error("Request path must start with '/': {path}")]
    RelativePath {
        /// The offending path.
        path: String,
    },
}

/// Unified error type for authenticated API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token lifecycle failure: not authenticated, refresh rejected, or a
    /// credential store problem.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request validation failed before anything was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidApiRequestError),

    /// 401 that survived a forced token refresh and one retry.
    #[error("Authentication rejected (401): {message}")]
    Authentication {
        /// Remote error text, verbatim.
        message: String,
    },

    /// 403: the token is valid but was not granted the required scope.
    /// Retrying cannot help; the user must re-authorize with more scopes.
    #[error("Insufficient OAuth scope (403): {message}")]
    InsufficientScope {
        /// Remote error text, verbatim.
        message: String,
    },

    /// 400: the request itself is malformed.
    #[error("Bad request (400): {message}")]
    BadRequest {
        /// Remote error text, verbatim.
        message: String,
    },

    /// 404: the addressed resource does not exist.
    #[error("Not found (404): {message}")]
    NotFound {
        /// Remote error text, verbatim.
        message: String,
    },

    /// 409: the request conflicts with the resource's current state.
    #[error("Conflict (409): {message}")]
    Conflict {
        /// Remote error text, verbatim.
        message: String,
    },

    /// 429 responses persisted through every allowed retry.
    #[error("Rate limit exceeded after {tries} tries. Last message: {message}")]
    RateLimitExceeded {
        /// Number of attempts made.
        tries: u32,
        /// Remote error text from the last response.
        message: String,
    },

    /// 5xx responses persisted through every allowed retry.
    #[error("Upstream service error {code} after {tries} tries. Last message: {message}")]
    UpstreamService {
        /// The HTTP status code of the last response.
        code: u16,
        /// Number of attempts made.
        tries: u32,
        /// Remote error text from the last response.
        message: String,
    },

    /// Any other non-success status the executor does not classify.
    #[error("Unexpected response {code}: {message}")]
    Unexpected {
        /// The HTTP status code.
        code: u16,
        /// Remote error text, verbatim.
        message: String,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Network or connection error from the underlying transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Returns `true` for errors where retrying the same request cannot
    /// succeed without some external change first.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::RateLimitExceeded { .. } | Self::UpstreamService { .. } | Self::Network(_)
        )
    }
}
