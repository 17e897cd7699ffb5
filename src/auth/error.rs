//! Error types for the OAuth authorization and token lifecycle.

use thiserror::Error;

/// Errors raised by the authorization flow and token manager.
///
/// Remote-provided error text is always carried verbatim in the `message`
/// fields so callers can display both the classified kind and the specific
/// diagnostic the provider returned.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is stored; the user has never connected or has disconnected.
    #[error("Not authenticated. Please connect to Etsy first.")]
    NotAuthenticated,

    /// The `state` returned by the provider does not match the one generated
    /// for this session. The exchange fails closed without contacting the
    /// token endpoint.
    #[error("State parameter mismatch - possible CSRF attack.")]
    StateMismatch,

    /// The code exchange was rejected (bad or expired authorization code).
    #[error("Authorization failed ({status}): {message}")]
    AuthorizationFailed {
        /// HTTP status returned by the token endpoint (0 for network errors).
        status: u16,
        /// Remote error text, verbatim.
        message: String,
    },

    /// The refresh token was rejected or is missing; stored tokens have been
    /// cleared and the user must re-authorize from the beginning.
    #[error("Re-authentication required: {message}")]
    ReauthenticationRequired {
        /// Remote error text or local reason, verbatim.
        message: String,
    },

    /// The token endpoint could not be reached or returned an unparseable
    /// response.
    #[error("Token endpoint error ({status}): {message}")]
    TokenEndpoint {
        /// HTTP status (0 for network errors).
        status: u16,
        /// Description of the failure.
        message: String,
    },

    /// A stored credential value could not be decoded.
    #[error("Credential store error: {message}")]
    Store {
        /// Description of the failure.
        message: String,
    },
}
