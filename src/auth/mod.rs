//! OAuth 2.0 authentication for the Etsy v3 API.
//!
//! Etsy v3 uses the authorization-code flow with PKCE (RFC 7636) and
//! user-scoped bearer tokens that expire after an hour. This module covers
//! the whole lifecycle:
//!
//! - [`PkceSession`]: verifier, challenge, and CSRF state generation
//! - [`TokenManager`]: authorization URLs, code exchange, transparent
//!   refresh, and disconnect
//! - [`OAuthToken`]: the stored token with its derived absolute expiry
//! - [`CredentialStore`]: the pluggable persistence seam
//! - [`AuthScopes`]: scope parsing and wire formatting

mod error;
mod pkce;
mod scopes;
mod store;
mod token;
mod token_manager;

pub use error::AuthError;
pub use pkce::PkceSession;
pub use scopes::AuthScopes;
pub use store::{CredentialStore, MemoryCredentialStore, PKCE_SESSION_KEY, TOKEN_KEY};
pub use token::{OAuthToken, TokenResponse};
pub use token_manager::{BeginAuthResult, TokenManager, TokenRefreshedHook};
