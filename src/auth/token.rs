//! OAuth token types.
//!
//! [`OAuthToken`] is the stored, user-scoped token with a derived absolute
//! expiry. [`TokenResponse`] is the wire shape returned by Etsy's token
//! endpoint for both the code exchange and the refresh grant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A stored OAuth token for a connected Etsy user.
///
/// Created by a successful code exchange and replaced wholesale on every
/// refresh. `expires_at` is always derived as issue time plus the provider's
/// `expires_in`; a token without a refresh token cannot be renewed and
/// authorization must restart from the beginning.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer token attached to every authenticated request.
    pub access_token: String,
    /// Token used to obtain the next access token, if the provider issued one.
    pub refresh_token: Option<String>,
    /// Absolute expiry of the access token.
    pub expires_at: DateTime<Utc>,
}

impl OAuthToken {
    /// Builds a stored token from a token-endpoint response issued at `now`.
    #[must_use]
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Returns `true` if the token expires within `buffer` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        now >= self.expires_at - buffer
    }
}

impl std::fmt::Debug for OAuthToken {
    /// Masks token material so it cannot leak through logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Response body of the OAuth token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,
    /// Token type, always `Bearer` for Etsy.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// The refresh token, possibly rotated relative to the previous one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Verify token types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthToken>();
    assert_send_sync::<TokenResponse>();
};
