//! PKCE verifier/challenge generation for the OAuth authorization flow.
//!
//! Etsy v3 requires Proof Key for Code Exchange (RFC 7636) on every
//! authorization-code flow. [`PkceSession::generate`] produces the verifier,
//! its S256 challenge, and a CSRF state token in one step; the whole session
//! is stored for the duration of the flow and consumed exactly once at
//! exchange time.

use base64::prelude::*;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind the verifier. Base64url-encodes to 128
/// characters, the maximum length RFC 7636 allows.
const VERIFIER_BYTES: usize = 96;

/// Number of random bytes behind the CSRF state token.
const STATE_BYTES: usize = 16;

/// An ephemeral PKCE session: verifier, derived challenge, and CSRF state.
///
/// Lives only between "begin authorization" and "exchange code". The
/// challenge is deterministic given the verifier, so the session can be
/// persisted and restored without recomputation.
///
/// # Example
///
/// ```rust
/// use etsy_api::auth::PkceSession;
///
/// let session = PkceSession::generate();
/// assert_eq!(session.verifier.len(), 128);
/// assert_eq!(session.challenge, PkceSession::challenge_for(&session.verifier));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PkceSession {
    /// The code verifier, sent only to the token endpoint.
    pub verifier: String,
    /// `base64url(sha256(verifier))` without padding, sent in the
    /// authorization URL.
    pub challenge: String,
    /// Random state token compared against the provider's callback.
    pub state: String,
}

impl PkceSession {
    /// Generates a fresh session from cryptographically secure random bytes.
    ///
    /// Pure apart from drawing entropy: no side effects, and the caller is
    /// responsible for persisting the session for the duration of the flow.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();

        let mut verifier_bytes = [0u8; VERIFIER_BYTES];
        rng.fill_bytes(&mut verifier_bytes);
        let verifier = BASE64_URL_SAFE_NO_PAD.encode(verifier_bytes);

        let challenge = Self::challenge_for(&verifier);

        let mut state_bytes = [0u8; STATE_BYTES];
        rng.fill_bytes(&mut state_bytes);
        let state = BASE64_URL_SAFE_NO_PAD.encode(state_bytes);

        Self {
            verifier,
            challenge,
            state,
        }
    }

    /// Derives the S256 challenge for a verifier.
    #[must_use]
    pub fn challenge_for(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        BASE64_URL_SAFE_NO_PAD.encode(digest)
    }
}

// Verify PkceSession is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PkceSession>();
};
