//! OAuth token lifecycle management.
//!
//! [`TokenManager`] owns the full authorization-code flow and everything
//! after it: building the authorization URL, exchanging the code with PKCE,
//! persisting the resulting token, refreshing it before expiry, and tearing
//! it all down on disconnect.
//!
//! # Flow
//!
//! 1. [`TokenManager::begin_authorization`] generates a PKCE session, stores
//!    it, and returns the URL to send the user's browser to.
//! 2. The provider redirects back with `code` and `state`.
//! 3. [`TokenManager::complete_authorization`] verifies the state, exchanges
//!    the code, and stores the token.
//! 4. [`TokenManager::get_valid_access_token`] is then called before every
//!    authenticated request; it refreshes transparently when the token is
//!    within five minutes of expiry.

use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::error::AuthError;
use crate::auth::pkce::PkceSession;
use crate::auth::store::{CredentialStore, PKCE_SESSION_KEY, TOKEN_KEY};
use crate::auth::token::{OAuthToken, TokenResponse};
use crate::clock::{Clock, SystemClock};
use crate::config::EtsyConfig;

/// Refresh tokens this long before they actually expire.
const REFRESH_BUFFER_SECONDS: i64 = 300;

/// Callback invoked with the new token after every successful refresh or
/// code exchange.
pub type TokenRefreshedHook = Arc<dyn Fn(&OAuthToken) + Send + Sync>;

/// Result of starting an authorization flow.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// Fully assembled authorization URL for the user's browser.
    pub auth_url: String,
    /// The PKCE session to hand back to [`TokenManager::complete_authorization`].
    pub session: PkceSession,
}

/// Manages the OAuth token lifecycle for a single connected user.
///
/// All state lives in the injected [`CredentialStore`], so the manager itself
/// is cheap to clone behind an [`Arc`] and safe to share across tasks.
/// Concurrent refresh attempts are serialized internally; only one task ever
/// talks to the token endpoint at a time.
pub struct TokenManager {
    config: Arc<EtsyConfig>,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    http: reqwest::Client,
    refresh_lock: tokio::sync::Mutex<()>,
    on_token_refreshed: Option<TokenRefreshedHook>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Creates a token manager using the system clock.
    #[must_use]
    pub fn new(config: Arc<EtsyConfig>, store: Arc<dyn CredentialStore>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Creates a token manager with an explicit clock.
    #[must_use]
    pub fn with_clock(
        config: Arc<EtsyConfig>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            http: reqwest::Client::new(),
            refresh_lock: tokio::sync::Mutex::new(()),
            on_token_refreshed: None,
        }
    }

    /// Registers a callback invoked with every newly stored token.
    ///
    /// Useful for mirroring tokens into an external system of record.
    #[must_use]
    pub fn on_token_refreshed(mut self, hook: TokenRefreshedHook) -> Self {
        self.on_token_refreshed = Some(hook);
        self
    }

    /// Starts an authorization flow.
    ///
    /// Generates a fresh PKCE session, persists it for the callback leg, and
    /// returns the authorization URL. Calling this again before the flow
    /// completes replaces the stored session, invalidating the older URL.
    pub fn begin_authorization(&self) -> BeginAuthResult {
        let session = PkceSession::generate();

        if let Ok(json) = serde_json::to_string(&session) {
            self.store.set(PKCE_SESSION_KEY, &json);
        }

        let auth_url = format!(
            "{}?response_type=code&redirect_uri={}&scope={}&client_id={}&state={}&code_challenge={}&code_challenge_method=S256",
            self.config.auth_base_url(),
            urlencoding::encode(self.config.redirect_uri().as_ref()),
            urlencoding::encode(&self.config.scopes().to_string()),
            urlencoding::encode(self.config.api_key().as_ref()),
            urlencoding::encode(&session.state),
            urlencoding::encode(&session.challenge),
        );

        debug!(state = %session.state, "Began OAuth authorization flow");

        BeginAuthResult { auth_url, session }
    }

    /// Returns the PKCE session persisted by [`Self::begin_authorization`],
    /// for callers that handle the browser redirect in a separate process.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] if no flow is in progress, or
    /// [`AuthError::Store`] if the stored session cannot be decoded.
    pub fn pending_session(&self) -> Result<PkceSession, AuthError> {
        let json = self
            .store
            .get(PKCE_SESSION_KEY)
            .ok_or(AuthError::NotAuthenticated)?;
        serde_json::from_str(&json).map_err(|e| AuthError::Store {
            message: format!("Stored PKCE session is not valid JSON: {e}"),
        })
    }

    /// Completes the authorization flow by exchanging the code for a token.
    ///
    /// The session is consumed by value and removed from the store, so a
    /// given verifier can be used at most once. The `returned_state` from the
    /// provider's redirect is compared against the session's state before
    /// anything is sent to the token endpoint; on mismatch the exchange fails
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StateMismatch`] on a CSRF state mismatch,
    /// [`AuthError::AuthorizationFailed`] if the provider rejects the code,
    /// or [`AuthError::TokenEndpoint`] on transport failures.
    pub async fn complete_authorization(
        &self,
        code: &str,
        returned_state: &str,
        session: PkceSession,
    ) -> Result<OAuthToken, AuthError> {
        // The session is single-use whether or not the exchange succeeds.
        self.store.delete(PKCE_SESSION_KEY);

        if returned_state != session.state {
            warn!("OAuth state mismatch; dropping authorization attempt");
            return Err(AuthError::StateMismatch);
        }

        #[derive(Serialize)]
        struct CodeExchangeRequest<'a> {
            grant_type: &'static str,
            client_id: &'a str,
            redirect_uri: &'a str,
            code: &'a str,
            code_verifier: &'a str,
        }

        let body = CodeExchangeRequest {
            grant_type: "authorization_code",
            client_id: self.config.api_key().as_ref(),
            redirect_uri: self.config.redirect_uri().as_ref(),
            code,
            code_verifier: &session.verifier,
        };

        let response = self
            .http
            .post(self.config.token_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::TokenEndpoint {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::AuthorizationFailed {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TokenResponse =
            response.json().await.map_err(|e| AuthError::TokenEndpoint {
                status: status.as_u16(),
                message: format!("Invalid token response: {e}"),
            })?;

        let token = OAuthToken::from_response(parsed, self.clock.now());
        self.store_token(&token);

        info!("OAuth authorization complete");
        Ok(token)
    }

    /// Returns an access token guaranteed to be valid for at least the next
    /// five minutes, refreshing first if necessary.
    ///
    /// Concurrent callers are serialized through an internal lock while a
    /// refresh is in flight; only the first performs the refresh, the rest
    /// observe the replaced token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] if no token is stored, or
    /// [`AuthError::ReauthenticationRequired`] if the refresh fails and the
    /// stored tokens have been cleared.
    pub async fn get_valid_access_token(&self) -> Result<String, AuthError> {
        let buffer = ChronoDuration::seconds(REFRESH_BUFFER_SECONDS);

        let token = self.load_token()?;
        if !token.expires_within(self.clock.now(), buffer) {
            return Ok(token.access_token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited for the lock.
        let token = self.load_token()?;
        if !token.expires_within(self.clock.now(), buffer) {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh_locked(token).await?;
        Ok(refreshed.access_token)
    }

    /// Forces a refresh regardless of the current token's remaining lifetime.
    ///
    /// Used by the request executor after a 401 response, where the local
    /// expiry bookkeeping and the provider disagree.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] if no token is stored, or
    /// [`AuthError::ReauthenticationRequired`] if the provider rejects the
    /// refresh token.
    pub async fn refresh(&self) -> Result<OAuthToken, AuthError> {
        let _guard = self.refresh_lock.lock().await;
        let token = self.load_token()?;
        self.refresh_locked(token).await
    }

    /// Returns the stored token without refreshing, if one exists.
    #[must_use]
    pub fn current_token(&self) -> Option<OAuthToken> {
        self.load_token().ok()
    }

    /// Returns `true` if a token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some()
    }

    /// Removes all stored credentials: the token and any in-flight PKCE
    /// session.
    pub fn disconnect(&self) {
        self.store.delete(TOKEN_KEY);
        self.store.delete(PKCE_SESSION_KEY);
        info!("Disconnected; stored credentials cleared");
    }

    /// Performs the refresh grant. Caller must hold `refresh_lock`.
    async fn refresh_locked(&self, token: OAuthToken) -> Result<OAuthToken, AuthError> {
        let Some(refresh_token) = token.refresh_token else {
            self.store.delete(TOKEN_KEY);
            return Err(AuthError::ReauthenticationRequired {
                message: "No refresh token was issued for this session.".to_string(),
            });
        };

        #[derive(Serialize)]
        struct RefreshRequest<'a> {
            grant_type: &'static str,
            client_id: &'a str,
            refresh_token: &'a str,
        }

        let body = RefreshRequest {
            grant_type: "refresh_token",
            client_id: self.config.api_key().as_ref(),
            refresh_token: &refresh_token,
        };

        let response = self
            .http
            .post(self.config.token_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::TokenEndpoint {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // A rejected refresh token cannot recover on its own; clear the
            // stored credentials so the caller restarts authorization.
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token refresh rejected; clearing stored tokens");
            self.store.delete(TOKEN_KEY);
            return Err(AuthError::ReauthenticationRequired { message });
        }

        let parsed: TokenResponse =
            response.json().await.map_err(|e| AuthError::TokenEndpoint {
                status: status.as_u16(),
                message: format!("Invalid token response: {e}"),
            })?;

        // The refresh token may rotate; the response replaces the stored
        // token wholesale.
        let refreshed = OAuthToken::from_response(parsed, self.clock.now());
        self.store_token(&refreshed);

        debug!(expires_at = %refreshed.expires_at, "Access token refreshed");
        Ok(refreshed)
    }

    fn load_token(&self) -> Result<OAuthToken, AuthError> {
        let json = self.store.get(TOKEN_KEY).ok_or(AuthError::NotAuthenticated)?;
        serde_json::from_str(&json).map_err(|e| AuthError::Store {
            message: format!("Stored token is not valid JSON: {e}"),
        })
    }

    fn store_token(&self, token: &OAuthToken) {
        if let Ok(json) = serde_json::to_string(token) {
            self.store.set(TOKEN_KEY, &json);
        }
        if let Some(hook) = &self.on_token_refreshed {
            hook(token);
        }
    }
}

// Verify TokenManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenManager>();
};
