//! Authenticated request executor for the Etsy API.
//!
//! This module provides the [`HttpClient`] type: the single funnel every
//! API call goes through. It attaches credentials, paces requests through
//! the [`RateLimiter`], and applies the retry policy:
//!
//! - 429: arm the limiter's hold gate and retry, up to the request's `tries`
//! - 401: force one token refresh and retry once
//! - 5xx: exponential backoff and retry, up to the request's `tries`
//! - 400/403/404/409: classified and returned immediately

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::auth::TokenManager;
use crate::clients::audit::{AuditEvent, AuditHook};
use crate::clients::errors::ApiError;
use crate::clients::http_request::{ApiRequest, HttpMethod, Payload};
use crate::clients::http_response::ApiResponse;
use crate::clients::limiter::RateLimiter;
use crate::clock::{Clock, SystemClock};
use crate::config::EtsyConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// First backoff interval for 5xx retries; doubles per attempt.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Ceiling for the 5xx backoff interval.
const BACKOFF_CAP: Duration = Duration::from_secs(8);

/// Executor for authenticated requests to the Etsy API.
///
/// The client handles:
/// - URL construction from the configured API base
/// - Default headers including User-Agent and `x-api-key`
/// - Bearer token attachment with transparent refresh
/// - Client-side pacing and server-directed holds via [`RateLimiter`]
/// - Retry and error classification for every response status
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; a single instance shared behind an `Arc`
/// serializes all requests through its limiter, which is what keeps the
/// whole process inside Etsy's rate limits.
pub struct HttpClient {
    config: Arc<EtsyConfig>,
    tokens: Arc<TokenManager>,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
    audit_hook: Option<AuditHook>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client using the system clock.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: Arc<EtsyConfig>, tokens: Arc<TokenManager>) -> Self {
        Self::with_clock(config, tokens, Arc::new(SystemClock))
    }

    /// Creates a client with an explicit clock, shared with its limiter.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn with_clock(
        config: Arc<EtsyConfig>,
        tokens: Arc<TokenManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Etsy API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "x-api-key".to_string(),
            config.api_key().as_ref().to_string(),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            tokens,
            limiter: RateLimiter::new(Arc::clone(&clock)),
            clock,
            client,
            default_headers,
            audit_hook: None,
        }
    }

    /// Registers a callback invoked with every completed exchange.
    #[must_use]
    pub fn on_audit(mut self, hook: AuditHook) -> Self {
        self.audit_hook = Some(hook);
        self
    }

    /// Returns the token manager this client authenticates with.
    #[must_use]
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Returns the default headers attached to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request to the Etsy API.
    ///
    /// Each attempt first passes through the rate limiter, so retries after
    /// a 429 automatically wait out the server-directed hold.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No valid token is available and one cannot be obtained (`Auth`)
    /// - Network error occurs (`Network`)
    /// - A non-2xx response survives the retry policy (see [`ApiError`])
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.verify()?;

        let url = format!("{}{}", self.config.api_base_url(), request.path);

        let mut tries: u32 = 0;
        let mut refreshed_once = false;
        loop {
            // Token first: a slow refresh should not eat the pacing slot.
            let access_token = if request.authenticated {
                Some(self.tokens.get_valid_access_token().await?)
            } else {
                None
            };

            self.limiter.acquire().await;

            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Patch => self.client.patch(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &self.default_headers {
                builder = builder.header(key, value);
            }
            if let Some(token) = &access_token {
                builder = builder.bearer_auth(token);
            }
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }

            builder = match &request.payload {
                None => builder,
                Some(Payload::Form(fields)) => builder
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Payload::encode_form(fields)),
                Some(Payload::Json(value)) => builder.json(value),
                Some(Payload::Multipart { fields, file }) => {
                    // reqwest computes the boundary and Content-Type itself.
                    let mut form = reqwest::multipart::Form::new();
                    for (key, value) in fields {
                        form = form.text(key.clone(), value.clone());
                    }
                    form = form.part(
                        file.name.clone(),
                        reqwest::multipart::Part::bytes(file.bytes.clone())
                            .file_name(file.file_name.clone()),
                    );
                    builder.multipart(form)
                }
            };

            let started = std::time::Instant::now();
            let res = match builder.send().await {
                Ok(res) => res,
                Err(err) => {
                    self.observe_failure(&request, started.elapsed());
                    return Err(err.into());
                }
            };
            let latency = started.elapsed();

            let code = res.status().as_u16();
            let headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();
            let body = if body_text.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text)
                    .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
            };

            let response = ApiResponse::new(code, headers, body);
            self.observe(&request, &response, latency);

            if response.is_ok() {
                return Ok(response);
            }

            let message = response.error_message();
            match code {
                401 if request.authenticated && !refreshed_once => {
                    // Local expiry bookkeeping and the server disagree; force
                    // one refresh and retry exactly once.
                    debug!("401 on an unexpired token; forcing a refresh");
                    refreshed_once = true;
                    self.tokens.refresh().await?;
                }
                401 => return Err(ApiError::Authentication { message }),
                403 => return Err(ApiError::InsufficientScope { message }),
                400 => return Err(ApiError::BadRequest { message }),
                404 => return Err(ApiError::NotFound { message }),
                409 => return Err(ApiError::Conflict { message }),
                429 => {
                    tries += 1;
                    self.limiter
                        .on_rate_limit_response(response.retry_after)
                        .await;
                    if tries >= request.tries {
                        return Err(ApiError::RateLimitExceeded { tries, message });
                    }
                }
                500..=599 => {
                    tries += 1;
                    if tries >= request.tries {
                        return Err(ApiError::UpstreamService {
                            code,
                            tries,
                            message,
                        });
                    }
                    let backoff = Self::backoff_delay(tries);
                    warn!(
                        code,
                        seconds = backoff.as_secs_f64(),
                        "Upstream error; backing off before retry"
                    );
                    self.clock.sleep(backoff).await;
                }
                _ => return Err(ApiError::Unexpected { code, message }),
            }
        }
    }

    /// Exponential backoff: base doubled per prior attempt, capped.
    fn backoff_delay(tries: u32) -> Duration {
        let factor = 2u32.saturating_pow(tries.saturating_sub(1));
        BACKOFF_BASE.saturating_mul(factor).min(BACKOFF_CAP)
    }

    /// Logs the exchange and feeds it to the audit hook and limiter.
    fn observe(&self, request: &ApiRequest, response: &ApiResponse, latency: Duration) {
        let remaining_today = response.quota.as_ref().and_then(|q| q.remaining_today);

        debug!(
            method = %request.method,
            path = %request.path,
            status = response.code,
            latency_ms = latency.as_millis() as u64,
            remaining_today,
            "API exchange"
        );

        if let Some(quota) = &response.quota {
            self.limiter.observe_quota(quota);
        }

        if let Some(hook) = &self.audit_hook {
            hook(&AuditEvent {
                method: request.method.to_string(),
                path: request.path.clone(),
                status: response.code,
                latency,
                remaining_today,
            });
        }
    }

    /// Logs a transport-level failure and feeds it to the audit hook.
    ///
    /// No response ever arrived, so the event carries status 0 and no quota.
    fn observe_failure(&self, request: &ApiRequest, latency: Duration) {
        warn!(
            method = %request.method,
            path = %request.path,
            latency_ms = latency.as_millis() as u64,
            "API exchange failed before a response arrived"
        );

        if let Some(hook) = &self.audit_hook {
            hook(&AuditEvent {
                method: request.method.to_string(),
                path: request.path.clone(),
                status: 0,
                latency,
                remaining_today: None,
            });
        }
    }

    /// Parses response headers into a lowercased `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
