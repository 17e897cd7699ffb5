//! Client-side rate limiting for the Etsy API.
//!
//! Etsy enforces 10 requests per second and 10,000 per day. [`RateLimiter`]
//! keeps the SDK under both from the client side: a minimum spacing between
//! requests (500ms, half the nominal per-second budget to leave headroom),
//! a rolling 24-hour window for the daily budget, and a hard hold gate that
//! a 429 response arms for the `Retry-After` interval.
//!
//! All waiting happens through the injected [`Clock`], so tests drive the
//! limiter through simulated time.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clients::http_response::QuotaSnapshot;
use crate::clock::Clock;

/// Minimum spacing between consecutive requests.
pub const MIN_SPACING: Duration = Duration::from_millis(500);

/// Default daily request budget, matching Etsy's published limit.
pub const DEFAULT_DAILY_LIMIT: usize = 10_000;

/// Hold applied after a 429 without a `Retry-After` header.
pub const DEFAULT_HOLD_SECONDS: f64 = 60.0;

/// Warn when the server reports fewer than this many daily requests left.
const LOW_QUOTA_THRESHOLD: u64 = 500;

#[derive(Debug)]
struct LimiterState {
    /// Instant of the most recent permitted request.
    last_request: Option<DateTime<Utc>>,
    /// Requests are blocked until this instant after a 429.
    hold_until: Option<DateTime<Utc>>,
    /// Timestamps of permitted requests in the last 24 hours, oldest first.
    window: VecDeque<DateTime<Utc>>,
}

/// Serializes and paces outbound requests.
///
/// [`RateLimiter::acquire`] is called before every request; its internal
/// lock is held across any waiting, so concurrent callers queue up and are
/// released one at a time with the required spacing between them.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    daily_limit: usize,
    state: Mutex<LimiterState>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("daily_limit", &self.daily_limit)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Creates a limiter with the default daily budget.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_daily_limit(clock, DEFAULT_DAILY_LIMIT)
    }

    /// Creates a limiter with an explicit daily budget.
    #[must_use]
    pub fn with_daily_limit(clock: Arc<dyn Clock>, daily_limit: usize) -> Self {
        Self {
            clock,
            daily_limit: daily_limit.max(1),
            state: Mutex::new(LimiterState {
                last_request: None,
                hold_until: None,
                window: VecDeque::new(),
            }),
        }
    }

    /// Waits until a request is permitted, then records it.
    ///
    /// Applies, in order: the hold gate armed by a prior 429, the rolling
    /// daily budget, and the minimum spacing since the previous request.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        if let Some(hold_until) = state.hold_until {
            let now = self.clock.now();
            if let Ok(wait) = (hold_until - now).to_std() {
                debug!(seconds = wait.as_secs_f64(), "Holding for rate-limit cooldown");
                self.clock.sleep(wait).await;
            }
            state.hold_until = None;
        }

        let day = chrono::Duration::hours(24);
        loop {
            let now = self.clock.now();
            while state.window.front().is_some_and(|&t| now - t >= day) {
                state.window.pop_front();
            }
            if state.window.len() < self.daily_limit {
                break;
            }
            // Budget spent; wait for the oldest request to age out.
            if let Some(&oldest) = state.window.front() {
                if let Ok(wait) = (oldest + day - now).to_std() {
                    warn!("Daily request budget exhausted; waiting for the window to roll");
                    self.clock.sleep(wait).await;
                }
            }
        }

        if let Some(last) = state.last_request {
            let elapsed = (self.clock.now() - last)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if elapsed < MIN_SPACING {
                self.clock.sleep(MIN_SPACING - elapsed).await;
            }
        }

        let now = self.clock.now();
        state.last_request = Some(now);
        state.window.push_back(now);
    }

    /// Arms the hold gate after a 429 response.
    ///
    /// Every caller, not just the one that received the 429, waits out the
    /// hold before its next request.
    pub async fn on_rate_limit_response(&self, retry_after: Option<f64>) {
        let seconds = retry_after.unwrap_or(DEFAULT_HOLD_SECONDS).max(0.0);
        let until = self.clock.now()
            + chrono::Duration::from_std(Duration::from_secs_f64(seconds))
                .unwrap_or_else(|_| chrono::Duration::seconds(60));

        let mut state = self.state.lock().await;
        // Keep the later of two overlapping holds.
        if state.hold_until.map_or(true, |existing| until > existing) {
            state.hold_until = Some(until);
        }
        warn!(seconds, "Rate limited by server; holding all requests");
    }

    /// Feeds the server's quota headers back into the limiter's view.
    ///
    /// The rolling window is the authority for pacing; the server snapshot
    /// is only used to surface a warning when the account is close to the
    /// daily ceiling from other clients' traffic.
    pub fn observe_quota(&self, quota: &QuotaSnapshot) {
        if let Some(remaining) = quota.remaining_today {
            if remaining < LOW_QUOTA_THRESHOLD {
                warn!(remaining, "Daily API quota is nearly exhausted");
            }
        }
    }
}
