//! Injectable time source for rate limiting and token expiry checks.
//!
//! The rate limiter and token manager never call `Utc::now()` or
//! `tokio::time::sleep` directly; they go through a [`Clock`] so tests can
//! simulate the passage of time without real delays.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// A source of wall-clock time and suspension.
///
/// Implementations must be `Send + Sync` so a single clock can be shared
/// between the token manager and the rate limiter.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// The real clock: `Utc::now()` and `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// A manually advanced clock for deterministic tests.
///
/// `sleep` completes immediately and advances the internal time by the
/// requested duration, recording it so tests can assert on waits.
///
/// # Example
///
/// ```rust
/// use etsy_api::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::default();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(60));
/// assert_eq!((clock.now() - start).num_seconds(), 60);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualClockState>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    slept: Vec<Duration>,
}

impl ManualClock {
    /// Creates a clock starting at the given instant.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualClockState {
                now,
                slept: Vec::new(),
            }),
        }
    }

    /// Moves the clock forward without recording a sleep.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.inner.lock().unwrap();
        state.now += chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
    }

    /// Returns every duration passed to `sleep`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn slept(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().slept.clone()
    }

    /// Returns the total time spent in `sleep`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.inner.lock().unwrap().slept.iter().sum()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap().now
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        {
            let mut state = self.inner.lock().unwrap();
            state.now +=
                chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
            state.slept.push(duration);
        }
        Box::pin(std::future::ready(()))
    }
}

// Verify clocks are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SystemClock>();
    assert_send_sync::<ManualClock>();
};
