//! Request audit events.
//!
//! The executor emits one [`AuditEvent`] per attempted HTTP exchange
//! (including retried attempts and requests that die in transport), carrying
//! the outcome and the server's view of the remaining daily quota. Events
//! always go to the `tracing` log;
//! registering an [`AuditHook`] additionally delivers them to the caller,
//! for usage dashboards or request accounting.

use std::sync::Arc;
use std::time::Duration;

/// A single attempted HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEvent {
    /// The HTTP method, lowercased.
    pub method: String,
    /// The request path relative to the API base.
    pub path: String,
    /// The response status code, or 0 when the request failed before a
    /// response arrived.
    pub status: u16,
    /// Wall time between sending the request and receiving the response.
    pub latency: Duration,
    /// `X-Remaining-Today` from the response, when present.
    pub remaining_today: Option<u64>,
}

/// Callback invoked with every [`AuditEvent`].
pub type AuditHook = Arc<dyn Fn(&AuditEvent) + Send + Sync>;
