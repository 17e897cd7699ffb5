//! HTTP plumbing for the Etsy API: requests, responses, pacing, and the
//! authenticated executor.
//!
//! Resource clients in [`crate::resources`] build [`ApiRequest`] values and
//! hand them to [`HttpClient::send`], which is the single path to the
//! network. Nothing above this layer talks to `reqwest` directly.

mod audit;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod limiter;

pub use audit::{AuditEvent, AuditHook};
pub use errors::{ApiError, InvalidApiRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    ApiRequest, ApiRequestBuilder, FilePart, FormValue, HttpMethod, Payload, DEFAULT_TRIES,
};
pub use http_response::{ApiResponse, QuotaSnapshot};
pub use limiter::{RateLimiter, DEFAULT_DAILY_LIMIT, DEFAULT_HOLD_SECONDS, MIN_SPACING};
