//! Response types for the Etsy API.
//!
//! This module provides the [`ApiResponse`] type and the [`QuotaSnapshot`]
//! parsed from Etsy's rate-limit headers.

use std::collections::HashMap;

/// Rate-limit quota state reported by Etsy on every response.
///
/// Etsy exposes two buckets: a per-second limit and a per-day limit, each
/// with a limit header and a remaining header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuotaSnapshot {
    /// Requests remaining in the rolling daily window (`X-Remaining-Today`).
    pub remaining_today: Option<u64>,
    /// Daily request ceiling (`X-Limit-Per-Day`).
    pub limit_per_day: Option<u64>,
    /// Requests remaining this second (`X-Remaining-This-Second`).
    pub remaining_this_second: Option<u64>,
    /// Per-second request ceiling (`X-Limit-Per-Second`).
    pub limit_per_second: Option<u64>,
}

impl QuotaSnapshot {
    /// Parses the quota headers from a lowercased header map.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        let parse = |name: &str| -> Option<u64> {
            headers
                .get(name)
                .and_then(|values| values.first())
                .and_then(|value| value.parse().ok())
        };

        Self {
            remaining_today: parse("x-remaining-today"),
            limit_per_day: parse("x-limit-per-day"),
            remaining_this_second: parse("x-remaining-this-second"),
            limit_per_second: parse("x-limit-per-second"),
        }
    }

    /// Returns `true` if every field is absent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining_today.is_none()
            && self.limit_per_day.is_none()
            && self.remaining_this_second.is_none()
            && self.limit_per_second.is_none()
    }
}

/// An HTTP response from the Etsy API.
///
/// Contains the response status code, headers, parsed JSON body, and the
/// Etsy-specific header values the executor consumes: the `Retry-After`
/// delay and the [`QuotaSnapshot`].
#[derive(Clone, Debug)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_after: Option<f64>,
    /// Rate-limit quota state, when the quota headers are present.
    pub quota: Option<QuotaSnapshot>,
}

impl ApiResponse {
    /// Creates a new `ApiResponse` with automatic header parsing.
    ///
    /// Header names are expected to be lowercased. The constructor parses:
    /// - `retry-after` into `retry_after`
    /// - `x-remaining-today`, `x-limit-per-day`, `x-remaining-this-second`,
    ///   `x-limit-per-second` into `quota`
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        let quota = QuotaSnapshot::from_headers(&headers);
        let quota = if quota.is_empty() { None } else { Some(quota) };

        Self {
            code,
            headers,
            body,
            retry_after,
            quota,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Extracts the error message Etsy places in the body's `error` field,
    /// falling back to the whole body when the field is absent.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| self.body.to_string(), ToString::to_string)
    }

    /// Deserializes the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the body does not match
    /// the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_is_ok_for_2xx_only() {
        assert!(ApiResponse::new(200, HashMap::new(), json!({})).is_ok());
        assert!(ApiResponse::new(204, HashMap::new(), json!({})).is_ok());
        assert!(!ApiResponse::new(301, HashMap::new(), json!({})).is_ok());
        assert!(!ApiResponse::new(404, HashMap::new(), json!({})).is_ok());
        assert!(!ApiResponse::new(500, HashMap::new(), json!({})).is_ok());
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = ApiResponse::new(429, headers(&[("retry-after", "12")]), json!({}));
        assert!((response.retry_after.unwrap() - 12.0).abs() < f64::EPSILON);

        let absent = ApiResponse::new(429, HashMap::new(), json!({}));
        assert!(absent.retry_after.is_none());
    }

    #[test]
    fn test_quota_header_parsing() {
        let response = ApiResponse::new(
            200,
            headers(&[
                ("x-remaining-today", "9950"),
                ("x-limit-per-day", "10000"),
                ("x-remaining-this-second", "9"),
                ("x-limit-per-second", "10"),
            ]),
            json!({}),
        );

        let quota = response.quota.unwrap();
        assert_eq!(quota.remaining_today, Some(9950));
        assert_eq!(quota.limit_per_day, Some(10_000));
        assert_eq!(quota.remaining_this_second, Some(9));
        assert_eq!(quota.limit_per_second, Some(10));
    }

    #[test]
    fn test_quota_is_none_when_headers_absent() {
        let response = ApiResponse::new(200, HashMap::new(), json!({}));
        assert!(response.quota.is_none());
    }

    #[test]
    fn test_quota_partial_headers_still_parse() {
        let response = ApiResponse::new(200, headers(&[("x-remaining-today", "42")]), json!({}));
        let quota = response.quota.unwrap();
        assert_eq!(quota.remaining_today, Some(42));
        assert!(quota.limit_per_day.is_none());
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        let response = ApiResponse::new(404, HashMap::new(), json!({"error": "Shop not found"}));
        assert_eq!(response.error_message(), "Shop not found");

        let raw = ApiResponse::new(404, HashMap::new(), json!({"detail": "odd shape"}));
        assert_eq!(raw.error_message(), r#"{"detail":"odd shape"}"#);
    }

    #[test]
    fn test_parse_into_typed_value() {
        #[derive(serde::Deserialize)]
        struct Shop {
            shop_id: u64,
        }

        let response = ApiResponse::new(200, HashMap::new(), json!({"shop_id": 77}));
        let shop: Shop = response.parse().unwrap();
        assert_eq!(shop.shop_id, 77);
    }
}
