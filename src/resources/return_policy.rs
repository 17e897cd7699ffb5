//! Return policy operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ApiError, ApiRequest, HttpClient, HttpMethod, Payload};
use crate::resources::Paginated;

/// A shop return policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnPolicy {
    /// Unique policy identifier.
    pub return_policy_id: u64,
    /// Whether returns are accepted.
    #[serde(default)]
    pub accepts_returns: bool,
    /// Whether exchanges are accepted.
    #[serde(default)]
    pub accepts_exchanges: bool,
    /// Days the buyer has to initiate a return.
    #[serde(default)]
    pub return_deadline: Option<u32>,
}

/// Fields for creating a return policy.
///
/// Defaults to accepting both returns and exchanges with a 30-day deadline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewReturnPolicy {
    /// Whether returns are accepted.
    pub accepts_returns: bool,
    /// Whether exchanges are accepted.
    pub accepts_exchanges: bool,
    /// Days the buyer has to initiate a return.
    pub return_deadline: u32,
}

impl Default for NewReturnPolicy {
    fn default() -> Self {
        Self {
            accepts_returns: true,
            accepts_exchanges: true,
            return_deadline: 30,
        }
    }
}

/// Client for return policy endpoints.
#[derive(Clone, Debug)]
pub struct ReturnPolicies {
    http: Arc<HttpClient>,
}

impl ReturnPolicies {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches a shop's return policies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list(&self, shop_id: u64) -> Result<Vec<ReturnPolicy>, ApiError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/shops/{shop_id}/policies/return"))
                .build()?;
        let response = self.http.send(request).await?;
        let page: Paginated<ReturnPolicy> = response.parse()?;
        Ok(page.results)
    }

    /// Creates a return policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create(
        &self,
        shop_id: u64,
        policy: &NewReturnPolicy,
    ) -> Result<ReturnPolicy, ApiError> {
        let body = serde_json::to_value(policy)?;
        let request =
            ApiRequest::builder(HttpMethod::Post, format!("/shops/{shop_id}/policies/return"))
                .payload(Payload::Json(body))
                .build()?;
        let response = self.http.send(request).await?;

        let created: ReturnPolicy = response.parse()?;
        info!(
            return_policy_id = created.return_policy_id,
            "Created return policy"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_accept_returns_and_exchanges() {
        let policy = NewReturnPolicy::default();
        assert!(policy.accepts_returns);
        assert!(policy.accepts_exchanges);
        assert_eq!(policy.return_deadline, 30);
    }

    #[test]
    fn test_policy_parses_minimal_body() {
        let policy: ReturnPolicy =
            serde_json::from_str(r#"{"return_policy_id": 5, "accepts_returns": true}"#).unwrap();
        assert_eq!(policy.return_policy_id, 5);
        assert!(policy.accepts_returns);
        assert!(!policy.accepts_exchanges);
    }
}
