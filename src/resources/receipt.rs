//! Receipt (order) operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ApiError, ApiRequest, HttpClient, HttpMethod, Payload};
use crate::resources::{Money, Paginated};

/// An Etsy receipt: one buyer checkout, possibly spanning several listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique receipt identifier.
    pub receipt_id: u64,
    /// Fulfillment status (`paid`, `completed`, etc.).
    #[serde(default)]
    pub status: Option<String>,
    /// Buyer display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the order has shipped.
    #[serde(default)]
    pub is_shipped: Option<bool>,
    /// Order total.
    #[serde(default)]
    pub grandtotal: Option<Money>,
    /// Creation time as a Unix timestamp.
    #[serde(default)]
    pub created_timestamp: Option<i64>,
    /// The line items, left untyped; their shape varies by listing type.
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

/// Client for receipt endpoints.
#[derive(Clone, Debug)]
pub struct Receipts {
    http: Arc<HttpClient>,
}

impl Receipts {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches one page of a shop's receipts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list(
        &self,
        shop_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Paginated<Receipt>, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/shops/{shop_id}/receipts"))
            .query_param("limit", limit)
            .query_param("offset", offset)
            .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Fetches a receipt by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get(&self, shop_id: u64, receipt_id: u64) -> Result<Receipt, ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Get,
            format!("/shops/{shop_id}/receipts/{receipt_id}"),
        )
        .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Attaches tracking to a receipt, fulfilling the order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_shipment(
        &self,
        shop_id: u64,
        receipt_id: u64,
        tracking_code: &str,
        carrier_name: &str,
        send_bcc: bool,
    ) -> Result<Receipt, ApiError> {
        let body = serde_json::json!({
            "tracking_code": tracking_code,
            "carrier_name": carrier_name,
            "send_bcc": send_bcc,
        });

        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("/shops/{shop_id}/receipts/{receipt_id}/tracking"),
        )
        .payload(Payload::Json(body))
        .build()?;
        let response = self.http.send(request).await?;

        info!(receipt_id, carrier_name, "Shipment tracking added");
        Ok(response.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_parses_minimal_body() {
        let receipt: Receipt =
            serde_json::from_str(r#"{"receipt_id": 31415, "status": "paid"}"#).unwrap();
        assert_eq!(receipt.receipt_id, 31415);
        assert_eq!(receipt.status.as_deref(), Some("paid"));
        assert!(receipt.transactions.is_empty());
    }

    #[test]
    fn test_receipt_grandtotal_is_money() {
        let receipt: Receipt = serde_json::from_str(
            r#"{"receipt_id": 1, "grandtotal": {"amount": 5499, "divisor": 100, "currency_code": "USD"}}"#,
        )
        .unwrap();
        assert!((receipt.grandtotal.unwrap().to_unit() - 54.99).abs() < f64::EPSILON);
    }
}
