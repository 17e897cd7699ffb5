//! Shipping profile operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ApiError, ApiRequest, HttpClient, HttpMethod, Payload};
use crate::resources::Paginated;

/// A shop shipping profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShippingProfile {
    /// Unique profile identifier.
    pub shipping_profile_id: u64,
    /// Profile title.
    #[serde(default)]
    pub title: Option<String>,
    /// ISO country code the items ship from.
    #[serde(default)]
    pub origin_country_iso: Option<String>,
    /// Minimum processing days.
    #[serde(default)]
    pub min_processing_days: Option<u32>,
    /// Maximum processing days.
    #[serde(default)]
    pub max_processing_days: Option<u32>,
}

/// Fields for creating a shipping profile.
///
/// The defaults describe a US standard-shipping profile with a 1-3 day
/// processing window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewShippingProfile {
    /// Profile title.
    pub title: String,
    /// ISO country code the items ship from.
    pub origin_country_iso: String,
    /// Cost to ship the first item, in whole currency units.
    pub primary_cost: f64,
    /// Cost for each additional item.
    pub secondary_cost: f64,
    /// Minimum processing days.
    pub min_processing_time: u32,
    /// Maximum processing days.
    pub max_processing_time: u32,
}

impl Default for NewShippingProfile {
    fn default() -> Self {
        Self {
            title: "US Standard Shipping".to_string(),
            origin_country_iso: "US".to_string(),
            primary_cost: 5.99,
            secondary_cost: 2.99,
            min_processing_time: 1,
            max_processing_time: 3,
        }
    }
}

/// Client for shipping profile endpoints.
#[derive(Clone, Debug)]
pub struct ShippingProfiles {
    http: Arc<HttpClient>,
}

impl ShippingProfiles {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches a shop's shipping profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list(&self, shop_id: u64) -> Result<Vec<ShippingProfile>, ApiError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/shops/{shop_id}/shipping-profiles"))
                .build()?;
        let response = self.http.send(request).await?;
        let page: Paginated<ShippingProfile> = response.parse()?;
        Ok(page.results)
    }

    /// Creates a shipping profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create(
        &self,
        shop_id: u64,
        profile: &NewShippingProfile,
    ) -> Result<ShippingProfile, ApiError> {
        let body = serde_json::to_value(profile)?;
        let request =
            ApiRequest::builder(HttpMethod::Post, format!("/shops/{shop_id}/shipping-profiles"))
                .payload(Payload::Json(body))
                .build()?;
        let response = self.http.send(request).await?;

        let created: ShippingProfile = response.parse()?;
        info!(
            shipping_profile_id = created.shipping_profile_id,
            "Created shipping profile"
        );
        Ok(created)
    }

    /// Updates fields on a shipping profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(
        &self,
        shop_id: u64,
        shipping_profile_id: u64,
        updates: serde_json::Value,
    ) -> Result<ShippingProfile, ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Put,
            format!("/shops/{shop_id}/shipping-profiles/{shipping_profile_id}"),
        )
        .payload(Payload::Json(updates))
        .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Deletes a shipping profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete(&self, shop_id: u64, shipping_profile_id: u64) -> Result<(), ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("/shops/{shop_id}/shipping-profiles/{shipping_profile_id}"),
        )
        .build()?;
        self.http.send(request).await?;
        info!(shipping_profile_id, "Deleted shipping profile");
        Ok(())
    }
}
