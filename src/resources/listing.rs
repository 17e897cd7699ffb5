//! Listing operations.
//!
//! Etsy's listing write endpoints are form-encoded, with list-valued fields
//! (tags, materials, sku) using the `key[]=` array convention. Creation
//! always produces a draft unless a state is given; publishing is a PATCH
//! that flips the state to `active`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ApiError, ApiRequest, FormValue, HttpClient, HttpMethod, Payload};
use crate::resources::{Money, Paginated};

/// Maximum page size the listings endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// An Etsy listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Listing {
    /// Unique listing identifier.
    pub listing_id: u64,
    /// Listing title.
    #[serde(default)]
    pub title: Option<String>,
    /// Listing description.
    #[serde(default)]
    pub description: Option<String>,
    /// Listing state: `active`, `inactive`, `draft`, `expired`, etc.
    #[serde(default)]
    pub state: Option<String>,
    /// Total quantity across offerings.
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Listing price. Absent on some partial representations.
    #[serde(default)]
    pub price: Option<Money>,
    /// Lifetime view count.
    #[serde(default)]
    pub views: Option<u64>,
    /// Creation time as a Unix timestamp.
    #[serde(default)]
    pub created_timestamp: Option<i64>,
    /// Tags on the listing.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields for creating a listing.
///
/// Everything Etsy requires for a draft plus the common optional fields.
/// List-valued fields encode with the `key[]=` array syntax; a scalar SKU is
/// normalized to a one-element array, which is the shape the endpoint
/// expects.
#[derive(Clone, Debug, Default)]
pub struct NewListing {
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Price in whole currency units.
    pub price: f64,
    /// Initial quantity.
    pub quantity: u64,
    /// Who made the item (`i_did`, `someone_else`, `collective`).
    pub who_made: String,
    /// When it was made (`made_to_order`, `2020_2025`, etc.).
    pub when_made: String,
    /// Seller taxonomy node.
    pub taxonomy_id: u64,
    /// Shipping profile to attach.
    pub shipping_profile_id: Option<u64>,
    /// Return policy to attach.
    pub return_policy_id: Option<u64>,
    /// Tags, up to 13.
    pub tags: Vec<String>,
    /// Materials.
    pub materials: Vec<String>,
    /// SKU for the single default product.
    pub sku: Option<String>,
}

impl NewListing {
    /// Encodes the listing as form fields.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, FormValue)> {
        let mut fields = vec![
            ("title".to_string(), FormValue::single(&self.title)),
            (
                "description".to_string(),
                FormValue::single(&self.description),
            ),
            ("price".to_string(), FormValue::single(self.price)),
            ("quantity".to_string(), FormValue::single(self.quantity)),
            ("who_made".to_string(), FormValue::single(&self.who_made)),
            ("when_made".to_string(), FormValue::single(&self.when_made)),
            (
                "taxonomy_id".to_string(),
                FormValue::single(self.taxonomy_id),
            ),
        ];

        if let Some(id) = self.shipping_profile_id {
            fields.push(("shipping_profile_id".to_string(), FormValue::single(id)));
        }
        if let Some(id) = self.return_policy_id {
            fields.push(("return_policy_id".to_string(), FormValue::single(id)));
        }
        if !self.tags.is_empty() {
            fields.push(("tags".to_string(), FormValue::many(&self.tags)));
        }
        if !self.materials.is_empty() {
            fields.push(("materials".to_string(), FormValue::many(&self.materials)));
        }
        if let Some(sku) = &self.sku {
            // The endpoint takes sku as an array even for a single product.
            fields.push(("sku".to_string(), FormValue::many([sku])));
        }

        fields
    }
}

/// Client for listing endpoints.
#[derive(Clone, Debug)]
pub struct Listings {
    http: Arc<HttpClient>,
}

impl Listings {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches one page of a shop's listings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list(
        &self,
        shop_id: u64,
        state: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Paginated<Listing>, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/shops/{shop_id}/listings"))
            .query_param("state", state)
            .query_param("limit", limit)
            .query_param("offset", offset)
            .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Fetches every listing in the given state, walking offset pagination
    /// at the maximum page size.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if any page request fails.
    pub async fn list_all(&self, shop_id: u64, state: &str) -> Result<Vec<Listing>, ApiError> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.list(shop_id, state, MAX_PAGE_SIZE, offset).await?;
            let page_len = page.results.len();
            all.extend(page.results);
            if page_len < MAX_PAGE_SIZE as usize {
                break;
            }
            offset += MAX_PAGE_SIZE;
        }

        info!(shop_id, count = all.len(), "Fetched all listings");
        Ok(all)
    }

    /// Fetches a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get(&self, listing_id: u64) -> Result<Listing, ApiError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/listings/{listing_id}")).build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Creates a listing (as a draft unless Etsy defaults say otherwise).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create(&self, shop_id: u64, listing: &NewListing) -> Result<Listing, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Post, format!("/shops/{shop_id}/listings"))
            .payload(Payload::Form(listing.to_form()))
            .build()?;
        let response = self.http.send(request).await?;
        let created: Listing = response.parse()?;
        info!(listing_id = created.listing_id, "Created listing");
        Ok(created)
    }

    /// Updates listing fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(
        &self,
        shop_id: u64,
        listing_id: u64,
        fields: Vec<(String, FormValue)>,
    ) -> Result<Listing, ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Patch,
            format!("/shops/{shop_id}/listings/{listing_id}"),
        )
        .payload(Payload::Form(fields))
        .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Publishes a draft listing by setting its state to `active`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn publish(&self, shop_id: u64, listing_id: u64) -> Result<Listing, ApiError> {
        info!(listing_id, "Publishing listing");
        self.update(
            shop_id,
            listing_id,
            vec![("state".to_string(), FormValue::single("active"))],
        )
        .await
    }

    /// Deletes a listing permanently.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete(&self, listing_id: u64) -> Result<(), ApiError> {
        let request =
            ApiRequest::builder(HttpMethod::Delete, format!("/listings/{listing_id}")).build()?;
        self.http.send(request).await?;
        info!(listing_id, "Deleted listing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_listing_form_includes_required_fields() {
        let listing = NewListing {
            title: "Hand-carved spoon".to_string(),
            description: "Walnut".to_string(),
            price: 24.5,
            quantity: 3,
            who_made: "i_did".to_string(),
            when_made: "made_to_order".to_string(),
            taxonomy_id: 1633,
            ..NewListing::default()
        };

        let body = Payload::encode_form(&listing.to_form());
        assert!(body.contains("title=Hand-carved%20spoon"));
        assert!(body.contains("price=24.5"));
        assert!(body.contains("who_made=i_did"));
        assert!(body.contains("taxonomy_id=1633"));
        assert!(!body.contains("sku"));
    }

    #[test]
    fn test_scalar_sku_is_normalized_to_array() {
        let listing = NewListing {
            sku: Some("SPOON-01".to_string()),
            ..NewListing::default()
        };

        let body = Payload::encode_form(&listing.to_form());
        assert!(body.contains("sku[]=SPOON-01"));
        assert!(!body.contains("sku=SPOON-01"));
    }

    #[test]
    fn test_tags_encode_as_array() {
        let listing = NewListing {
            tags: vec!["wood".to_string(), "kitchen".to_string()],
            ..NewListing::default()
        };

        let body = Payload::encode_form(&listing.to_form());
        assert!(body.contains("tags[]=wood&tags[]=kitchen"));
    }

    #[test]
    fn test_listing_parses_partial_body() {
        let listing: Listing =
            serde_json::from_str(r#"{"listing_id": 9, "state": "draft"}"#).unwrap();
        assert_eq!(listing.listing_id, 9);
        assert_eq!(listing.state.as_deref(), Some("draft"));
        assert!(listing.price.is_none());
        assert!(listing.tags.is_empty());
    }
}
