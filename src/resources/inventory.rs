//! Listing inventory operations and reconciliation.
//!
//! Etsy's inventory endpoint is complete-replacement: a PUT must carry the
//! entire product/offering structure, and partial payloads silently delete
//! whatever they omit. The read and write shapes also differ — reads return
//! identifiers and `Money` objects, writes must omit the identifiers and
//! give prices as plain floats.
//!
//! [`InventoryUpdate::from_inventory`] performs the read-to-write conversion
//! (stripping every read-only field), and
//! [`ListingInventoryClient::update_price_and_quantity`] is the full
//! fetch-merge-replace cycle for per-SKU price and quantity changes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clients::{ApiError, ApiRequest, HttpClient, HttpMethod, Payload};
use crate::resources::Money;

/// A listing's inventory as the API returns it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingInventory {
    /// The products (SKU variations) of the listing.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Property IDs price varies on.
    #[serde(default)]
    pub price_on_property: Vec<u64>,
    /// Property IDs quantity varies on.
    #[serde(default)]
    pub quantity_on_property: Vec<u64>,
    /// Property IDs SKU varies on.
    #[serde(default)]
    pub sku_on_property: Vec<u64>,
}

/// One product (SKU variation) in the read shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier. Read-only; never sent back.
    #[serde(default)]
    pub product_id: Option<u64>,
    /// The product's SKU; Etsy permits the empty string.
    #[serde(default)]
    pub sku: String,
    /// Whether the product has been deleted. Read-only.
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// The product's offerings.
    #[serde(default)]
    pub offerings: Vec<Offering>,
    /// Variation property values; entries carry read-only `scale_name` and
    /// `property_name` fields that must be stripped before writing.
    #[serde(default)]
    pub property_values: Vec<serde_json::Value>,
}

/// One offering in the read shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Offering {
    /// Server-assigned identifier. Read-only; never sent back.
    #[serde(default)]
    pub offering_id: Option<u64>,
    /// Price as a scaled `Money` object. Writes take a float instead.
    pub price: Money,
    /// Quantity available.
    pub quantity: u64,
    /// Whether the offering is purchasable.
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    /// Whether the offering has been deleted. Read-only.
    #[serde(default)]
    pub is_deleted: Option<bool>,
}

const fn default_true() -> bool {
    true
}

/// The complete-replacement write shape for a listing's inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    /// Every product the listing should have after the update.
    pub products: Vec<ProductUpdate>,
    /// Property IDs price varies on.
    pub price_on_property: Vec<u64>,
    /// Property IDs quantity varies on.
    pub quantity_on_property: Vec<u64>,
    /// Property IDs SKU varies on.
    pub sku_on_property: Vec<u64>,
}

/// One product in the write shape: no identifiers, no deletion flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// The product's SKU.
    pub sku: String,
    /// Variation property values with read-only fields stripped.
    pub property_values: Vec<serde_json::Value>,
    /// The product's offerings.
    pub offerings: Vec<OfferingUpdate>,
}

/// One offering in the write shape: price as a plain float.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferingUpdate {
    /// Price in whole currency units.
    pub price: f64,
    /// Quantity available.
    pub quantity: u64,
    /// Whether the offering is purchasable.
    pub is_enabled: bool,
}

/// A per-SKU change for [`ListingInventoryClient::update_price_and_quantity`].
///
/// Only the fields set to `Some` are applied; everything else keeps its
/// fetched value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkuChange {
    /// New price in whole currency units.
    pub price: Option<f64>,
    /// New quantity.
    pub quantity: Option<u64>,
    /// New enabled state.
    pub enabled: Option<bool>,
}

impl InventoryUpdate {
    /// Converts a fetched inventory into the write shape.
    ///
    /// Strips every read-only field: `product_id`, `offering_id`,
    /// `is_deleted`, and the `scale_name`/`property_name` keys inside
    /// property values. Prices convert from `Money` to whole-unit floats.
    /// Every fetched product is carried over, which is what makes a
    /// subsequent PUT a faithful complete replacement.
    #[must_use]
    pub fn from_inventory(inventory: &ListingInventory) -> Self {
        let products = inventory
            .products
            .iter()
            .map(|product| ProductUpdate {
                sku: product.sku.clone(),
                property_values: product
                    .property_values
                    .iter()
                    .map(strip_property_value)
                    .collect(),
                offerings: product
                    .offerings
                    .iter()
                    .map(|offering| OfferingUpdate {
                        price: offering.price.to_unit(),
                        quantity: offering.quantity,
                        is_enabled: offering.is_enabled,
                    })
                    .collect(),
            })
            .collect();

        Self {
            products,
            price_on_property: inventory.price_on_property.clone(),
            quantity_on_property: inventory.quantity_on_property.clone(),
            sku_on_property: inventory.sku_on_property.clone(),
        }
    }

    /// Converts a fetched inventory into the write shape, applying per-SKU
    /// overrides along the way.
    ///
    /// Products whose SKU has no entry in `changes` pass through unchanged;
    /// change entries whose SKU is not in the inventory are ignored.
    #[must_use]
    pub fn reconcile(inventory: &ListingInventory, changes: &HashMap<String, SkuChange>) -> Self {
        let mut update = Self::from_inventory(inventory);

        for product in &mut update.products {
            let Some(change) = changes.get(&product.sku) else {
                continue;
            };
            for offering in &mut product.offerings {
                if let Some(price) = change.price {
                    offering.price = price;
                }
                if let Some(quantity) = change.quantity {
                    offering.quantity = quantity;
                }
                if let Some(enabled) = change.enabled {
                    offering.is_enabled = enabled;
                }
            }
        }

        update
    }
}

/// Removes the read-only keys from a property value entry.
fn strip_property_value(value: &serde_json::Value) -> serde_json::Value {
    let mut value = value.clone();
    if let Some(object) = value.as_object_mut() {
        object.remove("scale_name");
        object.remove("property_name");
    }
    value
}

/// Client for listing inventory endpoints.
#[derive(Clone, Debug)]
pub struct ListingInventoryClient {
    http: Arc<HttpClient>,
}

impl ListingInventoryClient {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches a listing's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get(&self, listing_id: u64) -> Result<ListingInventory, ApiError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/listings/{listing_id}/inventory"))
                .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Replaces a listing's inventory with the given structure.
    ///
    /// The payload must be complete; this is exactly what the server will
    /// hold afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn put(
        &self,
        listing_id: u64,
        update: &InventoryUpdate,
    ) -> Result<ListingInventory, ApiError> {
        let body = serde_json::to_value(update)?;
        let request =
            ApiRequest::builder(HttpMethod::Put, format!("/listings/{listing_id}/inventory"))
                .payload(Payload::Json(body))
                .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Applies per-SKU price/quantity changes via fetch-merge-replace.
    ///
    /// Fetches the current inventory, applies the overrides, and PUTs the
    /// complete structure back. A fetch failure propagates without any
    /// update being attempted; an update failure propagates verbatim and is
    /// not retried here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the fetch or the replacement fails.
    pub async fn update_price_and_quantity(
        &self,
        listing_id: u64,
        changes: &HashMap<String, SkuChange>,
    ) -> Result<ListingInventory, ApiError> {
        let inventory = self.get(listing_id).await?;
        debug!(
            listing_id,
            products = inventory.products.len(),
            changes = changes.len(),
            "Reconciling inventory"
        );

        let update = InventoryUpdate::reconcile(&inventory, changes);
        let result = self.put(listing_id, &update).await?;

        info!(listing_id, "Inventory updated");
        Ok(result)
    }
}
