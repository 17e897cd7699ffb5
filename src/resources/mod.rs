//! Typed resource clients for the Etsy v3 API.
//!
//! Each client is a thin wrapper over [`HttpClient`]: it knows its resource
//! family's paths, parameter encodings, and response shapes, and nothing
//! about retries or credentials. [`EtsyClient`] wires the whole stack
//! together and hands out the per-resource clients.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use etsy_api::{EtsyClient, EtsyConfig, ApiKey, RedirectUri, MemoryCredentialStore};
//!
//! let config = Arc::new(
//!     EtsyConfig::builder()
//!         .api_key(ApiKey::new("keystring")?)
//!         .redirect_uri(RedirectUri::new("http://localhost:3003/callback")?)
//!         .scopes("listings_r listings_w shops_r".parse()?)
//!         .build()?,
//! );
//! let client = EtsyClient::new(config, Arc::new(MemoryCredentialStore::new()));
//!
//! // Authorize first (browser round-trip elided), then:
//! let user = client.shops().me().await?;
//! let listings = client.listings().list_all(user.shop_id.unwrap(), "active").await?;
//! ```

mod image;
mod inventory;
mod listing;
mod receipt;
mod return_policy;
mod shipping_profile;
mod shop;

pub use image::{ListingImage, ListingImages};
pub use inventory::{
    InventoryUpdate, ListingInventory, ListingInventoryClient, Offering, OfferingUpdate, Product,
    ProductUpdate, SkuChange,
};
pub use listing::{Listing, Listings, NewListing};
pub use receipt::{Receipt, Receipts};
pub use return_policy::{NewReturnPolicy, ReturnPolicies, ReturnPolicy};
pub use shipping_profile::{NewShippingProfile, ShippingProfile, ShippingProfiles};
pub use shop::{Shop, Shops, User};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{CredentialStore, TokenManager};
use crate::clients::{ApiError, ApiRequest, HttpClient, HttpMethod};
use crate::clock::Clock;
use crate::config::EtsyConfig;

/// A monetary amount as Etsy returns it: scaled integer plus divisor.
///
/// Etsy reads money as `{amount, divisor, currency_code}` but the inventory
/// write shape takes a plain float; [`Money::to_unit`] performs that
/// conversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in the currency's smallest unit, scaled by `divisor`.
    pub amount: i64,
    /// The scaling divisor (100 for most currencies).
    pub divisor: i64,
    /// ISO currency code.
    pub currency_code: String,
}

impl Money {
    /// Returns the amount in whole currency units.
    #[must_use]
    pub fn to_unit(&self) -> f64 {
        if self.divisor == 0 {
            return 0.0;
        }
        self.amount as f64 / self.divisor as f64
    }
}

/// A paginated result set, Etsy's standard list envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total matching results on the server, not just this page.
    #[serde(default)]
    pub count: u64,
    /// This page of results.
    pub results: Vec<T>,
}

/// The assembled Etsy API client.
///
/// Owns the token manager and HTTP executor and hands out per-resource
/// clients. Cheap to clone; all clones share the same limiter and token
/// state, which is what keeps a multi-task process inside the rate limits.
#[derive(Clone, Debug)]
pub struct EtsyClient {
    http: Arc<HttpClient>,
}

impl EtsyClient {
    /// Creates a client from a config and credential store.
    #[must_use]
    pub fn new(config: Arc<EtsyConfig>, store: Arc<dyn CredentialStore>) -> Self {
        let tokens = Arc::new(TokenManager::new(Arc::clone(&config), store));
        Self {
            http: Arc::new(HttpClient::new(config, tokens)),
        }
    }

    /// Creates a client with an explicit clock (used by tests to simulate
    /// rate-limit waits and token expiry).
    #[must_use]
    pub fn with_clock(
        config: Arc<EtsyConfig>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenManager::with_clock(
            Arc::clone(&config),
            store,
            Arc::clone(&clock),
        ));
        Self {
            http: Arc::new(HttpClient::with_clock(config, tokens, clock)),
        }
    }

    /// Creates a client around an already-built executor.
    #[must_use]
    pub const fn from_http(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the token manager, for driving the authorization flow.
    #[must_use]
    pub fn token_manager(&self) -> Arc<TokenManager> {
        Arc::clone(self.http.token_manager())
    }

    /// Returns the underlying executor.
    #[must_use]
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Shop and user operations.
    #[must_use]
    pub fn shops(&self) -> Shops {
        Shops::new(Arc::clone(&self.http))
    }

    /// Listing operations.
    #[must_use]
    pub fn listings(&self) -> Listings {
        Listings::new(Arc::clone(&self.http))
    }

    /// Listing inventory operations, including reconciliation.
    #[must_use]
    pub fn inventory(&self) -> ListingInventoryClient {
        ListingInventoryClient::new(Arc::clone(&self.http))
    }

    /// Receipt (order) operations.
    #[must_use]
    pub fn receipts(&self) -> Receipts {
        Receipts::new(Arc::clone(&self.http))
    }

    /// Listing image operations.
    #[must_use]
    pub fn images(&self) -> ListingImages {
        ListingImages::new(Arc::clone(&self.http))
    }

    /// Shipping profile operations.
    #[must_use]
    pub fn shipping_profiles(&self) -> ShippingProfiles {
        ShippingProfiles::new(Arc::clone(&self.http))
    }

    /// Return policy operations.
    #[must_use]
    pub fn return_policies(&self) -> ReturnPolicies {
        ReturnPolicies::new(Arc::clone(&self.http))
    }

    /// Connectivity check against the `openapi-ping` endpoint.
    ///
    /// Authenticates with the API key alone; works before any OAuth flow
    /// has completed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn ping(&self) -> Result<serde_json::Value, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/openapi-ping")
            .unauthenticated()
            .build()?;
        let response = self.http.send(request).await?;
        Ok(response.body)
    }
}

// Verify EtsyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EtsyClient>();
};
