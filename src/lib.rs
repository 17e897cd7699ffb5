//! # Etsy API Rust SDK
//!
//! A Rust SDK for the Etsy v3 Open API, providing OAuth 2.0 + PKCE
//! authentication, rate-limit-aware request execution, typed resource
//! clients, complete-replacement inventory reconciliation, and sequential
//! bulk operations for shop-management tooling.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`EtsyConfig`] and [`EtsyConfigBuilder`]
//! - Validated newtypes for the API keystring and redirect URI
//! - The full OAuth authorization-code flow with PKCE via [`TokenManager`]
//! - Transparent token refresh with a pluggable [`CredentialStore`]
//! - A rate-limited, retrying request executor ([`clients::HttpClient`])
//! - Typed resource clients for shops, listings, inventory, receipts,
//!   images, shipping profiles, and return policies ([`resources`])
//! - Fetch-merge-replace inventory reconciliation
//!   ([`resources::ListingInventoryClient`])
//! - A sequential, failure-tolerant bulk orchestrator ([`bulk::BulkRunner`])
//!
//! ## Quick Start
//!
//! ```rust
//! use etsy_api::{EtsyConfig, ApiKey, RedirectUri};
//!
//! let config = EtsyConfig::builder()
//!     .api_key(ApiKey::new("your-keystring").unwrap())
//!     .redirect_uri(RedirectUri::new("http://localhost:3003/callback").unwrap())
//!     .scopes("listings_r listings_w shops_r".parse().unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## OAuth Authentication
//!
//! Etsy v3 requires the authorization-code flow with PKCE for every app:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use etsy_api::{EtsyClient, MemoryCredentialStore};
//!
//! let client = EtsyClient::new(Arc::new(config), Arc::new(MemoryCredentialStore::new()));
//! let tokens = client.token_manager();
//!
//! // Step 1: Begin authorization
//! let begun = tokens.begin_authorization();
//! // Send the user's browser to begun.auth_url; Etsy redirects back with
//! // ?code=..&state=..
//!
//! // Step 2: Exchange the code (the session is single-use)
//! let token = tokens
//!     .complete_authorization(&code, &returned_state, begun.session)
//!     .await?;
//!
//! // From here the SDK refreshes transparently before expiry.
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! let user = client.shops().me().await?;
//! let shop_id = user.shop_id.expect("seller account");
//!
//! // Every active listing, paginated transparently
//! let listings = client.listings().list_all(shop_id, "active").await?;
//!
//! // Per-SKU price/quantity updates via complete-replacement reconciliation
//! use std::collections::HashMap;
//! use etsy_api::resources::SkuChange;
//!
//! let mut changes = HashMap::new();
//! changes.insert("SPOON-01".to_string(), SkuChange {
//!     price: Some(24.99),
//!     quantity: Some(10),
//!     enabled: None,
//! });
//! client.inventory().update_price_and_quantity(listing_id, &changes).await?;
//! ```
//!
//! ## Bulk Operations
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use etsy_api::bulk::BulkRunner;
//!
//! let cancel = Arc::new(AtomicBool::new(false));
//! let listings_client = client.listings();
//! let report = BulkRunner::run(
//!     new_listings,
//!     |item| {
//!         let listings = listings_client.clone();
//!         async move {
//!             let created = listings.create(shop_id, &item).await?;
//!             Ok(Some(created.listing_id.to_string()))
//!         }
//!     },
//!     None,
//!     &cancel,
//! )
//! .await;
//! println!("{} created, {} failed", report.succeeded(), report.failed());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and credential storage are
//!   instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime
//! - **Rate-limit safe by construction**: all requests funnel through one
//!   pacing gate; bulk work is sequential on purpose

pub mod auth;
pub mod bulk;
pub mod clients;
pub mod clock;
pub mod config;
pub mod error;
pub mod resources;

// Re-export public types at crate root for convenience
pub use auth::{
    AuthError, AuthScopes, BeginAuthResult, CredentialStore, MemoryCredentialStore, OAuthToken,
    PkceSession, TokenManager,
};
pub use config::{ApiKey, EtsyConfig, EtsyConfigBuilder, RedirectUri};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ApiRequest, ApiRequestBuilder, ApiResponse, AuditEvent, AuditHook, FilePart,
    FormValue, HttpMethod, InvalidApiRequestError, Payload, QuotaSnapshot,
};

// Re-export the assembled client and bulk orchestrator
pub use bulk::{BulkProgress, BulkRecord, BulkReport, BulkRunner, BulkStatus};
pub use resources::EtsyClient;
