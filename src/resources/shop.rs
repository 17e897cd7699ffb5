//! Shop and user operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, ApiRequest, FormValue, HttpClient, HttpMethod, Payload};
use crate::resources::Paginated;

/// The authenticated Etsy user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub user_id: u64,
    /// The user's login name.
    #[serde(default)]
    pub login_name: Option<String>,
    /// Primary email, when the `email_r` scope was granted.
    #[serde(default)]
    pub email: Option<String>,
    /// The user's shop, if they have one.
    #[serde(default)]
    pub shop_id: Option<u64>,
}

/// An Etsy shop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shop {
    /// Unique shop identifier.
    pub shop_id: u64,
    /// The shop's URL slug.
    #[serde(default)]
    pub shop_name: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Shop announcement text.
    #[serde(default)]
    pub announcement: Option<String>,
    /// Public shop URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Currency the shop lists in.
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Client for shop and user endpoints.
#[derive(Clone, Debug)]
pub struct Shops {
    http: Arc<HttpClient>,
}

impl Shops {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn me(&self) -> Result<User, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/users/me").build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Fetches the shops owned by the authenticated user.
    ///
    /// Etsy returns either a paginated array or, for single-shop accounts,
    /// a bare shop object; both shapes are handled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn user_shops(&self) -> Result<Vec<Shop>, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/users/me/shops").build()?;
        let response = self.http.send(request).await?;

        if response.body.get("results").is_some() {
            let page: Paginated<Shop> = response.parse()?;
            Ok(page.results)
        } else {
            let shop: Shop = response.parse()?;
            Ok(vec![shop])
        }
    }

    /// Fetches a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get(&self, shop_id: u64) -> Result<Shop, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/shops/{shop_id}")).build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }

    /// Updates shop fields (title, announcement, and so on).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(
        &self,
        shop_id: u64,
        fields: Vec<(String, FormValue)>,
    ) -> Result<Shop, ApiError> {
        let request = ApiRequest::builder(HttpMethod::Put, format!("/shops/{shop_id}"))
            .payload(Payload::Form(fields))
            .build()?;
        let response = self.http.send(request).await?;
        Ok(response.parse()?)
    }
}
