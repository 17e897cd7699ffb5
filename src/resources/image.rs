//! Listing image operations.
//!
//! Image upload is the one multipart endpoint in the SDK. The `rank` field
//! must be transmitted as a string, and the Content-Type (with its boundary)
//! is computed by the transport, never set by hand.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ApiError, ApiRequest, FilePart, HttpClient, HttpMethod, Payload};

/// An image attached to a listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingImage {
    /// Unique image identifier.
    pub listing_image_id: u64,
    /// The listing the image belongs to.
    #[serde(default)]
    pub listing_id: Option<u64>,
    /// Full-resolution URL.
    #[serde(default)]
    pub url_fullxfull: Option<String>,
    /// Display position, 1-based.
    #[serde(default)]
    pub rank: Option<u64>,
}

/// Client for listing image endpoints.
#[derive(Clone, Debug)]
pub struct ListingImages {
    http: Arc<HttpClient>,
}

impl ListingImages {
    pub(crate) const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Uploads an image to a listing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn upload(
        &self,
        shop_id: u64,
        listing_id: u64,
        bytes: Vec<u8>,
        file_name: &str,
        rank: u32,
    ) -> Result<ListingImage, ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("/shops/{shop_id}/listings/{listing_id}/images"),
        )
        .payload(Payload::Multipart {
            // The endpoint requires rank as a string.
            fields: vec![("rank".to_string(), rank.to_string())],
            file: FilePart {
                name: "image".to_string(),
                file_name: file_name.to_string(),
                bytes,
            },
        })
        .build()?;
        let response = self.http.send(request).await?;

        let image: ListingImage = response.parse()?;
        info!(listing_id, image_id = image.listing_image_id, rank, "Uploaded listing image");
        Ok(image)
    }

    /// Deletes an image from a listing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete(
        &self,
        shop_id: u64,
        listing_id: u64,
        listing_image_id: u64,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("/shops/{shop_id}/listings/{listing_id}/images/{listing_image_id}"),
        )
        .build()?;
        self.http.send(request).await?;
        info!(listing_id, listing_image_id, "Deleted listing image");
        Ok(())
    }
}
