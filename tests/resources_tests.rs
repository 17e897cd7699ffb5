//! Integration tests for the typed resource clients.
//!
//! Each test pins down the wire shape of one endpoint family: paths, query
//! parameters, and the encoding quirks (form arrays, rank-as-string,
//! multipart uploads).

use std::sync::Arc;

use etsy_api::auth::{CredentialStore, MemoryCredentialStore, OAuthToken, TOKEN_KEY};
use etsy_api::clock::{Clock, ManualClock};
use etsy_api::resources::{NewListing, NewReturnPolicy, NewShippingProfile};
use etsy_api::{ApiKey, EtsyClient, EtsyConfig, RedirectUri};
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str) -> Arc<EtsyConfig> {
    Arc::new(
        EtsyConfig::builder()
            .api_key(ApiKey::new("test-keystring").unwrap())
            .redirect_uri(RedirectUri::new("http://localhost:3003/callback").unwrap())
            .api_base_url(server_uri.to_string())
            .token_url(format!("{server_uri}/v3/public/oauth/token"))
            .build()
            .unwrap(),
    )
}

fn test_client(server_uri: &str) -> EtsyClient {
    let store = Arc::new(MemoryCredentialStore::new());
    let clock = Arc::new(ManualClock::default());

    let token = OAuthToken {
        access_token: "V1".to_string(),
        refresh_token: Some("R1".to_string()),
        expires_at: clock.now() + chrono::Duration::hours(1),
    };
    store.set(TOKEN_KEY, &serde_json::to_string(&token).unwrap());

    EtsyClient::with_clock(
        test_config(server_uri),
        store as Arc<dyn CredentialStore>,
        clock as Arc<dyn Clock>,
    )
}

/// A client with no stored token; only API-key endpoints can succeed.
fn unauthenticated_client(server_uri: &str) -> EtsyClient {
    EtsyClient::with_clock(
        test_config(server_uri),
        Arc::new(MemoryCredentialStore::new()) as Arc<dyn CredentialStore>,
        Arc::new(ManualClock::default()) as Arc<dyn Clock>,
    )
}

fn listing_json(listing_id: u64) -> serde_json::Value {
    serde_json::json!({
        "listing_id": listing_id,
        "title": "Hand-carved spoon",
        "state": "draft",
        "quantity": 3,
        "tags": ["wood"]
    })
}

#[tokio::test]
async fn test_me_fetches_the_authenticated_user() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer V1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_id": 501,
            "login_name": "woodshop",
            "shop_id": 9001
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.shops().me().await.unwrap();
    assert_eq!(user.user_id, 501);
    assert_eq!(user.shop_id, Some(9001));
}

#[tokio::test]
async fn test_user_shops_handles_bare_shop_object() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    // Single-shop accounts get a bare object, not the paginated envelope.
    Mock::given(method("GET"))
        .and(path("/users/me/shops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shop_id": 9001,
            "shop_name": "woodshop"
        })))
        .mount(&server)
        .await;

    let shops = client.shops().user_shops().await.unwrap();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].shop_id, 9001);
}

#[tokio::test]
async fn test_create_listing_encodes_form_arrays() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/shops/9001/listings"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("title=Hand-carved%20spoon"))
        .and(body_string_contains("tags[]=wood&tags[]=kitchen"))
        .and(body_string_contains("sku[]=SPOON-01"))
        .respond_with(ResponseTemplate::new(201).set_body_json(listing_json(12345)))
        .expect(1)
        .mount(&server)
        .await;

    let listing = NewListing {
        title: "Hand-carved spoon".to_string(),
        description: "Walnut".to_string(),
        price: 24.5,
        quantity: 3,
        who_made: "i_did".to_string(),
        when_made: "made_to_order".to_string(),
        taxonomy_id: 1633,
        tags: vec!["wood".to_string(), "kitchen".to_string()],
        sku: Some("SPOON-01".to_string()),
        ..NewListing::default()
    };

    let created = client.listings().create(9001, &listing).await.unwrap();
    assert_eq!(created.listing_id, 12345);
}

#[tokio::test]
async fn test_list_all_walks_offset_pagination() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let full_page: Vec<serde_json::Value> = (0..100).map(listing_json).collect();
    Mock::given(method("GET"))
        .and(path("/shops/9001/listings"))
        .and(query_param("state", "active"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 101,
            "results": full_page
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shops/9001/listings"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 101,
            "results": [listing_json(100)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listings = client.listings().list_all(9001, "active").await.unwrap();
    assert_eq!(listings.len(), 101);
    assert_eq!(listings[100].listing_id, 100);
}

#[tokio::test]
async fn test_publish_patches_state_to_active() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("PATCH"))
        .and(path("/shops/9001/listings/12345"))
        .and(body_string_contains("state=active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "listing_id": 12345,
            "state": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client.listings().publish(9001, 12345).await.unwrap();
    assert_eq!(listing.state.as_deref(), Some("active"));
}

#[tokio::test]
async fn test_image_upload_is_multipart_with_rank_as_string() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/shops/9001/listings/12345/images"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "listing_image_id": 777,
            "listing_id": 12345,
            "rank": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let image = client
        .images()
        .upload(9001, 12345, b"fake jpeg bytes".to_vec(), "photo.jpg", 1)
        .await
        .unwrap();
    assert_eq!(image.listing_image_id, 777);

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.method.to_string().eq_ignore_ascii_case("post"))
        .unwrap();

    let headers = format!("{:?}", upload.headers).to_lowercase();
    assert!(headers.contains("multipart/form-data"));

    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"rank\""));
    assert!(body.contains("\r\n1\r\n"));
    assert!(body.contains("filename=\"photo.jpg\""));
    assert!(body.contains("fake jpeg bytes"));
}

#[tokio::test]
async fn test_create_shipment_posts_tracking_json() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/shops/9001/receipts/3001/tracking"))
        .and(body_partial_json(serde_json::json!({
            "tracking_code": "1Z999AA10123456784",
            "carrier_name": "usps",
            "send_bcc": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "receipt_id": 3001,
            "status": "Completed",
            "is_shipped": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client
        .receipts()
        .create_shipment(9001, 3001, "1Z999AA10123456784", "usps", true)
        .await
        .unwrap();
    assert_eq!(receipt.receipt_id, 3001);
    assert_eq!(receipt.is_shipped, Some(true));
}

#[tokio::test]
async fn test_shipping_profile_defaults_post_as_json() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/shops/9001/shipping-profiles"))
        .and(body_partial_json(serde_json::json!({
            "title": "US Standard Shipping",
            "origin_country_iso": "US",
            "min_processing_time": 1,
            "max_processing_time": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shipping_profile_id": 88,
            "title": "US Standard Shipping"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client
        .shipping_profiles()
        .create(9001, &NewShippingProfile::default())
        .await
        .unwrap();
    assert_eq!(profile.shipping_profile_id, 88);
}

#[tokio::test]
async fn test_return_policy_defaults_post_as_json() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/shops/9001/policies/return"))
        .and(body_partial_json(serde_json::json!({
            "accepts_returns": true,
            "accepts_exchanges": true,
            "return_deadline": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "return_policy_id": 5,
            "accepts_returns": true,
            "accepts_exchanges": true,
            "return_deadline": 30
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = client
        .return_policies()
        .create(9001, &NewReturnPolicy::default())
        .await
        .unwrap();
    assert_eq!(policy.return_policy_id, 5);
}

#[tokio::test]
async fn test_ping_works_without_oauth_and_sends_no_bearer() {
    let server = MockServer::start().await;
    let client = unauthenticated_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/openapi-ping"))
        .and(header("x-api-key", "test-keystring"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"application_id": 12345})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = client.ping().await.unwrap();
    assert_eq!(body["application_id"], 12345);

    let requests = server.received_requests().await.unwrap();
    let headers = format!("{:?}", requests[0].headers).to_lowercase();
    assert!(!headers.contains("authorization"));
}
