//! Integration tests for the fetch-merge-replace inventory cycle.
//!
//! The assertions that matter here are about the PUT body: the write must
//! carry every product (complete replacement), strip every read-only field,
//! and convert `Money` prices to plain floats.

use std::collections::HashMap;
use std::sync::Arc;

use etsy_api::auth::{CredentialStore, MemoryCredentialStore, OAuthToken, TOKEN_KEY};
use etsy_api::clock::{Clock, ManualClock};
use etsy_api::resources::SkuChange;
use etsy_api::{ApiError, ApiKey, EtsyClient, EtsyConfig, RedirectUri};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server_uri: &str) -> EtsyClient {
    let config = Arc::new(
        EtsyConfig::builder()
            .api_key(ApiKey::new("test-keystring").unwrap())
            .redirect_uri(RedirectUri::new("http://localhost:3003/callback").unwrap())
            .api_base_url(server_uri.to_string())
            .token_url(format!("{server_uri}/v3/public/oauth/token"))
            .build()
            .unwrap(),
    );
    let store = Arc::new(MemoryCredentialStore::new());
    let clock = Arc::new(ManualClock::default());

    let token = OAuthToken {
        access_token: "V1".to_string(),
        refresh_token: Some("R1".to_string()),
        expires_at: clock.now() + chrono::Duration::hours(1),
    };
    store.set(TOKEN_KEY, &serde_json::to_string(&token).unwrap());

    EtsyClient::with_clock(
        config,
        store as Arc<dyn CredentialStore>,
        clock as Arc<dyn Clock>,
    )
}

fn inventory_fixture() -> serde_json::Value {
    serde_json::json!({
        "products": [
            {
                "product_id": 111,
                "sku": "SKU-A",
                "is_deleted": false,
                "offerings": [
                    {
                        "offering_id": 211,
                        "price": {"amount": 1999, "divisor": 100, "currency_code": "USD"},
                        "quantity": 5,
                        "is_enabled": true,
                        "is_deleted": false
                    }
                ],
                "property_values": [
                    {"property_id": 200, "property_name": "Color", "scale_name": null, "values": ["Red"]}
                ]
            },
            {
                "product_id": 112,
                "sku": "SKU-B",
                "offerings": [
                    {
                        "offering_id": 212,
                        "price": {"amount": 2500, "divisor": 100, "currency_code": "USD"},
                        "quantity": 2,
                        "is_enabled": true
                    }
                ],
                "property_values": []
            },
            {
                "product_id": 113,
                "sku": "SKU-C",
                "offerings": [
                    {
                        "offering_id": 213,
                        "price": {"amount": 750, "divisor": 100, "currency_code": "USD"},
                        "quantity": 9,
                        "is_enabled": false
                    }
                ],
                "property_values": []
            }
        ],
        "price_on_property": [200],
        "quantity_on_property": [],
        "sku_on_property": [200]
    })
}

/// Pulls the body of the PUT request the server received.
async fn received_put_body(server: &MockServer) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.to_string().eq_ignore_ascii_case("put"))
        .expect("no PUT request received");
    serde_json::from_slice(&put.body).unwrap()
}

#[tokio::test]
async fn test_update_strips_read_only_fields_and_carries_every_product() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/listings/77/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/listings/77/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let mut changes = HashMap::new();
    changes.insert(
        "SKU-B".to_string(),
        SkuChange {
            price: Some(30.0),
            quantity: Some(7),
            enabled: None,
        },
    );

    client
        .inventory()
        .update_price_and_quantity(77, &changes)
        .await
        .unwrap();

    let body = received_put_body(&server).await;
    let text = body.to_string();

    // Read-only fields never reach the wire.
    assert!(!text.contains("product_id"));
    assert!(!text.contains("offering_id"));
    assert!(!text.contains("is_deleted"));
    assert!(!text.contains("property_name"));
    assert!(!text.contains("scale_name"));

    // Complete replacement: all three products, in order.
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["sku"], "SKU-A");
    assert_eq!(products[1]["sku"], "SKU-B");
    assert_eq!(products[2]["sku"], "SKU-C");

    // SKU-B got the new price and quantity, as plain numbers.
    assert_eq!(products[1]["offerings"][0]["price"], 30.0);
    assert_eq!(products[1]["offerings"][0]["quantity"], 7);

    // Untouched products keep their fetched values, Money converted to float.
    assert_eq!(products[0]["offerings"][0]["price"], 19.99);
    assert_eq!(products[0]["offerings"][0]["quantity"], 5);
    assert_eq!(products[2]["offerings"][0]["is_enabled"], false);

    // Variation structure survives with the surviving keys.
    assert_eq!(body["price_on_property"][0], 200);
    assert_eq!(products[0]["property_values"][0]["property_id"], 200);
}

#[tokio::test]
async fn test_two_sku_price_only_update_preserves_quantities() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/listings/42/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/listings/42/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let mut changes = HashMap::new();
    changes.insert(
        "SKU-A".to_string(),
        SkuChange {
            price: Some(21.5),
            ..SkuChange::default()
        },
    );
    changes.insert(
        "SKU-B".to_string(),
        SkuChange {
            price: Some(27.0),
            ..SkuChange::default()
        },
    );

    client
        .inventory()
        .update_price_and_quantity(42, &changes)
        .await
        .unwrap();

    let body = received_put_body(&server).await;
    let products = body["products"].as_array().unwrap();

    assert_eq!(products[0]["offerings"][0]["price"], 21.5);
    assert_eq!(products[1]["offerings"][0]["price"], 27.0);
    // Quantities and enabled states pass through untouched.
    assert_eq!(products[0]["offerings"][0]["quantity"], 5);
    assert_eq!(products[1]["offerings"][0]["quantity"], 2);
    assert_eq!(products[2]["offerings"][0]["price"], 7.5);
    assert_eq!(products[2]["offerings"][0]["is_enabled"], false);
}

#[tokio::test]
async fn test_fetch_failure_makes_no_update_attempt() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/listings/9/inventory"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/listings/9/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .inventory()
        .update_price_and_quantity(9, &HashMap::new())
        .await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[tokio::test]
async fn test_rejected_replacement_propagates_without_retry() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/listings/9/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_fixture()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/listings/9/inventory"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid inventory structure"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .inventory()
        .update_price_and_quantity(9, &HashMap::new())
        .await;
    match result {
        Err(ApiError::BadRequest { message }) => {
            assert!(message.contains("invalid inventory structure"));
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}
