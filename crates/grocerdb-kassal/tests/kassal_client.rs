//! Integration tests for `KassalClient` against a wiremock server.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grocerdb_kassal::{KassalClient, KassalError, ProductQuery, ProductSearch, StoreQuery};

fn test_client(base_url: &str) -> KassalClient {
    KassalClient::with_base_url("test-key", base_url, 5, 0, 0)
        .expect("client construction should not fail")
}

fn product_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "brand": null,
        "vendor": null,
        "ean": null,
        "url": format!("https://meny.no/varer/{id}"),
        "image": null,
        "description": null,
        "ingredients": null,
        "current_price": 24.9,
        "current_unit_price": null,
        "weight": null,
        "weight_unit": null,
        "store": null,
        "price_history": [],
        "allergens": [],
        "nutrition": [],
        "created_at": "2024-01-01T00:00:00.000000Z",
        "updated_at": "2024-01-02T00:00:00.000000Z"
    })
}

fn products_page(products: Vec<serde_json::Value>) -> serde_json::Value {
    let count = products.len();
    json!({
        "data": products,
        "links": {
            "first": "https://kassal.app/api/v1/products?page=1",
            "last": null,
            "prev": null,
            "next": null
        },
        "meta": {
            "current_page": 1,
            "from": if count > 0 { json!(1) } else { json!(null) },
            "path": "https://kassal.app/api/v1/products",
            "per_page": 10,
            "to": if count > 0 { json!(count) } else { json!(null) }
        }
    })
}

#[tokio::test]
async fn products_sends_bearer_token_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("search", "melk"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("unique", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(vec![product_json(1, "Tine Lettmelk 1L")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = ProductQuery {
        search: Some("melk".to_string()),
        page: 2,
        size: 5,
        unique: Some(true),
        ..ProductQuery::default()
    };
    let page = client.products(&query).await.expect("products page");

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Tine Lettmelk 1L");
    assert!(page.data[0].sale.is_none());
    assert_eq!(page.meta.current_page, 1);
}

#[tokio::test]
async fn rate_limit_is_reported_as_distinct_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "42"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .products(&ProductQuery::default())
        .await
        .expect_err("429 should fail");

    assert!(
        matches!(err, KassalError::RateLimited { retry_after_secs: 42 }),
        "expected RateLimited, got: {err:?}"
    );
}

#[tokio::test]
async fn unknown_product_id_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/id/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.product_by_id(999).await.expect_err("404 should fail");
    assert!(matches!(err, KassalError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn server_error_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/ean/7038010000737"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .products_by_ean("7038010000737")
        .await
        .expect_err("502 should fail");
    assert!(
        matches!(err, KassalError::UnexpectedStatus { status: 502, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/id/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": {\"id\": \"five\"}}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.product_by_id(5).await.expect_err("bad body should fail");
    match err {
        KassalError::Deserialize { context, .. } => assert_eq!(context, "products/id/5"),
        other => panic!("expected Deserialize, got: {other:?}"),
    }
}

#[tokio::test]
async fn product_by_id_unwraps_data_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/id/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": product_json(7, "Yoghurt")})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let product = client.product_by_id(7).await.expect("product");
    assert_eq!(product.id, 7);
    assert_eq!(product.name, "Yoghurt");
}

#[tokio::test]
async fn products_by_ean_returns_all_store_listings() {
    let server = MockServer::start().await;

    let body = json!({
        "data": {
            "ean": "7038010000737",
            "products": [{
                "id": 1,
                "name": "Tine Lettmelk 1L",
                "vendor": "Tine",
                "brand": "Tine",
                "description": null,
                "ingredients": null,
                "url": "https://kiwi.no/lettmelk",
                "image": null,
                "store": {"name": "Kiwi", "code": "KIWI", "url": "https://kiwi.no", "logo": "https://kiwi.no/logo.png"},
                "current_price": {"price": 23.9, "unit_price": 23.9, "date": "2024-03-01T00:00:00.000000Z"},
                "weight": 1.0,
                "weight_unit": "l",
                "price_history": [],
                "kassalapp": {"url": "https://kassal.app/vare/1", "opengraph": null},
                "created_at": "2024-01-01T00:00:00.000000Z",
                "updated_at": "2024-03-01T00:00:00.000000Z"
            }],
            "allergens": [],
            "nutrition": [{"code": "energi_kcal", "display_name": "Kalorier", "amount": 37.0, "unit": "kcal"}]
        }
    });

    Mock::given(method("GET"))
        .and(path("/products/ean/7038010000737"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let set = client.products_by_ean("7038010000737").await.expect("ean set");
    assert_eq!(set.ean, "7038010000737");
    assert_eq!(set.products.len(), 1);
    assert_eq!(
        set.products[0].current_price.as_ref().map(|p| p.price),
        Some(23.9)
    );
    assert_eq!(set.nutrition.len(), 1);
}

#[tokio::test]
async fn physical_stores_validates_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/physical-stores"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = StoreQuery {
        lng: Some(10.75),
        ..StoreQuery::default()
    };
    let err = client
        .physical_stores(&query)
        .await
        .expect_err("lng without lat should fail");
    assert!(matches!(err, KassalError::InvalidRequest(_)));
}

#[tokio::test]
async fn physical_store_parses_camel_case_fields() {
    let server = MockServer::start().await;

    let body = json!({
        "data": {
            "id": 123,
            "group": "KIWI",
            "name": "Kiwi Grünerløkka",
            "address": "Thorvald Meyers gate 1",
            "phone": null,
            "email": null,
            "fax": null,
            "logo": null,
            "website": "https://kiwi.no",
            "detailUrl": "https://kassal.app/butikker/123",
            "position": {"lat": 59.92, "lng": 10.76},
            "openingHours": {
                "monday": "07-23", "tuesday": "07-23", "wednesday": "07-23",
                "thursday": "07-23", "friday": "07-23", "saturday": "08-21", "sunday": null
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/physical-stores/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = client.physical_store("123").await.expect("store");
    assert_eq!(store.name, "Kiwi Grünerløkka");
    assert_eq!(
        store.detail_url.as_deref(),
        Some("https://kassal.app/butikker/123")
    );
    assert_eq!(
        store.opening_hours.and_then(|h| h.saturday).as_deref(),
        Some("08-21")
    );
}

#[tokio::test]
async fn best_match_requests_one_result_and_returns_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "Grandiosa"))
        .and(query_param("size", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(vec![product_json(11, "Grandiosa Original")])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let hit = client.best_match("Grandiosa").await.expect("search");
    assert_eq!(hit.map(|p| p.id), Some(11));
}

#[tokio::test]
async fn best_match_returns_none_for_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(vec![])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let hit = client.best_match("nothing").await.expect("search");
    assert!(hit.is_none());
}
