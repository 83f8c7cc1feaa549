//! Integration tests for `VisionClient` against a wiremock server.

use std::path::PathBuf;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use grocerdb_core::Sale;
use grocerdb_sales::{SaleExtractor, SalesError, VisionClient};

fn write_image(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content, "refusal": null },
            "finish_reason": "stop"
        }]
    })
}

fn client(base_url: &str) -> VisionClient {
    VisionClient::with_base_url("sk-test", base_url, "gpt-4o-2024-08-06", 5)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn extract_sends_image_and_parses_catalog() {
    let server = MockServer::start().await;
    let catalog = json!({
        "products": [
            {"name": "Grandiosa", "sale": {"type": "price", "price": 49.9, "discount_percentage": null, "n": null, "total_price": null}},
            {"name": "Coca-Cola 1,5L", "sale": {"type": "n_for_price", "price": null, "discount_percentage": null, "n": 3, "total_price": 60.0}}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-2024-08-06",
            "response_format": {"type": "json_schema"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&catalog.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "page1.png", b"\x89PNG fake");

    let result = client(&format!("{}/v1/", server.uri()))
        .extract(&image)
        .await
        .expect("extraction should succeed");

    assert_eq!(result.products.len(), 2);
    assert_eq!(result.products[0].sale, Sale::price(49.9).unwrap());
    assert_eq!(result.products[1].sale, Sale::n_for_price(3, 60.0).unwrap());

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let parts = &body["messages"][0]["content"];
    assert_eq!(parts[0]["type"], "text");
    assert!(parts[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("This is an image of a page from a promotional catalog"));
    let url = parts[1]["image_url"]["url"].as_str().unwrap();
    assert!(url.starts_with("data:image/png;base64,"), "got: {url}");
}

#[tokio::test]
async fn error_status_maps_to_extraction_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "page.jpg", b"jpeg");

    let err = client(&server.uri()).extract(&image).await.unwrap_err();
    match err {
        SalesError::Extraction(msg) => assert!(msg.contains("401"), "{msg}"),
        other => panic!("expected Extraction, got: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_sale_item_is_dropped_without_losing_the_page() {
    let server = MockServer::start().await;
    let content = json!({
        "products": [
            {"name": "Jarlsberg", "sale": {"type": "percentage", "price": null, "discount_percentage": 20, "n": null, "total_price": null}},
            {"name": "Melk", "sale": {"type": "price", "price": null, "discount_percentage": null, "n": null, "total_price": null}}
        ]
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content.to_string())))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "page.jpg", b"jpeg");

    let catalog = client(&server.uri())
        .extract(&image)
        .await
        .expect("one bad item should not fail the page");
    assert_eq!(catalog.products.len(), 1);
    assert_eq!(catalog.products[0].name, "Jarlsberg");
    assert_eq!(catalog.products[0].sale, Sale::percentage(20.0).unwrap());
}

#[tokio::test]
async fn non_catalog_model_output_is_extraction_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json at all")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "page.jpg", b"jpeg");

    let err = client(&server.uri()).extract(&image).await.unwrap_err();
    assert!(matches!(err, SalesError::Extraction(_)), "got: {err:?}");
}

#[tokio::test]
async fn missing_image_is_io_error() {
    let server = MockServer::start().await;
    let err = client(&server.uri())
        .extract(std::path::Path::new("/definitely/not/here.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, SalesError::Io { .. }), "got: {err:?}");
}
