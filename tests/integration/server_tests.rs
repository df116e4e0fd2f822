//! Integration tests for the HTTP API
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`;
//! wiremock plays the product site behind it.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use product_snap::config::{Config, FetchConfig, RetryConfig, ServerConfig, SiteConfig};
use product_snap::server::{build_app, AppState};
use product_snap::Scraper;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_PAGE: &str = r#"<html><body>
    <span id="productTitle">Cast Iron Skillet</span>
    <img id="landingImage" data-old-hires="https://m.media-amazon.com/images/I/61skillet._SX425_.jpg">
</body></html>"#;

fn create_test_config() -> Config {
    Config {
        site: SiteConfig {
            host_markers: vec!["127.0.0.1".to_string()],
            short_link_markers: vec!["localhost".to_string()],
            challenge_markers: vec!["captcha".to_string()],
        },
        fetch: FetchConfig {
            request_timeout_secs: 5,
            resolve_timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        retry: RetryConfig {
            max_attempts: 3,
            default_attempts: 1,
            backoff_base_ms: 0,
            jitter_max_ms: 0,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
        },
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            store_capacity: 2,
            request_deadline_secs: 10,
        },
    }
}

fn create_app() -> Router {
    let config = create_test_config();
    let scraper = Scraper::new(&config).expect("Failed to build scraper");
    build_app(AppState::new(scraper, &config))
}

async fn product_site() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dp/B0SKILLET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(PRODUCT_PAGE),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn fetch_image_post_returns_product() {
    let site = product_site().await;
    let app = create_app();
    let url = format!("{}/dp/B0SKILLET", site.uri());

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/fetch-image",
            json!({ "amazonUrl": url, "retries": 2 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Cast Iron Skillet");
    assert_eq!(
        body["data"]["imageUrl"],
        "https://m.media-amazon.com/images/I/61skillet.jpg"
    );
    assert_eq!(body["data"]["amazonUrl"], url);
}

#[tokio::test]
async fn fetch_image_get_uses_query_string() {
    let site = product_site().await;
    let app = create_app();
    let uri = format!("/api/fetch-image?url={}/dp/B0SKILLET", site.uri());

    let (status, body) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Cast Iron Skillet");
}

#[tokio::test]
async fn fetch_image_requires_url() {
    let app = create_app();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/fetch-image", json!({ "amazonUrl": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, empty_request(Method::GET, "/api/fetch-image")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetch_image_rejects_foreign_url() {
    let app = create_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/fetch-image",
            json!({ "amazonUrl": "https://www.example.com/item/1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("valid Amazon product URL"));
}

#[tokio::test]
async fn fetch_image_maps_throttling_to_429() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = create_app();
    let url = format!("{}/dp/B0BUSY", mock_server.uri());
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/fetch-image", json!({ "amazonUrl": url })),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn products_add_list_delete() {
    let site = product_site().await;
    let app = create_app();
    let url = format!("{}/dp/B0SKILLET", site.uri());

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/products", json!({ "amazonUrl": url })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["product"]["id"].as_str().expect("id").to_string();
    assert!(body["product"]["addedAt"].is_string());

    let (status, body) = send(&app, empty_request(Method::GET, "/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().expect("products").len(), 1);
    assert_eq!(body["products"][0]["id"], id.as_str());

    let (status, _) = send(
        &app,
        empty_request(Method::DELETE, &format!("/api/products/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        empty_request(Method::DELETE, &format!("/api/products/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, empty_request(Method::GET, "/api/products")).await;
    assert_eq!(body["products"], json!([]));
}

#[tokio::test]
async fn products_store_is_capped() {
    let site = product_site().await;
    let app = create_app();
    let url = format!("{}/dp/B0SKILLET", site.uri());

    let mut ids = Vec::new();
    for _ in 0..3 {
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/products", json!({ "amazonUrl": url })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["product"]["id"].as_str().expect("id").to_string());
    }

    let (_, body) = send(&app, empty_request(Method::GET, "/api/products")).await;
    let listed: Vec<&str> = body["products"]
        .as_array()
        .expect("products")
        .iter()
        .map(|p| p["id"].as_str().expect("id"))
        .collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str()]);
}

#[tokio::test]
async fn failed_add_leaves_store_untouched() {
    let app = create_app();
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/products",
            json!({ "amazonUrl": "https://www.example.com/item/1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, empty_request(Method::GET, "/api/products")).await;
    assert_eq!(body["products"], json!([]));
}
