//! Integration tests for the extraction pipeline
//!
//! These tests use wiremock to stand in for the target site. The mock server
//! listens on 127.0.0.1, so the test configuration treats that host as the
//! product site and `localhost` as the short-link service.

use product_snap::config::{Config, FetchConfig, RetryConfig, ServerConfig, SiteConfig};
use product_snap::{ErrorKind, ProductQuery, Scraper, UNKNOWN_TITLE};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_PAGE: &str = r#"
<html>
  <head><title>Amazon.com: Wireless Mouse</title></head>
  <body>
    <span id="productTitle">
      Wireless   Mouse
    </span>
    <div id="imgTagWrapperId">
      <img id="landingImage"
           data-old-hires="https://m.media-amazon.com/images/I/71abc._AC_SL1500_.jpg"
           src="https://m.media-amazon.com/images/I/71abc._AC_SX300_.jpg">
    </div>
  </body>
</html>
"#;

/// Creates a test configuration pointed at the mock server with no induced delays
fn create_test_config() -> Config {
    Config {
        site: SiteConfig {
            host_markers: vec!["127.0.0.1".to_string()],
            short_link_markers: vec!["localhost".to_string()],
            challenge_markers: vec!["captcha".to_string(), "robot check".to_string()],
        },
        fetch: FetchConfig {
            request_timeout_secs: 5,
            resolve_timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        retry: RetryConfig {
            max_attempts: 3,
            default_attempts: 2,
            backoff_base_ms: 0,
            jitter_max_ms: 0,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
        },
        server: ServerConfig::default(),
    }
}

fn create_scraper() -> Scraper {
    Scraper::new(&create_test_config()).expect("Failed to build scraper")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

#[tokio::test]
async fn test_product_page_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0TEST"))
        .respond_with(html(PRODUCT_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0TEST", mock_server.uri());
    let product = create_scraper()
        .run(&ProductQuery::new(url.clone()), 3)
        .await
        .expect("extraction should succeed");

    assert_eq!(product.title, "Wireless Mouse");
    assert_eq!(
        product.image_url,
        "https://m.media-amazon.com/images/I/71abc._AC_SL1500_.jpg"
    );
    assert_eq!(product.amazon_url, url);
}

#[tokio::test]
async fn test_short_link_resolves_to_canonical_url() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();
    let canonical = format!("{}/dp/B0SHORT", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/s/abc123"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", canonical.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dp/B0SHORT"))
        .respond_with(html(PRODUCT_PAGE))
        .mount(&mock_server)
        .await;

    let short = format!("http://localhost:{}/s/abc123", port);
    let product = create_scraper()
        .run(&ProductQuery::new(short), 1)
        .await
        .expect("short link extraction should succeed");

    assert_eq!(product.amazon_url, canonical);
    assert_eq!(product.title, "Wireless Mouse");
}

#[tokio::test]
async fn test_foreign_host_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(PRODUCT_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = create_scraper()
        .run(&ProductQuery::new("https://www.example.com/dp/B0TEST"), 3)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_challenge_page_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0CAPTCHA"))
        .respond_with(html(
            "<html><body><h4>Enter the characters you see below</h4>\
             <form action=\"/errors/validateCaptcha\"></form></body></html>",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0CAPTCHA", mock_server.uri());
    let err = create_scraper()
        .run(&ProductQuery::new(url), 1)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchBlocked);
    assert_eq!(err.status_code(), 429);
}

#[tokio::test]
async fn test_service_unavailable_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0THROTTLE"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0THROTTLE", mock_server.uri());
    let err = create_scraper()
        .run(&ProductQuery::new(url), 2)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchBlocked);
}

#[tokio::test]
async fn test_attempts_capped_at_ceiling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0BROKEN"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0BROKEN", mock_server.uri());
    let err = create_scraper()
        .run(&ProductQuery::new(url), 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchFailed);
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let mock_server = MockServer::start().await;

    // First request fails, later ones succeed
    Mock::given(method("GET"))
        .and(path("/dp/B0FLAKY"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dp/B0FLAKY"))
        .respond_with(html(PRODUCT_PAGE))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0FLAKY", mock_server.uri());
    let product = create_scraper()
        .run(&ProductQuery::new(url), 2)
        .await
        .expect("second attempt should succeed");

    assert_eq!(product.title, "Wireless Mouse");
}

#[tokio::test]
async fn test_script_data_fallback() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><body>
        <h1 class="a-size-large">Espresso Grinder</h1>
        <script type="text/javascript">
          P.when('A').register("ImageBlockATF", function(A){
            var data = {"colorImages": {"initial": [{"hiRes":"https://m.media-amazon.com/images/I/81grind._AC_SL1500_.jpg","thumb":"https://m.media-amazon.com/images/I/81grind._AC_US40_.jpg"}]}};
            return data;
          });
        </script>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/dp/B0SCRIPT"))
        .respond_with(html(page))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0SCRIPT", mock_server.uri());
    let product = create_scraper()
        .run(&ProductQuery::new(url), 1)
        .await
        .expect("script data should yield an image");

    assert_eq!(product.title, "Espresso Grinder");
    assert_eq!(
        product.image_url,
        "https://m.media-amazon.com/images/I/81grind._AC_SL1500_.jpg"
    );
}

#[tokio::test]
async fn test_page_without_image_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0NOIMG"))
        .respond_with(html("<html><body><p>Currently unavailable.</p></body></html>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0NOIMG", mock_server.uri());
    let err = create_scraper()
        .run(&ProductQuery::new(url.clone()), 2)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoImageFound);
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn test_missing_title_uses_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0NOTITLE"))
        .respond_with(html(
            r#"<img id="landingImage" src="https://m.media-amazon.com/images/I/61plain.jpg">"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0NOTITLE", mock_server.uri());
    let product = create_scraper()
        .run(&ProductQuery::new(url), 1)
        .await
        .expect("image alone is enough");

    assert_eq!(product.title, UNKNOWN_TITLE);
}

#[tokio::test]
async fn test_deadline_cancels_slow_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0SLOW"))
        .respond_with(html(PRODUCT_PAGE).set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B0SLOW", mock_server.uri());
    let started = std::time::Instant::now();
    let err = create_scraper()
        .run_with_deadline(&ProductQuery::new(url), 3, Duration::from_millis(200))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_unvalidated_attempt_ceiling_still_three() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0LOOSE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.retry.max_attempts = 10;
    let scraper = Scraper::new(&config).expect("Failed to build scraper");

    let url = format!("{}/dp/B0LOOSE", mock_server.uri());
    let err = scraper.run(&ProductQuery::new(url), 5).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchFailed);
}

#[tokio::test]
async fn test_unreachable_short_link_fails_resolution() {
    // Nothing listens on port 1
    let err = create_scraper()
        .run(&ProductQuery::new("http://localhost:1/s/x"), 1)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResolutionFailed);
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0TARDY"))
        .respond_with(html(PRODUCT_PAGE).set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.fetch.request_timeout_secs = 1;
    let scraper = Scraper::new(&config).expect("Failed to build scraper");

    let url = format!("{}/dp/B0TARDY", mock_server.uri());
    let err = scraper.run(&ProductQuery::new(url), 1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchTimeout);
    assert_eq!(err.status_code(), 408);
}
