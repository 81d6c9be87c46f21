//! Transport-level tests: retries, error classification, rate limiting,
//! streaming

use crate::common::test_config;
use futures::StreamExt;
use std::time::{Duration, Instant};
use vgm_scraper::session::{transport, RequestOptions, SessionContext};
use vgm_scraper::ScrapeError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    // Two failures, then the catch-all succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let ctx = SessionContext::new(test_config(&server.uri())).unwrap();
    let response = transport::request(&ctx, &format!("{}/flaky", server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3) // initial attempt + 2 retries
        .mount(&server)
        .await;

    let ctx = SessionContext::new(test_config(&server.uri())).unwrap();
    let err = transport::request(&ctx, &format!("{}/down", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Http { status: 503, .. }));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = SessionContext::new(test_config(&server.uri())).unwrap();
    let response = transport::request(&ctx, &format!("{}/missing", server.uri()))
        .await
        .unwrap();

    // Non-5xx responses come back to the caller for interpretation
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_requests_respect_minimum_spacing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.rate_limit_ms = 150;
    let ctx = SessionContext::new(config).unwrap();
    let url = format!("{}/page", server.uri());

    let start = Instant::now();
    transport::request(&ctx, &url).await.unwrap();
    transport::request(&ctx, &url).await.unwrap();
    let elapsed = start.elapsed();

    // The second request must have waited out the limiter
    assert!(
        elapsed >= Duration::from_millis(140),
        "two requests completed in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_post_form_sends_urlencoded_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(wiremock::matchers::body_string_contains("name=value"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = SessionContext::new(test_config(&server.uri())).unwrap();
    let response = transport::post_form(
        &ctx,
        &format!("{}/submit", server.uri()),
        &[("name", "value")],
        RequestOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_stream_request_exposes_status_headers_and_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio/track.mp3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"fake mp3 bytes".to_vec())
                .insert_header("content-type", "audio/mpeg"),
        )
        .mount(&server)
        .await;

    let ctx = SessionContext::new(test_config(&server.uri())).unwrap();
    let stream = transport::stream_request(
        &ctx,
        &format!("{}/audio/track.mp3", server.uri()),
        RequestOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(stream.status.as_u16(), 200);
    assert_eq!(
        stream.headers.get("content-type").unwrap(),
        "audio/mpeg"
    );

    let mut body = Vec::new();
    let mut byte_stream = Box::pin(stream.bytes_stream());
    while let Some(chunk) = byte_stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, b"fake mp3 bytes");
}

#[tokio::test]
async fn test_disallowed_host_never_reaches_the_network() {
    let server = MockServer::start().await;

    // Any request arriving here fails the test
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.allowed_domains = vec!["khinsider.com".to_string()];
    // Keep base/forum coverage consistent with the allow-list
    config.base_url = "https://downloads.khinsider.com".to_string();
    config.forum_url = "https://downloads.khinsider.com/forums".to_string();
    let ctx = SessionContext::new(config).unwrap();

    let err = transport::request(&ctx, &format!("{}/page", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::DisallowedDomain(_)));
}
