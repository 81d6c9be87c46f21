//! Authentication flow tests against a mock forum

use crate::common::test_config;
use vgm_scraper::{ScrapeError, Scraper};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_FORM: &str = r#"<html><body>
    <form action="/forums/login/login" method="post">
        <input type="text" name="login" />
        <input type="password" name="password" />
        <input type="hidden" name="_xfToken" value="tok123" />
    </form>
</body></html>"#;

const LOGGED_IN_PAGE: &str = r#"<html data-logged-in="true"><body>
    <a href="/forums/logout/">Log out</a>
</body></html>"#;

async fn mount_login_form(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/forums/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_FORM)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_success_sets_session_flag() {
    let server = MockServer::start().await;
    mount_login_form(&server).await;

    Mock::given(method("POST"))
        .and(path("/forums/login/login"))
        .and(body_string_contains("_xfToken=tok123"))
        .and(body_string_contains("login=someone"))
        .and(body_string_contains("remember=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGGED_IN_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    scraper.login("someone", "hunter2").await.unwrap();

    assert!(scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_login_fails_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forums/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>No form here</body></html>"),
        )
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let err = scraper.login("someone", "hunter2").await.unwrap_err();

    match err {
        ScrapeError::Auth(message) => assert!(message.contains("token")),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(!scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_login_surfaces_error_banner_text() {
    let server = MockServer::start().await;
    mount_login_form(&server).await;

    Mock::given(method("POST"))
        .and(path("/forums/login/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="blockMessage blockMessage--error">Incorrect password.</div>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let err = scraper.login("someone", "wrong").await.unwrap_err();

    match err {
        ScrapeError::Auth(message) => assert!(message.contains("Incorrect password")),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(!scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_login_rejected_without_markers() {
    let server = MockServer::start().await;
    mount_login_form(&server).await;

    // No error banner, but no logged-in markers either
    Mock::given(method("POST"))
        .and(path("/forums/login/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html data-logged-in="false"><body><a href="/forums/login/">Log in</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(scraper.login("someone", "pw").await.is_err());
    assert!(!scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_status_probe_reports_logged_in_marker() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGGED_IN_PAGE))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(scraper.check_login_status().await);
    assert!(scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_status_probe_never_fails_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(!scraper.check_login_status().await);
    assert!(!scraper.context().is_logged_in().await);
}

#[tokio::test]
async fn test_logout_discards_session_state() {
    let server = MockServer::start().await;
    mount_login_form(&server).await;

    Mock::given(method("POST"))
        .and(path("/forums/login/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGGED_IN_PAGE))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    scraper.login("someone", "hunter2").await.unwrap();
    assert!(scraper.context().is_logged_in().await);

    scraper.logout().await.unwrap();
    assert!(!scraper.context().is_logged_in().await);
}
