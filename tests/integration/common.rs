//! Shared helpers for the integration tests

use vgm_scraper::ScraperConfig;

/// Builds a configuration pointed at a mock server
///
/// Delays are tiny so the rate limiter and retry loop stay observable
/// without slowing the suite down.
pub fn test_config(server_uri: &str) -> ScraperConfig {
    let host = url::Url::parse(server_uri)
        .expect("mock server URI parses")
        .host_str()
        .expect("mock server URI has a host")
        .to_string();
    let base = server_uri.trim_end_matches('/').to_string();

    ScraperConfig {
        base_url: base.clone(),
        forum_url: format!("{}/forums", base),
        user_agent: "vgm-scraper-tests/1.0".to_string(),
        rate_limit_ms: 5,
        max_retries: 2,
        retry_delay_ms: 10,
        request_timeout_secs: 5,
        stream_timeout_secs: 5,
        allowed_domains: vec![host],
    }
}
