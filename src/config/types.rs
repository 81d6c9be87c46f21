use serde::Deserialize;

/// Configuration for one scraper session
///
/// Every field has a default pointing at the soundtrack archive this engine
/// was written for, so a config file is optional; a partial TOML file merges
/// over the defaults. The configuration is immutable once a session context
/// is built from it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Root of the catalog site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Root of the forum that handles login for the catalog site
    #[serde(rename = "forum-url")]
    pub forum_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Minimum delay between outbound requests (milliseconds)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,

    /// Retry attempts for transient transport failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Total time budget for a buffered page fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time budget for streaming downloads; streams get a longer budget
    /// than buffered pages (seconds)
    #[serde(rename = "stream-timeout-secs")]
    pub stream_timeout_secs: u64,

    /// Hosts the transport may talk to. A hostname is accepted when it
    /// equals an entry or is a subdomain of one.
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://downloads.khinsider.com".to_string(),
            forum_url: "https://downloads.khinsider.com/forums".to_string(),
            user_agent: format!("vgm-scraper/{}", env!("CARGO_PKG_VERSION")),
            rate_limit_ms: 500,
            max_retries: 3,
            retry_delay_ms: 5000,
            request_timeout_secs: 30,
            stream_timeout_secs: 300,
            allowed_domains: vec![
                "downloads.khinsider.com".to_string(),
                "khinsider.com".to_string(),
                "vgmsite.com".to_string(),
                "vgmdownloads.com".to_string(),
            ],
        }
    }
}
