//! vgm-scraper: session engine for a forum-gated game-soundtrack archive
//!
//! This crate implements the scraping side of a music-catalog application:
//! a rate-limited, retrying HTTP transport bound to one logical browser
//! session, forum login against the scraped site, extraction of catalog
//! listings (years, albums, search results, tracks) from untrusted markup,
//! and a TTL/LRU cache that deduplicates concurrent identical fetches.
//!
//! Every outbound URL is checked against a domain allow-list before any
//! request is made, so a hostile page cannot steer the engine off-site.

pub mod auth;
pub mod cache;
pub mod config;
pub mod engine;
pub mod scrape;
pub mod session;
pub mod url;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Domain not in allow-list: {0}")]
    DisallowedDomain(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connection { url: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Transport error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ScrapeError {
    /// Whether the transport should retry after this error.
    ///
    /// Timeouts, connection failures and 5xx responses are transient;
    /// everything else (bad input, auth rejection, 4xx) fails immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Whether this error was caused by bad caller input rather than the
    /// network or the remote site.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidScheme(_) | Self::DisallowedDomain(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::ScraperConfig;
pub use engine::Scraper;
pub use scrape::{
    AlbumInfo, AlbumListItem, BulkDownloadUrls, ScrapedTrack, SearchResult, TrackUrls,
};
pub use session::SessionContext;
