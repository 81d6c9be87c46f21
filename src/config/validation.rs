use crate::config::types::ScraperConfig;
use crate::url::domain_allowed;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_site_urls(config)?;
    validate_user_agent(&config.user_agent)?;
    validate_limits(config)?;
    validate_allowed_domains(&config.allowed_domains)?;
    validate_urls_covered_by_allow_list(config)?;
    Ok(())
}

/// Validates that base and forum URLs parse and use a web scheme
fn validate_site_urls(config: &ScraperConfig) -> Result<(), ConfigError> {
    for (name, value) in [("base-url", &config.base_url), ("forum-url", &config.forum_url)] {
        let parsed = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", name, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{} must be http or https, got '{}'",
                name,
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!("{} has no host", name)));
        }
    }

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_ascii_control()) {
        return Err(ConfigError::Validation(
            "user_agent must not contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates rate-limit, retry and timeout settings
fn validate_limits(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.rate_limit_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_ms must be <= 60000, got {}",
            config.rate_limit_ms
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.stream_timeout_secs < config.request_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "stream_timeout_secs ({}) must be >= request_timeout_secs ({})",
            config.stream_timeout_secs, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the domain allow-list entries
fn validate_allowed_domains(domains: &[String]) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_domains cannot be empty".to_string(),
        ));
    }

    for domain in domains {
        if domain.trim().is_empty() {
            return Err(ConfigError::Validation(
                "allowed_domains entries cannot be empty".to_string(),
            ));
        }

        if domain.contains('/') || domain.contains("://") {
            return Err(ConfigError::Validation(format!(
                "allowed_domains entries must be bare hostnames, got '{}'",
                domain
            )));
        }
    }

    Ok(())
}

/// Validates that the configured site URLs pass their own allow-list
///
/// A base URL outside the allow-list would make every request fail.
fn validate_urls_covered_by_allow_list(config: &ScraperConfig) -> Result<(), ConfigError> {
    for (name, value) in [("base-url", &config.base_url), ("forum-url", &config.forum_url)] {
        let host = Url::parse(value)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default();

        if !domain_allowed(&host, &config.allowed_domains) {
            return Err(ConfigError::Validation(format!(
                "{} host '{}' is not covered by allowed_domains",
                name, host
            )));
        }
    }

    Ok(())
}
