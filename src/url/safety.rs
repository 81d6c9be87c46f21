//! URL validation against the domain allow-list
//!
//! Everything the transport fetches, and every link harvested from a page,
//! passes through here. `validate_url` is the hard gate; `build_url` is the
//! lenient link-resolution helper used while walking untrusted markup.

use crate::url::matcher::domain_allowed;
use crate::{Result, ScrapeError};
use url::Url;

/// Validates a URL against the allow-list
///
/// Fails unless the URL parses, uses http or https, and has a hostname that
/// equals or is a subdomain of an allow-list entry.
///
/// # Arguments
///
/// * `raw` - The URL string to validate
/// * `allowed_domains` - The configured allow-list
///
/// # Returns
///
/// * `Ok(Url)` - The parsed, validated URL
/// * `Err(ScrapeError)` - Parse failure, bad scheme, or disallowed host
pub fn validate_url(raw: &str, allowed_domains: &[String]) -> Result<Url> {
    let parsed = Url::parse(raw)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScrapeError::InvalidScheme(parsed.scheme().to_string()));
    }

    let host = parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| ScrapeError::Validation(format!("URL has no host: {}", raw)))?;

    if !domain_allowed(&host, allowed_domains) {
        return Err(ScrapeError::DisallowedDomain(host));
    }

    Ok(parsed)
}

/// Resolves a possibly-relative href against a base URL
///
/// Link harvesting over a page is noisy: a missing or unresolvable href is
/// routine and yields `Ok(None)` so callers can skip the link silently.
/// A href that *does* resolve but points at a host outside the allow-list
/// is a different matter — that is surfaced as an error so callers can
/// distinguish "no link found" from "link points somewhere hostile".
///
/// Non-web schemes (`mailto:`, `javascript:`, `data:` and friends) count as
/// resolution failures, not security events.
pub fn build_url(
    href: Option<&str>,
    base: &Url,
    allowed_domains: &[String],
) -> Result<Option<String>> {
    let href = match href {
        Some(h) => h.trim(),
        None => return Ok(None),
    };

    if href.is_empty() {
        return Ok(None);
    }

    let joined = match base.join(href) {
        Ok(url) => url,
        Err(_) => return Ok(None),
    };

    if joined.scheme() != "http" && joined.scheme() != "https" {
        return Ok(None);
    }

    let validated = validate_url(joined.as_str(), allowed_domains)?;
    Ok(Some(validated.into()))
}
