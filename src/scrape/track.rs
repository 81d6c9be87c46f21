//! Track page extraction: resolving playable URLs
//!
//! The playable MP3 is resolved through an ordered fallback chain: the
//! `<audio>` element's source first, then the first `.mp3` anchor. FLAC is
//! resolved independently. Every candidate passes through `build_url` and
//! is dropped silently when it does not resolve or points off-site — a bad
//! candidate falls through to the next strategy instead of failing the
//! lookup.

use crate::scrape::types::TrackUrls;
use crate::session::{transport, SessionContext};
use crate::url::build_url;
use crate::Result;
use scraper::{Html, Selector};
use url::Url;

/// Resolves the playable URLs from a track page
pub async fn fetch_track_urls(ctx: &SessionContext, page_url: &str) -> Result<TrackUrls> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;

    let response = transport::request(ctx, page_url).await?;
    let body = response.text().await?;

    let document = Html::parse_document(&body);
    Ok(extract_track_urls(&document, &base, &config.allowed_domains))
}

pub(crate) fn extract_track_urls(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
) -> TrackUrls {
    TrackUrls {
        mp3: resolve_mp3(document, base, allowed_domains),
        flac: resolve_by_extension(document, base, allowed_domains, ".flac"),
    }
}

/// Audio element source first, then the first `.mp3` anchor
fn resolve_mp3(document: &Html, base: &Url, allowed_domains: &[String]) -> Option<String> {
    if let Ok(selector) = Selector::parse("audio source[src]") {
        for source in document.select(&selector) {
            if let Some(url) = try_candidate(source.value().attr("src"), base, allowed_domains) {
                return Some(url);
            }
        }
    }

    resolve_by_extension(document, base, allowed_domains, ".mp3")
}

/// First anchor whose href contains the extension and survives resolution
fn resolve_by_extension(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
    extension: &str,
) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;

    for anchor in document.select(&selector) {
        let href = anchor.value().attr("href")?;
        if !href.to_lowercase().contains(extension) {
            continue;
        }
        if let Some(url) = try_candidate(Some(href), base, allowed_domains) {
            return Some(url);
        }
    }

    None
}

/// Resolves one candidate href, discarding it silently on any failure
fn try_candidate(
    href: Option<&str>,
    base: &Url,
    allowed_domains: &[String],
) -> Option<String> {
    match build_url(href, base, allowed_domains) {
        Ok(Some(url)) => Some(url),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Dropping track URL candidate {:?}: {}", href, e);
            None
        }
    }
}
