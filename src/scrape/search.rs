//! Album search
//!
//! Query hygiene happens before any request: oversized queries are rejected
//! loudly, control characters are stripped, and a query that sanitizes down
//! to nothing returns empty without touching the network.

use crate::scrape::select;
use crate::scrape::types::SearchResult;
use crate::session::{transport, SessionContext};
use crate::url::build_url;
use crate::{Result, ScrapeError};
use scraper::{Html, Selector};
use url::Url;

/// Longest accepted search query, measured after trimming but before
/// control-character stripping
pub const MAX_QUERY_LENGTH: usize = 100;

/// Trims and sanitizes a raw search query
///
/// Returns `Ok(None)` when nothing searchable remains — the caller should
/// yield an empty result set without issuing a request. Oversized input is
/// the one condition that fails loudly.
pub fn sanitize_query(query: &str) -> Result<Option<String>> {
    let trimmed = query.trim();

    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(ScrapeError::Validation(format!(
            "search query exceeds {} characters",
            MAX_QUERY_LENGTH
        )));
    }

    let cleaned: String = trimmed.chars().filter(|c| !c.is_ascii_control()).collect();

    if cleaned.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(cleaned))
}

/// Runs a search with an already-sanitized query
pub async fn fetch_search(ctx: &SessionContext, query: &str) -> Result<Vec<SearchResult>> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;

    let mut url = base.join("/search")?;
    url.query_pairs_mut().append_pair("search", query);

    let response = transport::request(ctx, url.as_str()).await?;
    let body = response.text().await?;

    let document = Html::parse_document(&body);
    extract_search_results(&document, &base, &config.allowed_domains)
}

/// Parses the search results table
///
/// Result rows carry at least four cells: title, platform, category, year.
/// Shorter rows are navigation or decoration and are skipped.
fn extract_search_results(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
) -> Result<Vec<SearchResult>> {
    let Ok(row_selector) = Selector::parse("table tr") else {
        return Ok(Vec::new());
    };

    let mut results = Vec::new();

    for row in document.select(&row_selector) {
        let cells = select::cell_texts(row);
        if cells.len() < 4 {
            continue;
        }

        let Some((title, href)) = select::longest_anchor(row, "/game-soundtracks/album/") else {
            continue;
        };
        let Some(url) = build_url(Some(&href), base, allowed_domains)? else {
            continue;
        };

        let platform = cells
            .get(1)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let kind = cells
            .get(2)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| "Soundtrack".to_string());
        let year = cells
            .get(3)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| "0000".to_string());

        results.push(SearchResult {
            title,
            url,
            platform,
            kind,
            year,
        });
    }

    Ok(results)
}
