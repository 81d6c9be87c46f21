//! Year index and album listing extraction
//!
//! The year listing paginates; termination combines three signals so a
//! drifting pagination widget cannot run the crawl forever:
//! - consecutive empty pages stop the crawl early
//! - the absence of any next-page signal stops it
//! - a hard page cap bounds the worst case

use crate::scrape::select;
use crate::scrape::types::AlbumListItem;
use crate::session::{transport, SessionContext};
use crate::url::build_url;
use crate::Result;
use scraper::{Html, Selector};
use std::cmp::Ordering;
use url::Url;

/// Consecutive empty listing pages tolerated before giving up
pub const MAX_EMPTY_PAGES: u32 = 3;

/// Hard cap on listing pages fetched for one year
pub const MAX_PAGES: u32 = 100;

/// Sentinel year the site uses for albums with no known release year
const UNKNOWN_YEAR: &str = "0000";

/// Fetches the year index from the catalog's browse page
pub async fn fetch_years(ctx: &SessionContext) -> Result<Vec<String>> {
    let url = format!(
        "{}/game-soundtracks",
        ctx.config().base_url.trim_end_matches('/')
    );
    let response = transport::request(ctx, &url).await?;
    let body = response.text().await?;
    Ok(extract_years(&body))
}

/// Fetches every album listed under one year, following pagination
pub async fn fetch_albums_by_year(ctx: &SessionContext, year: &str) -> Result<Vec<AlbumListItem>> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;
    let root = config.base_url.trim_end_matches('/').to_string();

    let mut albums = Vec::new();
    let mut page: u32 = 1;
    let mut empty_pages: u32 = 0;

    loop {
        if page > MAX_PAGES {
            tracing::warn!(
                "Year {} listing hit the {}-page cap; returning {} albums collected so far",
                year,
                MAX_PAGES,
                albums.len()
            );
            break;
        }

        let url = if page == 1 {
            format!("{}/game-soundtracks/year/{}", root, year)
        } else {
            format!("{}/game-soundtracks/year/{}?page={}", root, year, page)
        };

        let response = transport::request(ctx, &url).await?;
        let body = response.text().await?;

        let (page_albums, more) = {
            let document = Html::parse_document(&body);
            let rows = extract_album_rows(&document, &base, year, &config.allowed_domains)?;
            let more = select::has_next_page(&document, page + 1);
            (rows, more)
        };

        if page_albums.is_empty() {
            empty_pages += 1;
            if empty_pages >= MAX_EMPTY_PAGES {
                tracing::debug!(
                    "Year {}: {} consecutive empty pages, stopping at page {}",
                    year,
                    empty_pages,
                    page
                );
                break;
            }
        } else {
            empty_pages = 0;
            albums.extend(page_albums);
        }

        if !more {
            break;
        }
        page += 1;
    }

    albums.sort_by_key(|album| album.title.to_lowercase());
    Ok(albums)
}

/// Fetches the recent-additions listing
pub async fn fetch_recent_albums(ctx: &SessionContext) -> Result<Vec<AlbumListItem>> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;
    let url = format!(
        "{}/game-soundtracks/last-added",
        config.base_url.trim_end_matches('/')
    );

    let response = transport::request(ctx, &url).await?;
    let body = response.text().await?;

    let document = Html::parse_document(&body);
    extract_recent_rows(&document, &base, &config.allowed_domains)
}

/// Pulls the distinct year strings out of the browse page markup
pub(crate) fn extract_years(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut years: Vec<String> = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(year) = year_segment(href) {
            if !years.contains(&year) {
                years.push(year);
            }
        }
    }

    sort_years(&mut years);
    years
}

/// Extracts the `NNNN` from a `…/year/NNNN` href, if present
fn year_segment(href: &str) -> Option<String> {
    let start = href.find("/year/")? + "/year/".len();
    let candidate = href[start..].split(['/', '?', '#']).next()?;

    let is_year = candidate.len() == 4 && candidate.bytes().all(|b| b.is_ascii_digit());
    is_year.then(|| candidate.to_string())
}

/// Sorts years newest-first, with the unknown-year sentinel always last
fn sort_years(years: &mut [String]) {
    years.sort_by(|a, b| {
        match (a == UNKNOWN_YEAR, b == UNKNOWN_YEAR) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.cmp(a),
        }
    });
}

/// Parses the album rows out of one listing page
fn extract_album_rows(
    document: &Html,
    base: &Url,
    year: &str,
    allowed_domains: &[String],
) -> Result<Vec<AlbumListItem>> {
    let Ok(row_selector) = Selector::parse("table tr") else {
        return Ok(Vec::new());
    };

    let mut albums = Vec::new();

    for row in document.select(&row_selector) {
        let Some((title, href)) = select::longest_anchor(row, "/game-soundtracks/album/") else {
            continue;
        };

        // A row link that resolves off the allow-list aborts the listing;
        // an unresolvable link is just skipped
        let Some(url) = build_url(Some(&href), base, allowed_domains)? else {
            continue;
        };

        let cells = select::cell_texts(row);
        let platform = cells
            .get(1)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        albums.push(AlbumListItem {
            title,
            url,
            platform,
            year: year.to_string(),
        });
    }

    Ok(albums)
}

/// Parses the recent-additions rows; the year comes from the row itself
fn extract_recent_rows(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
) -> Result<Vec<AlbumListItem>> {
    let Ok(row_selector) = Selector::parse("table tr") else {
        return Ok(Vec::new());
    };

    let mut albums = Vec::new();

    for row in document.select(&row_selector) {
        let Some((title, href)) = select::longest_anchor(row, "/game-soundtracks/album/") else {
            continue;
        };
        let Some(url) = build_url(Some(&href), base, allowed_domains)? else {
            continue;
        };

        let cells = select::cell_texts(row);
        let platform = cells
            .get(1)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let year = cells
            .iter()
            .find(|text| text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

        albums.push(AlbumListItem {
            title,
            url,
            platform,
            year,
        });
    }

    Ok(albums)
}
