//! Album page extraction: header info, song list, download affordances

use crate::scrape::select;
use crate::scrape::types::{AlbumInfo, BulkDownloadUrls, ScrapedTrack};
use crate::session::{transport, SessionContext};
use crate::url::build_url;
use crate::Result;
use scraper::{Html, Selector};
use url::Url;

/// Fetches the header metadata from an album page
pub async fn fetch_album_info(ctx: &SessionContext, album_url: &str) -> Result<AlbumInfo> {
    let body = fetch_page(ctx, album_url).await?;
    Ok(extract_album_info(&body))
}

/// Fetches the song list from an album page
pub async fn fetch_album_tracks(
    ctx: &SessionContext,
    album_url: &str,
) -> Result<Vec<ScrapedTrack>> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;
    let body = fetch_page(ctx, album_url).await?;

    let document = Html::parse_document(&body);
    extract_tracks(&document, &base, &config.allowed_domains)
}

/// Fetches the album's internal download id, if the page exposes one
pub async fn fetch_album_download_id(
    ctx: &SessionContext,
    album_url: &str,
) -> Result<Option<String>> {
    let body = fetch_page(ctx, album_url).await?;
    Ok(extract_download_id(&body))
}

/// Fetches the whole-album archive links from an album page
pub async fn fetch_bulk_download_urls(
    ctx: &SessionContext,
    album_url: &str,
) -> Result<BulkDownloadUrls> {
    let config = ctx.config();
    let base = Url::parse(&config.base_url)?;
    let body = fetch_page(ctx, album_url).await?;

    let document = Html::parse_document(&body);
    Ok(extract_bulk_urls(&document, &base, &config.allowed_domains))
}

async fn fetch_page(ctx: &SessionContext, url: &str) -> Result<String> {
    let response = transport::request(ctx, url).await?;
    Ok(response.text().await?)
}

/// Parses the album header: title from the page heading, platform and year
/// from the labelled metadata lines
pub(crate) fn extract_album_info(html: &str) -> AlbumInfo {
    let document = Html::parse_document(html);

    let title = Selector::parse("#pageContent h2, h2")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(select::element_text)
        .unwrap_or_default();

    let mut platform = None;
    let mut year = None;

    if let Ok(selector) = Selector::parse("p") {
        for paragraph in document.select(&selector) {
            let text = paragraph.text().collect::<String>();
            for line in text.lines() {
                let line = line.trim();
                if let Some(value) = labelled_value(line, &["Platforms:", "Platform:"]) {
                    platform.get_or_insert(value);
                } else if let Some(value) = labelled_value(line, &["Year:"]) {
                    year.get_or_insert(value);
                }
            }
        }
    }

    AlbumInfo {
        title,
        platform,
        year,
    }
}

/// Returns the trimmed text after the first matching label prefix
fn labelled_value(line: &str, labels: &[&str]) -> Option<String> {
    for label in labels {
        if let Some(rest) = line.strip_prefix(label) {
            let value = rest.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Parses the song list table
///
/// Header and footer rows are skipped by id. Within a row, the duration and
/// size cells are found by shape rather than position, since the table
/// gains and loses columns depending on which formats an album offers.
pub(crate) fn extract_tracks(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
) -> Result<Vec<ScrapedTrack>> {
    let Ok(row_selector) = Selector::parse("table#songlist tr, table.songlist tr") else {
        return Ok(Vec::new());
    };

    let mut tracks = Vec::new();

    for row in document.select(&row_selector) {
        if matches!(
            row.value().attr("id"),
            Some("songlist_header") | Some("songlist_footer")
        ) {
            continue;
        }

        let Some((name, href)) = select::longest_anchor(row, "/game-soundtracks/album/") else {
            continue;
        };
        let Some(page_url) = build_url(Some(&href), base, allowed_domains)? else {
            continue;
        };

        let cells = select::cell_texts(row);
        let duration = cells.iter().find(|text| is_duration(text)).cloned();

        let mut sizes = cells.iter().filter(|text| is_size(text));
        let mp3_size = sizes.next().cloned();
        let flac_size = sizes.next().cloned();

        tracks.push(ScrapedTrack {
            name,
            duration,
            size: mp3_size.clone(),
            mp3_size,
            flac_size,
            page_url,
        });
    }

    Ok(tracks)
}

/// `M:SS` or `H:MM:SS` shapes
fn is_duration(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Size cells as the site prints them: "3.81 MB", "24.33 MB", "1.2 GB"
fn is_size(text: &str) -> bool {
    let text = text.trim();
    ["KB", "MB", "GB"].iter().any(|unit| {
        text.strip_suffix(unit).is_some_and(|amount| {
            let amount = amount.trim();
            !amount.is_empty()
                && amount.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        })
    })
}

/// Finds the album id in the collection-playlist link
pub(crate) fn extract_download_id(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"a[href*="/cp/add_album/"]"#).ok()?;

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let start = match href.find("/cp/add_album/") {
            Some(index) => index + "/cp/add_album/".len(),
            None => continue,
        };
        let id: String = href[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if !id.is_empty() {
            return Some(id);
        }
    }

    None
}

/// Harvests whole-album archive links, split into MP3 and FLAC slots
///
/// Candidates failing resolution or allow-list validation are dropped
/// silently, like track URL candidates.
pub(crate) fn extract_bulk_urls(
    document: &Html,
    base: &Url,
    allowed_domains: &[String],
) -> BulkDownloadUrls {
    let mut urls = BulkDownloadUrls::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return urls;
    };

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.to_lowercase().contains(".zip") {
            continue;
        }

        let resolved = match build_url(Some(href), base, allowed_domains) {
            Ok(Some(url)) => url,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!("Dropping bulk download candidate {}: {}", href, e);
                continue;
            }
        };

        let is_flac = href.to_lowercase().contains("flac")
            || select::element_text(anchor).to_lowercase().contains("flac");

        if is_flac {
            urls.flac.get_or_insert(resolved);
        } else {
            urls.mp3.get_or_insert(resolved);
        }
    }

    urls
}
