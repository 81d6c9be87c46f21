//! High-level scraping façade
//!
//! `Scraper` bundles one session context with a cache per data family and
//! exposes the operations callers (route handlers, UIs) consume. Browsing
//! calls degrade gracefully: a failed fetch logs and yields an empty or
//! default record, because a partial miss should not abort an interactive
//! session. Authentication and query validation fail loudly instead — the
//! caller must react to those differently.

use crate::auth;
use crate::cache::AsyncCache;
use crate::config::ScraperConfig;
use crate::scrape::{
    self, AlbumInfo, AlbumListItem, BulkDownloadUrls, ScrapedTrack, SearchResult, TrackUrls,
};
use crate::session::transport::{self, RequestOptions, StreamResponse};
use crate::session::SessionContext;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

const YEARS_TTL: Duration = Duration::from_secs(6 * 60 * 60);
const ALBUM_LIST_TTL: Duration = Duration::from_secs(60 * 60);
const SEARCH_TTL: Duration = Duration::from_secs(15 * 60);
const ALBUM_DETAIL_TTL: Duration = Duration::from_secs(60 * 60);
// Track URLs carry expiring CDN tokens; keep them only briefly
const TRACK_URL_TTL: Duration = Duration::from_secs(10 * 60);

/// The scraping engine: one session, cached high-level operations
pub struct Scraper {
    ctx: Arc<SessionContext>,
    years: AsyncCache<String, Vec<String>>,
    album_lists: AsyncCache<String, Vec<AlbumListItem>>,
    searches: AsyncCache<String, Vec<SearchResult>>,
    album_infos: AsyncCache<String, AlbumInfo>,
    album_tracks: AsyncCache<String, Vec<ScrapedTrack>>,
    track_urls: AsyncCache<String, TrackUrls>,
}

impl Scraper {
    /// Builds an engine from a configuration
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let ctx = Arc::new(SessionContext::new(config)?);
        Ok(Self {
            ctx,
            years: AsyncCache::new(4, YEARS_TTL),
            album_lists: AsyncCache::new(64, ALBUM_LIST_TTL),
            searches: AsyncCache::new(128, SEARCH_TTL),
            album_infos: AsyncCache::new(256, ALBUM_DETAIL_TTL),
            album_tracks: AsyncCache::new(256, ALBUM_DETAIL_TTL),
            track_urls: AsyncCache::new(512, TRACK_URL_TTL),
        })
    }

    /// The underlying session context, for callers needing transport access
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Lists the catalog's browseable years, newest first
    ///
    /// Never fails; an unreachable or unparsable index yields an empty list.
    pub async fn years(&self) -> Vec<String> {
        let ctx = Arc::clone(&self.ctx);
        let fetched = self
            .years
            .get_or_fetch("years".to_string(), None, move || async move {
                scrape::fetch_years(&ctx).await
            })
            .await;

        match fetched {
            Ok(years) => years,
            Err(e) => {
                tracing::warn!("Year index unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Lists every album under one year, alphabetically by title
    ///
    /// Never fails; errors during the paginated crawl yield an empty list.
    pub async fn albums_by_year(&self, year: &str) -> Vec<AlbumListItem> {
        let ctx = Arc::clone(&self.ctx);
        let owned_year = year.to_string();
        let fetched = self
            .album_lists
            .get_or_fetch(year.to_string(), None, move || async move {
                scrape::fetch_albums_by_year(&ctx, &owned_year).await
            })
            .await;

        match fetched {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!("Album listing for {} unavailable: {}", year, e);
                Vec::new()
            }
        }
    }

    /// Searches the catalog
    ///
    /// The only browsing call that can fail: an oversized query is rejected
    /// with a validation error before any request. A blank or control-only
    /// query returns empty without touching the network; network and parse
    /// problems degrade to an empty list.
    pub async fn search_albums(&self, query: &str) -> Result<Vec<SearchResult>> {
        let sanitized = match scrape::sanitize_query(query)? {
            Some(q) => q,
            None => return Ok(Vec::new()),
        };

        let ctx = Arc::clone(&self.ctx);
        let for_fetch = sanitized.clone();
        let fetched = self
            .searches
            .get_or_fetch(sanitized, None, move || async move {
                scrape::fetch_search(&ctx, &for_fetch).await
            })
            .await;

        match fetched {
            Ok(results) => Ok(results),
            Err(e) => {
                tracing::warn!("Search failed for {:?}: {}", query, e);
                Ok(Vec::new())
            }
        }
    }

    /// Album header metadata; a failed fetch yields an empty record
    pub async fn album_info(&self, album_url: &str) -> AlbumInfo {
        let ctx = Arc::clone(&self.ctx);
        let owned_url = album_url.to_string();
        let fetched = self
            .album_infos
            .get_or_fetch(album_url.to_string(), None, move || async move {
                scrape::fetch_album_info(&ctx, &owned_url).await
            })
            .await;

        match fetched {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Album info unavailable for {}: {}", album_url, e);
                AlbumInfo::default()
            }
        }
    }

    /// Album song list; a failed fetch yields an empty list
    pub async fn album_tracks(&self, album_url: &str) -> Vec<ScrapedTrack> {
        let ctx = Arc::clone(&self.ctx);
        let owned_url = album_url.to_string();
        let fetched = self
            .album_tracks
            .get_or_fetch(album_url.to_string(), None, move || async move {
                scrape::fetch_album_tracks(&ctx, &owned_url).await
            })
            .await;

        match fetched {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Track list unavailable for {}: {}", album_url, e);
                Vec::new()
            }
        }
    }

    /// The album's internal download id, when the page exposes one
    pub async fn album_download_id(&self, album_url: &str) -> Option<String> {
        match scrape::fetch_album_download_id(&self.ctx, album_url).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Download id unavailable for {}: {}", album_url, e);
                None
            }
        }
    }

    /// Whole-album archive links; failures yield empty slots
    pub async fn bulk_download_urls(&self, album_url: &str) -> BulkDownloadUrls {
        match scrape::fetch_bulk_download_urls(&self.ctx, album_url).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Bulk downloads unavailable for {}: {}", album_url, e);
                BulkDownloadUrls::default()
            }
        }
    }

    /// The recent-additions listing, uncached so new uploads show promptly
    pub async fn recent_albums(&self) -> Vec<AlbumListItem> {
        match scrape::fetch_recent_albums(&self.ctx).await {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!("Recent albums unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Playable URLs for a track page; unresolved slots come back `None`
    pub async fn track_direct_url(&self, page_url: &str) -> TrackUrls {
        let ctx = Arc::clone(&self.ctx);
        let owned_url = page_url.to_string();
        let fetched = self
            .track_urls
            .get_or_fetch(page_url.to_string(), None, move || async move {
                scrape::fetch_track_urls(&ctx, &owned_url).await
            })
            .await;

        match fetched {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Track URLs unavailable for {}: {}", page_url, e);
                TrackUrls::default()
            }
        }
    }

    /// Logs the session in against the site's forum
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        auth::login(&self.ctx, username, password).await
    }

    /// Discards the session's cookies and logged-in state
    pub async fn logout(&self) -> Result<()> {
        auth::logout(&self.ctx).await
    }

    /// Probes the site for the session's real login state; never fails
    pub async fn check_login_status(&self) -> bool {
        auth::check_login_status(&self.ctx).await
    }

    /// Opens a streaming GET through the session's rate limiter
    ///
    /// Used by the download pipeline; the body is not buffered.
    pub async fn stream(&self, url: &str, options: RequestOptions) -> Result<StreamResponse> {
        transport::stream_request(&self.ctx, url, options).await
    }

    /// Starts periodic sweeps of expired cache entries
    pub fn start_cache_sweepers(&self, every: Duration) {
        self.years.start_sweeper(every);
        self.album_lists.start_sweeper(every);
        self.searches.start_sweeper(every);
        self.album_infos.start_sweeper(every);
        self.album_tracks.start_sweeper(every);
        self.track_urls.start_sweeper(every);
    }

    /// Stops sweepers and drops all cached data
    pub fn shutdown(&self) {
        self.years.shutdown();
        self.album_lists.shutdown();
        self.searches.shutdown();
        self.album_infos.shutdown();
        self.album_tracks.shutdown();
        self.track_urls.shutdown();
    }
}
