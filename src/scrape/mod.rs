//! Markup extraction module
//!
//! Pure-ish extraction over untrusted HTML: each operation fetches one or
//! more pages through the session transport, parses a specific fragment,
//! and produces immutable value records. Parse-shape mismatches are not
//! errors — a missing element is "nothing found" and folds into empty or
//! `None` results. The heuristics (longest-anchor titles, multi-pattern
//! pagination probes) are explicit fallback chains so they stay adjustable
//! as the site's markup drifts.

mod album;
mod listing;
mod search;
mod select;
mod track;
mod types;

// Re-export value records
pub use types::{
    AlbumInfo, AlbumListItem, BulkDownloadUrls, ScrapedTrack, SearchResult, TrackUrls,
};

// Re-export operations
pub use album::{
    fetch_album_download_id, fetch_album_info, fetch_album_tracks, fetch_bulk_download_urls,
};
pub use listing::{fetch_albums_by_year, fetch_recent_albums, fetch_years};
pub use listing::{MAX_EMPTY_PAGES, MAX_PAGES};
pub use search::{fetch_search, sanitize_query, MAX_QUERY_LENGTH};
pub use track::fetch_track_urls;
