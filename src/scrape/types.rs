use serde::Serialize;

/// One album row from a year listing or the recent-additions page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumListItem {
    pub title: String,
    pub url: String,
    pub platform: String,
    pub year: String,
}

/// One row from the search results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub platform: String,
    /// Result category, e.g. "Soundtrack" or "Gamerip"
    pub kind: String,
    pub year: String,
}

/// One track row from an album's song list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapedTrack {
    pub name: String,
    pub duration: Option<String>,
    /// Display size of the default download, as printed on the page
    pub size: Option<String>,
    pub mp3_size: Option<String>,
    pub flac_size: Option<String>,
    /// The track's own page, where playable URLs live
    pub page_url: String,
}

/// Playable URLs resolved from a track page
///
/// Either slot is `None` when no candidate survived resolution and
/// allow-list validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackUrls {
    pub mp3: Option<String>,
    pub flac: Option<String>,
}

/// Header metadata scraped from an album page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumInfo {
    pub title: String,
    pub platform: Option<String>,
    pub year: Option<String>,
}

/// Whole-album archive downloads offered on an album page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDownloadUrls {
    pub mp3: Option<String>,
    pub flac: Option<String>,
}
