//! End-to-end engine tests: listings, search, track resolution, caching

use crate::common::test_config;
use vgm_scraper::Scraper;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_years_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks"))
        .respond_with(html(
            r#"<html><body>
                <a href="/game-soundtracks/year/1998/">1998</a>
                <a href="/game-soundtracks/year/0000/">unknown</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert_eq!(scraper.years().await, vec!["1998", "0000"]);
}

#[tokio::test]
async fn test_years_degrade_to_empty_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(scraper.years().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_year_calls_share_one_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks"))
        .respond_with(html(r#"<a href="/game-soundtracks/year/2001/">2001</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let (a, b) = tokio::join!(scraper.years(), scraper.years());

    assert_eq!(a, vec!["2001"]);
    assert_eq!(b, vec!["2001"]);
    // The mock's expect(1) verifies a single upstream request on drop
}

#[tokio::test]
async fn test_albums_by_year_longest_anchor_and_sorting() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/year/1997"))
        .respond_with(html(
            r#"<table>
                <tr>
                    <td><a href="/game-soundtracks/album/ff7">FF</a>
                        <a href="/game-soundtracks/album/ff7">Final Fantasy VII</a></td>
                    <td>PSX</td>
                </tr>
                <tr>
                    <td><a href="/game-soundtracks/album/castlevania-sotn">Castlevania: Symphony of the Night</a></td>
                    <td>PSX</td>
                </tr>
            </table>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let albums = scraper.albums_by_year("1997").await;

    assert_eq!(albums.len(), 2);
    // Alphabetical by title, not page order
    assert_eq!(albums[0].title, "Castlevania: Symphony of the Night");
    assert_eq!(albums[1].title, "Final Fantasy VII");
    assert_eq!(albums[1].platform, "PSX");
    assert_eq!(albums[1].year, "1997");
    assert!(albums[1].url.ends_with("/game-soundtracks/album/ff7"));
}

#[tokio::test]
async fn test_albums_by_year_stops_after_consecutive_empty_pages() {
    let server = MockServer::start().await;

    let row = r#"<table><tr>
        <td><a href="/game-soundtracks/album/only">Only Album</a></td>
        <td>PC</td>
    </tr></table>"#;

    // Empty pages 2-4 still advertise a next page; the crawl must stop on
    // its own after three consecutive empties and never ask for page 5
    for page in 2..=4 {
        Mock::given(method("GET"))
            .and(path("/game-soundtracks/year/1998"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(html(&format!(
                r#"<table></table><a href="/game-soundtracks/year/1998?page={}">Next</a>"#,
                page + 1
            )))
            .expect(1)
            .mount(&server)
            .await;
    }

    // First page: one row plus a link to page 2. Mounted last so the
    // page-specific mocks above win for page>=2 requests; a page-5 request
    // would land here and break this mock's expectation.
    Mock::given(method("GET"))
        .and(path("/game-soundtracks/year/1998"))
        .respond_with(html(&format!(
            r#"{}<a href="/game-soundtracks/year/1998?page=2">Next</a>"#,
            row
        )))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let albums = scraper.albums_by_year("1998").await;

    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].title, "Only Album");
}

#[tokio::test]
async fn test_albums_by_year_stops_without_next_signal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/year/2005"))
        .respond_with(html(
            r#"<table><tr>
                <td><a href="/game-soundtracks/album/x">X</a></td><td>PS2</td>
            </tr></table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let albums = scraper.albums_by_year("2005").await;
    assert_eq!(albums.len(), 1);
}

#[tokio::test]
async fn test_search_sends_sanitized_query() {
    let server = MockServer::start().await;

    // The mock only matches the control-stripped query
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("search", "zelda"))
        .respond_with(html(
            r#"<table><tr>
                <td><a href="/game-soundtracks/album/zelda-oot">Zelda: Ocarina of Time</a></td>
                <td>N64</td>
                <td>Soundtrack</td>
                <td>1998</td>
            </tr></table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let results = scraper.search_albums("zel\u{0}da").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Zelda: Ocarina of Time");
    assert_eq!(results[0].platform, "N64");
    assert_eq!(results[0].kind, "Soundtrack");
    assert_eq!(results[0].year, "1998");
}

#[tokio::test]
async fn test_search_blank_queries_issue_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(scraper.search_albums("").await.unwrap().is_empty());
    assert!(scraper.search_albums("   ").await.unwrap().is_empty());
    assert!(scraper.search_albums("\u{1}\u{2}").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_degrades_to_empty_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    assert!(scraper.search_albums("mario").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_album_detail_extraction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/ff7"))
        .respond_with(html(
            r#"<div id="pageContent">
                <h2>Final Fantasy VII Original Soundtrack</h2>
                <p>Platforms: PSX
Year: 1997</p>
                <a href="/cp/add_album/4422">Add album to playlist</a>
                <table id="songlist">
                    <tr id="songlist_header"><th>Song</th></tr>
                    <tr>
                        <td>1.</td>
                        <td><a href="/game-soundtracks/album/ff7/prelude.mp3">Prelude</a></td>
                        <td>2:51</td>
                        <td>3.81 MB</td>
                    </tr>
                </table>
                <a href="/downloads/album-mp3.zip">Download all (MP3)</a>
            </div>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let album_url = format!("{}/game-soundtracks/album/ff7", server.uri());

    let info = scraper.album_info(&album_url).await;
    assert_eq!(info.title, "Final Fantasy VII Original Soundtrack");
    assert_eq!(info.platform.as_deref(), Some("PSX"));
    assert_eq!(info.year.as_deref(), Some("1997"));

    let tracks = scraper.album_tracks(&album_url).await;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].name, "Prelude");
    assert_eq!(tracks[0].duration.as_deref(), Some("2:51"));

    let id = scraper.album_download_id(&album_url).await;
    assert_eq!(id.as_deref(), Some("4422"));

    let bulk = scraper.bulk_download_urls(&album_url).await;
    assert!(bulk.mp3.as_deref().unwrap().ends_with("/downloads/album-mp3.zip"));
    assert_eq!(bulk.flac, None);
}

#[tokio::test]
async fn test_track_url_resolution_skips_offsite_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/album/ff7/prelude"))
        .respond_with(html(
            r#"<html><body>
                <audio controls><source src="https://evil.example/siphon.mp3"></audio>
                <a href="/audio/prelude.mp3">Click here to download</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let page = format!("{}/game-soundtracks/album/ff7/prelude", server.uri());
    let urls = scraper.track_direct_url(&page).await;

    // The off-site audio source is discarded; the anchor fallback wins
    assert!(urls.mp3.as_deref().unwrap().ends_with("/audio/prelude.mp3"));
    assert_eq!(urls.flac, None);
}

#[tokio::test]
async fn test_track_urls_degrade_to_empty_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let page = format!("{}/game-soundtracks/album/x/track", server.uri());
    let urls = scraper.track_direct_url(&page).await;

    assert_eq!(urls.mp3, None);
    assert_eq!(urls.flac, None);
}

#[tokio::test]
async fn test_recent_albums_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/last-added"))
        .respond_with(html(
            r#"<table>
                <tr>
                    <td><a href="/game-soundtracks/album/new">Brand New OST</a></td>
                    <td>Switch</td>
                    <td>2026</td>
                </tr>
            </table>"#,
        ))
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let recent = scraper.recent_albums().await;

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].title, "Brand New OST");
    assert_eq!(recent[0].year, "2026");
}

#[tokio::test]
async fn test_repeat_listing_calls_hit_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/game-soundtracks/year/1999"))
        .respond_with(html(
            r#"<table><tr>
                <td><a href="/game-soundtracks/album/a">A</a></td><td>PC</td>
            </tr></table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(test_config(&server.uri())).unwrap();
    let first = scraper.albums_by_year("1999").await;
    let second = scraper.albums_by_year("1999").await;

    assert_eq!(first, second);
    // expect(1) on the mock verifies the second call never hit the server
}
