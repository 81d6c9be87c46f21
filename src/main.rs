//! vgm-scraper command-line interface
//!
//! Thin CLI over the scraping engine: one subcommand per engine operation,
//! with an optional TOML config file overriding the built-in defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vgm_scraper::config::{load_config_with_hash, ScraperConfig};
use vgm_scraper::Scraper;

/// Session-based scraper for a game-soundtrack archive
#[derive(Parser, Debug)]
#[command(name = "vgm-scraper")]
#[command(version, about = "Scrape a game-soundtrack catalog", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults are used without one)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog's browseable years
    Years,

    /// List every album under one year
    Albums {
        /// Year to list, e.g. 1998 (0000 = unknown year)
        year: String,
    },

    /// Search the catalog
    Search {
        /// Search query
        query: String,
    },

    /// Show an album's header metadata
    Info {
        /// Album page URL
        url: String,
    },

    /// List an album's tracks
    Tracks {
        /// Album page URL
        url: String,
    },

    /// Resolve the playable URLs for a track page
    TrackUrl {
        /// Track page URL
        url: String,
    },

    /// List the most recently added albums
    Recent,

    /// Log in against the site's forum
    Login {
        /// Forum username
        username: String,

        /// Forum password (or set VGM_PASSWORD)
        #[arg(env = "VGM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Probe whether the session is logged in
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!(
                "Loaded configuration from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => ScraperConfig::default(),
    };

    let scraper = Scraper::new(config)?;

    run_command(&scraper, cli.command).await?;

    scraper.shutdown();
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vgm_scraper=info,warn"),
            1 => EnvFilter::new("vgm_scraper=debug,info"),
            2 => EnvFilter::new("vgm_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_command(scraper: &Scraper, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Years => {
            for year in scraper.years().await {
                println!("{}", year);
            }
        }

        Command::Albums { year } => {
            let albums = scraper.albums_by_year(&year).await;
            for album in &albums {
                println!("{} [{}]  {}", album.title, album.platform, album.url);
            }
            println!("({} albums)", albums.len());
        }

        Command::Search { query } => {
            let results = scraper.search_albums(&query).await?;
            for result in &results {
                println!(
                    "{} [{} / {} / {}]  {}",
                    result.title, result.platform, result.kind, result.year, result.url
                );
            }
            println!("({} results)", results.len());
        }

        Command::Info { url } => {
            let info = scraper.album_info(&url).await;
            println!("Title:    {}", info.title);
            println!("Platform: {}", info.platform.unwrap_or_else(|| "-".to_string()));
            println!("Year:     {}", info.year.unwrap_or_else(|| "-".to_string()));
        }

        Command::Tracks { url } => {
            let tracks = scraper.album_tracks(&url).await;
            for track in &tracks {
                println!(
                    "{}  {}  {}",
                    track.name,
                    track.duration.as_deref().unwrap_or("-"),
                    track.mp3_size.as_deref().unwrap_or("-")
                );
            }
            println!("({} tracks)", tracks.len());
        }

        Command::TrackUrl { url } => {
            let urls = scraper.track_direct_url(&url).await;
            println!("mp3:  {}", urls.mp3.as_deref().unwrap_or("-"));
            println!("flac: {}", urls.flac.as_deref().unwrap_or("-"));
        }

        Command::Recent => {
            for album in scraper.recent_albums().await {
                println!("{} [{}] ({})", album.title, album.platform, album.year);
            }
        }

        Command::Login { username, password } => {
            scraper.login(&username, &password).await?;
            println!("Logged in as {}", username);
        }

        Command::Status => {
            if scraper.check_login_status().await {
                println!("Logged in");
            } else {
                println!("Not logged in");
            }
        }
    }

    Ok(())
}
