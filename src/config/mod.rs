//! Configuration module
//!
//! Handles the scraper configuration: defaults, optional TOML override
//! files, validation, and a content hash for change detection.
//!
//! # Example
//!
//! ```no_run
//! use vgm_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Rate limit: {}ms", config.rate_limit_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::ScraperConfig;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation for callers constructing configs in code
pub use validation::validate;
