//! URL safety module
//!
//! Validates outbound URLs against the configured domain allow-list and
//! resolves harvested hrefs. This is the layer that keeps the engine from
//! being steered to arbitrary hosts by hostile markup.

mod matcher;
mod safety;

// Re-export main functions
pub use matcher::domain_allowed;
pub use safety::{build_url, validate_url};
