//! Cache module
//!
//! Two layers: `TtlCache` is the bounded LRU map with per-entry expiry;
//! `AsyncCache` wraps it with in-flight deduplication so many concurrent
//! identical calls collapse into one upstream fetch. Instances live in
//! process memory only — there is no cross-process coherence.

mod dedup;
mod lru;

// Re-export main types
pub use dedup::{AsyncCache, SharedResult};
pub use lru::{CacheEntry, TtlCache};
