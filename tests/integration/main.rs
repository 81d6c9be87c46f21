//! Integration tests for the scraping engine
//!
//! These tests run the full stack — engine, transport, rate limiter,
//! caches — against wiremock servers serving canned markup.

mod common;

mod auth_tests;
mod engine_tests;
mod transport_tests;
