//! Integration tests for unflare
//!
//! These tests drive a fully built `App` through `fetch`, the same entry
//! point an edge host calls for each request.
//! Run with: cargo test --test integration

mod helpers;

mod cookies;
mod error_handling;
mod routing;
