//! HTTP API layer for transitionflow.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: transitions, ratings, favorites, recommendations,
//!   achievements, stats, catalog search, accounts
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token session resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
