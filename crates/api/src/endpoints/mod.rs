//! API endpoints.

mod accounts;
mod achievements;
mod catalog;
mod favorites;
mod ratings;
mod recommendations;
mod stats;
mod transitions;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/transitions", transitions::router())
        .nest("/ratings", ratings::router())
        .nest("/favorites", favorites::router())
        .nest("/recommendations", recommendations::router())
        .nest("/achievements", achievements::router())
        .nest("/stats", stats::router())
        .nest("/catalog", catalog::router())
}
