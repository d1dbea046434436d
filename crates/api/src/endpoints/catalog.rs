//! Catalog search endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use transitionflow_common::AppResult;
use transitionflow_core::CatalogTrack;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

const fn default_limit() -> u64 {
    10
}

/// Search tracks request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTracksRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Search the music catalog for tracks (submission flow).
async fn search(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<SearchTracksRequest>,
) -> AppResult<ApiResponse<Vec<CatalogTrack>>> {
    let limit = req.limit.min(50);
    let tracks = state.catalog_client.search_tracks(&req.query, limit).await?;
    Ok(ApiResponse::ok(tracks))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", post(search))
}
