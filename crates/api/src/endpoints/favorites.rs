//! Favorites endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use transitionflow_common::AppResult;

use crate::{
    endpoints::transitions::TransitionResponse, extractors::AuthAccount, middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> u64 {
    20
}

/// Favorite request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub transition_id: String,
}

/// Favorite response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: String,
    pub transition_id: String,
    pub created_at: String,
}

/// Add a transition to the caller's favorites.
async fn create(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<FavoriteRequest>,
) -> AppResult<ApiResponse<FavoriteResponse>> {
    let favorite = state
        .favorite_service
        .create(&account.id, &req.transition_id)
        .await?;

    Ok(ApiResponse::ok(FavoriteResponse {
        id: favorite.id,
        transition_id: favorite.transition_id,
        created_at: favorite.created_at.to_rfc3339(),
    }))
}

/// Remove a transition from the caller's favorites.
async fn delete(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<FavoriteRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .favorite_service
        .delete(&account.id, &req.transition_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// List favorites request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFavoritesRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List the caller's favorited transitions with tallies.
async fn list(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<ListFavoritesRequest>,
) -> AppResult<ApiResponse<Vec<TransitionResponse>>> {
    let limit = req.limit.min(100);
    let transitions = state
        .favorite_service
        .list_transitions(&account.id, limit, req.until_id.as_deref())
        .await?;
    let with_tallies = state.transition_service.attach_tallies(transitions).await;

    Ok(ApiResponse::ok(
        with_tallies.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/list", post(list))
}
