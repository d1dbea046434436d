//! Recommendations endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use transitionflow_common::AppResult;

use crate::{
    endpoints::transitions::TransitionResponse, extractors::AuthAccount, middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> usize {
    6
}

/// List recommendations request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecommendationsRequest {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Recommend transitions for the caller.
///
/// Preference comes from the caller's upvotes; with no signal the list
/// falls back to the most recent submissions.
async fn list(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<ListRecommendationsRequest>,
) -> AppResult<ApiResponse<Vec<TransitionResponse>>> {
    let limit = req.limit.min(50);
    let transitions = state
        .recommendation_service
        .for_account(&account.id, limit)
        .await?;
    let with_tallies = state.transition_service.attach_tallies(transitions).await;

    Ok(ApiResponse::ok(
        with_tallies.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}
