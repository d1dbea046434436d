//! Ratings endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use transitionflow_common::{AppError, AppResult};
use transitionflow_core::{RateOutcome, Vote, VoteState};

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Rate request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub transition_id: String,
    /// +1 for an upvote, -1 for a downvote.
    pub value: i16,
}

/// Submit a vote on a transition.
///
/// Re-submitting the caller's current vote retracts it; any other vote
/// replaces the caller's rating. The response carries the state
/// transition and the recomputed tally.
async fn rate(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<RateRequest>,
) -> AppResult<ApiResponse<RateOutcome>> {
    let vote = Vote::from_value(req.value)
        .ok_or_else(|| AppError::BadRequest("Rating value must be +1 or -1".to_string()))?;

    let outcome = state
        .rating_service
        .rate(&account.id, &req.transition_id, vote)
        .await?;

    Ok(ApiResponse::ok(outcome))
}

/// Vote state request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStateRequest {
    pub transition_id: String,
}

/// Vote state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStateResponse {
    pub state: VoteState,
}

/// Get the caller's vote state for a transition.
async fn vote_state(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<VoteStateRequest>,
) -> AppResult<ApiResponse<VoteStateResponse>> {
    let vote = state
        .rating_service
        .vote_state(&account.id, &req.transition_id)
        .await?;

    Ok(ApiResponse::ok(VoteStateResponse { state: vote }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rate", post(rate))
        .route("/state", post(vote_state))
}
