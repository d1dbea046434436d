//! Transitions endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::{Deserialize, Serialize};
use transitionflow_common::AppResult;
use transitionflow_core::{CreateTransitionInput, RatingTally, TransitionWithTally, VoteState};

use crate::{
    extractors::{AuthAccount, MaybeAuthAccount},
    middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> u64 {
    20
}

/// Transition response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub id: String,
    pub created_at: String,
    pub account_id: String,
    pub track1_id: String,
    pub track1_name: String,
    pub track1_artist: String,
    pub track1_image: Option<String>,
    pub track2_id: String,
    pub track2_name: String,
    pub track2_artist: String,
    pub track2_image: Option<String>,
    pub crossfade_seconds: i32,
    pub description: Option<String>,
    pub tags: serde_json::Value,
    pub views_count: i32,
    pub tally: RatingTally,
}

impl From<TransitionWithTally> for TransitionResponse {
    fn from(item: TransitionWithTally) -> Self {
        let t = item.transition;
        Self {
            id: t.id,
            created_at: t.created_at.to_rfc3339(),
            account_id: t.account_id,
            track1_id: t.track1_id,
            track1_name: t.track1_name,
            track1_artist: t.track1_artist,
            track1_image: t.track1_image,
            track2_id: t.track2_id,
            track2_name: t.track2_name,
            track2_artist: t.track2_artist,
            track2_image: t.track2_image,
            crossfade_seconds: t.crossfade_seconds,
            description: t.description,
            tags: t.tags,
            views_count: t.views_count,
            tally: item.tally,
        }
    }
}

/// Submit a new transition.
async fn create(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateTransitionInput>,
) -> AppResult<ApiResponse<TransitionResponse>> {
    let transition = state.transition_service.create(&account.id, input).await?;
    let tally = RatingTally::default();

    Ok(ApiResponse::ok(
        TransitionWithTally { transition, tally }.into(),
    ))
}

/// Show transition request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowTransitionRequest {
    pub transition_id: String,
}

/// Transition detail response, with viewer-specific fields when a session
/// is present.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDetailResponse {
    #[serde(flatten)]
    pub transition: TransitionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_vote: Option<VoteState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
}

/// Get a transition's detail view.
///
/// Unknown ids are the distinct not-found outcome. The view counter is
/// bumped best-effort after the detail is assembled; tracking failures
/// never affect the response.
async fn show(
    MaybeAuthAccount(account): MaybeAuthAccount,
    State(state): State<AppState>,
    Json(req): Json<ShowTransitionRequest>,
) -> AppResult<ApiResponse<TransitionDetailResponse>> {
    let detail = state
        .transition_service
        .get_with_tally(&req.transition_id)
        .await?;

    let (viewer_vote, is_favorited) = match account {
        Some(account) => {
            let vote = state
                .rating_service
                .vote_state(&account.id, &req.transition_id)
                .await?;
            let favorited = state
                .favorite_service
                .is_favorited(&account.id, &req.transition_id)
                .await?;
            (Some(vote), Some(favorited))
        }
        None => (None, None),
    };

    state.view_tracker.record_view(&req.transition_id).await;

    Ok(ApiResponse::ok(TransitionDetailResponse {
        transition: detail.into(),
        viewer_vote,
        is_favorited,
    }))
}

/// List transitions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransitionsRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List recent transitions.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListTransitionsRequest>,
) -> AppResult<ApiResponse<Vec<TransitionResponse>>> {
    let limit = req.limit.min(100);
    let transitions = state
        .transition_service
        .list_recent(limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        transitions.into_iter().map(Into::into).collect(),
    ))
}

/// List an account's transitions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUserTransitionsRequest {
    pub account_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List an account's submissions.
async fn user(
    State(state): State<AppState>,
    Json(req): Json<ListUserTransitionsRequest>,
) -> AppResult<ApiResponse<Vec<TransitionResponse>>> {
    let limit = req.limit.min(100);
    let transitions = state
        .transition_service
        .list_by_account(&req.account_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        transitions.into_iter().map(Into::into).collect(),
    ))
}

/// Delete transition request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransitionRequest {
    pub transition_id: String,
}

/// Delete one of the caller's transitions.
async fn delete(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<DeleteTransitionRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .transition_service
        .delete(&account.id, &req.transition_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/user", post(user))
        .route("/delete", post(delete))
}
