//! Achievements endpoints.

use axum::{Router, extract::State, routing::post};
use transitionflow_common::AppResult;
use transitionflow_core::AchievementStatus;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// The achievement catalog with the caller's earned flags and progress.
///
/// Recomputed from the store on every call; the counters are the sole
/// source of truth.
async fn list(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AchievementStatus>>> {
    let statuses = state.achievement_service.for_account(&account.id).await?;
    Ok(ApiResponse::ok(statuses))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}
