//! Stats endpoints.

use axum::{Router, extract::State, routing::post};
use transitionflow_common::AppResult;
use transitionflow_core::AccountStats;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Aggregate statistics over the caller's submissions.
async fn account(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AccountStats>> {
    let stats = state.stats_service.for_account(&account.id).await?;
    Ok(ApiResponse::ok(stats))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/account", post(account))
}
