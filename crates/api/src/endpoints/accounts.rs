//! Accounts endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use transitionflow_common::AppResult;
use transitionflow_core::SyncProfileInput;
use transitionflow_db::entities::account;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Account response (public profile mirror).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl From<account::Model> for AccountResponse {
    fn from(a: account::Model) -> Self {
        Self {
            id: a.id,
            username: a.username,
            display_name: a.display_name,
            avatar_url: a.avatar_url,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Session response returned by the login-callback sync.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    /// Bearer token for subsequent requests.
    pub token: Option<String>,
}

/// The caller's own profile mirror.
async fn me(AuthAccount(account): AuthAccount) -> AppResult<ApiResponse<AccountResponse>> {
    Ok(ApiResponse::ok(account.into()))
}

/// Upsert the profile mirror after the identity provider's login callback.
async fn sync(
    State(state): State<AppState>,
    Json(input): Json<SyncProfileInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let account = state.account_service.sync_profile(input).await?;
    let token = account.token.clone();

    Ok(ApiResponse::ok(SessionResponse {
        account: account.into(),
        token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/sync", post(sync))
}
