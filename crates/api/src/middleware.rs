//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use transitionflow_core::{
    AccountService, AchievementService, CatalogClient, FavoriteService, RatingService,
    RecommendationService, StatsService, TransitionService, ViewTrackerService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub transition_service: TransitionService,
    pub rating_service: RatingService,
    pub favorite_service: FavoriteService,
    pub recommendation_service: RecommendationService,
    pub achievement_service: AchievementService,
    pub stats_service: StatsService,
    pub view_tracker: ViewTrackerService,
    pub catalog_client: CatalogClient,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to an account and stashes it
/// in request extensions; requests without a valid token simply continue
/// unauthenticated and are rejected per-endpoint by the extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        if let Ok(account) = state.account_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(account);
        }
    }

    next.run(req).await
}
