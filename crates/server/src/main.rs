//! Transitionflow server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transitionflow_api::{middleware::AppState, router as api_router};
use transitionflow_common::Config;
use transitionflow_core::{
    AccountService, AchievementService, CatalogClient, FavoriteService, RatingService,
    RecommendationService, StatsService, TransitionService, ViewTrackerService,
};
use transitionflow_db::repositories::{
    AccountRepository, FavoriteRepository, RatingRepository, TransitionRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transitionflow=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting transitionflow server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = transitionflow_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    transitionflow_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let account_repo = AccountRepository::new(Arc::clone(&db));
    let transition_repo = TransitionRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));

    // Initialize services
    let account_service = AccountService::new(account_repo);
    let transition_service =
        TransitionService::new(transition_repo.clone(), rating_repo.clone());
    let rating_service = RatingService::new(rating_repo.clone(), transition_repo.clone());
    let favorite_service = FavoriteService::new(favorite_repo, transition_repo.clone());
    let recommendation_service =
        RecommendationService::new(rating_repo.clone(), transition_repo.clone());
    let achievement_service =
        AchievementService::new(transition_repo.clone(), rating_repo.clone());
    let stats_service = StatsService::new(transition_repo.clone(), rating_repo);
    let view_tracker = ViewTrackerService::new(transition_repo);
    let catalog_client = CatalogClient::new(config.catalog.clone());

    // Create app state
    let state = AppState {
        account_service,
        transition_service,
        rating_service,
        favorite_service,
        recommendation_service,
        achievement_service,
        stats_service,
        view_tracker,
        catalog_client,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            transitionflow_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
