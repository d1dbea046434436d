//! Keep-alive maintenance binary.
//!
//! Pings the store with one trivial read so the hosting provider does not
//! suspend the database for inactivity. Intended to run from a scheduler
//! every few days; exits 0 on success, 1 on failure. No flags.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transitionflow_common::Config;
use transitionflow_db::repositories::TransitionRepository;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keepalive=info".into()),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let db = match transitionflow_db::init(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    let repo = TransitionRepository::new(db);
    match repo.find_recent(1, None).await {
        Ok(_) => {
            info!("Keep-alive ping successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Keep-alive ping failed");
            ExitCode::FAILURE
        }
    }
}
