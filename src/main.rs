//! FitTrack dashboard bootstrap.
//!
//! Opens the local store, seeds it on first run and prints the dashboard summary as JSON.

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fittrack_core::config::Config;
use fittrack_core::models::wire::stored_precision;
use fittrack_core::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting FitTrack");
    tracing::info!("Database path: {:?}", config.db_path);
    if !config.seed_fixtures {
        tracing::info!("Fixture seeding disabled (FITTRACK_SEED_FIXTURES)");
    }

    let now = stored_precision(Utc::now());
    let state = AppState::from_config(&config, now).await?;

    match state.session.current_user() {
        Some(user) => tracing::info!("Signed in as {} ({:?})", user.email, user.role),
        None => tracing::info!("No active session"),
    }

    let summary = state.dashboard(now);
    if !summary.expiring_soon.is_empty() {
        tracing::warn!(
            "{} memberships expire within a week",
            summary.expiring_soon.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
