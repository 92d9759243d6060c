//! # Onboard API Server
//!
//! Serves the onboarding API: JWT accounts, AI-assisted path assignment and
//! per-user checklists, backed by SQLite.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p onboard-api
//! ```

use onboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use onboard_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    models::onboarding_path::OnboardingPath,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "onboard_api=debug,onboard_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Onboard API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    tracing::info!(environment = config.environment.as_str(), "Configuration loaded");

    let db_config = if config.database.path == ":memory:" {
        DatabaseConfig::in_memory()
    } else {
        DatabaseConfig {
            path: config.database.path.clone(),
            max_connections: config.database.max_connections,
            ..DatabaseConfig::default()
        }
    };

    let pool = create_pool(db_config).await?;
    run_migrations(&pool).await?;

    let seeded = OnboardingPath::seed_defaults(&pool).await?;
    tracing::info!(seeded, "Default onboarding paths ready");

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);
    for route in [
        "GET  /api/health",
        "GET  /api/paths",
        "POST /api/auth/signup",
        "POST /api/auth/login",
        "GET  /api/auth/me",
        "GET  /api/users",
        "GET  /api/users/profile",
        "PUT  /api/users/profile",
        "GET  /api/users/checklist",
        "PUT  /api/users/checklist/:index",
    ] {
        tracing::debug!("  {}", route);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
