//! # Workboard API Server
//!
//! Multi-tenant project and task tracking over HTTP/JSON.
//!
//! On start-up the server:
//! 1. loads configuration from the environment (and `.env`);
//! 2. connects the PostgreSQL pool and runs pending migrations;
//! 3. seeds the OWNER / ADMIN / MEMBER roles if they are missing;
//! 4. serves the router until Ctrl-C or SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/workboard JWT_SECRET=... cargo run -p workboard-api
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use workboard_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
    seed::seed_roles,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing();

    tracing::info!(
        "Workboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await?;

    let applied = run_migrations(&pool).await?;
    tracing::info!(applied, "Database migrations complete");

    let seeded = seed_roles(&pool).await?;
    tracing::info!(
        created = seeded.created.len(),
        existing = seeded.existing.len(),
        "Roles ready"
    );

    let address = config.bind_address();
    let base_path = config.api.base_path.clone();
    let google_enabled = config.google.is_some();

    let app = build_router(AppState::new(pool.clone(), config));

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        base_path = %base_path,
        google_enabled,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// `RUST_LOG` filter, JSON output when `LOG_FORMAT=json`
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workboard_api=debug,workboard_shared=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
