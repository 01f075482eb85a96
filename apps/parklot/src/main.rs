//! # Parklot API Server
//!
//! HTTP/JSON API and static web frontend over the parking lot database.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load config ──► open SQLite + migrate ──► provision empty lot         │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │  Browser / curl ───► axum (8080) ───► ParkingLot ───► SQLite           │
//! │                                                                         │
//! │  Ctrl+C / SIGTERM ──► drain requests ──► close pool                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use parklot::config::{config_path_from_args, AppConfig};
use parklot::http::{router, AppState};
use parklot::logging;
use parklot_db::{Database, ParkingLot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");

    info!("Starting Parklot API server...");

    let config = AppConfig::load(config_path_from_args(std::env::args().skip(1)))
        .context("Failed to load configuration")?;
    info!(
        db = %config.database.path.display(),
        addr = %config.server.bind_address(),
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    let lot = ParkingLot::new(db.clone());
    if lot.provision_if_empty(&config.lot.layout()).await? {
        info!(
            car = config.lot.car_slots,
            bike = config.lot.bike_slots,
            "Provisioned empty lot"
        );
    }

    let state = AppState {
        lot,
        history_limit: config.server.history_limit,
    };
    let app = router(state, &config.server.web_root);

    let listener = TcpListener::bind(config.server.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
