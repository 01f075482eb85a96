//! # Parklot CLI
//!
//! Interactive parking lot menu on stdin/stdout. Logs go to stderr at
//! `warn` unless `RUST_LOG` says otherwise.

use anyhow::Context;

use parklot::cli::Menu;
use parklot::config::{config_path_from_args, AppConfig};
use parklot::logging;
use parklot_db::{Database, ParkingLot};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init("warn");

    let config = AppConfig::load(config_path_from_args(std::env::args().skip(1)))
        .context("Failed to load configuration")?;

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    let lot = ParkingLot::new(db.clone());
    lot.provision_if_empty(&config.lot.layout()).await?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(lot, stdin.lock(), stdout.lock())
        .with_history_limit(config.server.history_limit)
        .run()
        .await?;

    db.close().await;
    Ok(())
}
