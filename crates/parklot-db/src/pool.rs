//! # Lot Database
//!
//! Opens the SQLite file that holds slots and tickets, and hands out the
//! repositories over it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("./parklot.db")     DbConfig::in_memory()  (tests)      │
//! │            │                                 │                          │
//! │            └──────────────┬──────────────────┘                          │
//! │                           ▼                                             │
//! │  Database::new ── WAL, synchronous=NORMAL, foreign_keys=ON              │
//! │                 └─ embedded migrations (unless disabled)                │
//! │                           │                                             │
//! │           ┌───────────────┼────────────────┐                            │
//! │           ▼               ▼                ▼                            │
//! │     db.slots()      db.tickets()     db.pool().begin()                  │
//! │     counts, claim   active lookup    park / exit transactions           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers (status, search, parked) keep going while a park or exit holds
//! the write lock, because the journal is in WAL mode.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::slot::SlotRepository;
use crate::repository::ticket::TicketRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the lot lives and how many connections may touch it.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/parklot/parklot.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Upper bound on concurrent park/exit/status work (default 5).
    pub max_connections: u32,

    pub min_connections: u32,

    /// How long a request waits for a free connection (default 30s).
    pub connect_timeout: Duration,

    pub idle_timeout: Duration,

    /// Apply the embedded schema on open (default on).
    pub run_migrations: bool,
}

impl DbConfig {
    /// Settings for a lot stored at `path`. A missing file is created.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A throwaway lot for tests.
    ///
    /// The whole database lives on one connection, so a pool query issued
    /// while a transaction is open waits until `connect_timeout`.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the lot database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the lot database and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening lot database"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Lot database ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending schema migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Raw pool; `ParkingLot` opens its transactions here.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn slots(&self) -> SlotRepository {
        SlotRepository::new(self.pool.clone())
    }

    pub fn tickets(&self) -> TicketRepository {
        TicketRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then refuses new ones.
    pub async fn close(&self) {
        info!("Closing lot database");
        self.pool.close().await;
    }

    /// `true` while the database answers `SELECT 1`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_lot_has_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);

        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = DbConfig::new("lot.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);

        let config = config.max_connections(8).run_migrations(false);
        assert_eq!(config.max_connections, 8);
        assert!(!config.run_migrations);
        assert_eq!(DbConfig::in_memory().max_connections, 1);
    }
}
