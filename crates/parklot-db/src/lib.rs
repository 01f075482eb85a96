//! # parklot-db: Database Layer for Parklot
//!
//! This crate provides database access and the parking lot service.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parklot Data Flow                                │
//! │                                                                         │
//! │  POST /api/park  or  CLI option 1                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    parklot-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  ParkingLot   │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (lot.rs)    │───►│  SlotRepo     │    │  (embedded)  │  │   │
//! │  │   │ transactions  │    │  TicketRepo   │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           └────────┬───────────┘                               │   │
//! │  │                    ▼                                            │   │
//! │  │            Database (pool.rs)  SqlitePool                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (parklot.db)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Slot and ticket repositories
//! - [`lot`] - Park / exit transactions and reports
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chrono::Utc;
//! use parklot_core::{VehicleNo, VehicleType};
//! use parklot_db::{Database, DbConfig, ParkingLot};
//!
//! let db = Database::new(DbConfig::new("./parklot.db")).await?;
//! let lot = ParkingLot::new(db);
//!
//! let receipt = lot.park(VehicleType::Car, &VehicleNo::parse("UP14AB1234")?, Utc::now()).await?;
//! println!("Parked at {}", receipt.slot);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lot;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lot::{LotError, LotResult, ParkingLot};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::slot::SlotRepository;
pub use repository::ticket::TicketRepository;
