//! # Parklot Application
//!
//! The two presentation shells over [`parklot_db::ParkingLot`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  parklot-api ──► http::router ──┐                                      │
//! │                                 ├──► ParkingLot ──► SQLite             │
//! │  parklot-cli ──► cli::Menu ─────┘                                      │
//! │                                                                         │
//! │  Both read AppConfig (config) and log through tracing (logging).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};
