//! # parklot-core: Pure Business Logic for Parklot
//!
//! This crate is the **heart** of Parklot. It contains the tariff table,
//! the billing rules, the domain types and input validation as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parklot Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │   HTTP API (axum)        │      │   CLI menu (stdin)       │        │
//! │  │   /api/park, /api/exit   │      │   1..7, 0 to quit        │        │
//! │  └────────────┬─────────────┘      └─────────────┬────────────┘        │
//! │               └──────────────┬───────────────────┘                     │
//! │                              ▼                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           parklot-db: ParkingLot service + repositories         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ parklot-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  billing  │  │   money   │  │ validation│  │   │
//! │  │   │   Slot    │  │  Tariff   │  │   Money   │  │ vehicle   │  │   │
//! │  │   │  Ticket   │  │   Bill    │  │           │  │ no / type │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Slot, Ticket, VehicleType, etc.)
//! - [`billing`] - Tariff table, billable hours, live parked duration
//! - [`money`] - Money type with integer arithmetic
//! - [`report`] - Read models returned by the lot service to the shells
//! - [`error`] - Domain error types
//! - [`validation`] - Input normalization and validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use parklot_core::billing;
//! use parklot_core::VehicleType;
//!
//! let entry = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
//! let exit = entry + Duration::minutes(150);
//!
//! let bill = billing::bill(VehicleType::Car, entry, exit);
//! assert_eq!(bill.hours, 3);
//! assert_eq!(bill.amount.cents(), 4000); // 30.00 + 1 × 10.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of settled tickets shown by the history views.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Maximum length of a vehicle registration number after normalization.
///
/// Registration plates are well under this; the cap keeps garbage input
/// out of the tickets table.
pub const MAX_VEHICLE_NO_LEN: usize = 20;
