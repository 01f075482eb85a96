//! # Repository Module
//!
//! Database repository implementations for Parklot.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ParkingLot service                                                    │
//! │       │                                                                 │
//! │       │  db.slots().count_by_type()                                    │
//! │       │  slot::claim_free(&mut *tx, VehicleType::Car)                  │
//! │       ▼                                                                 │
//! │  SlotRepository / TicketRepository                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository method runs on the pool. The writes that must share a
//! transaction are also exposed as free functions generic over
//! [`sqlx::SqliteExecutor`], so the lot service can pass `&mut *tx`.
//!
//! ## Available Repositories
//!
//! - [`SlotRepository`] - Slot allocation, counts, provisioning
//! - [`TicketRepository`] - Ticket creation, exit, history

pub mod slot;
pub mod ticket;

pub use slot::SlotRepository;
pub use ticket::TicketRepository;
