//! # Domain Types
//!
//! Core domain types used throughout Parklot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Slot       │   │     Ticket      │   │  OccupiedSlot   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (row id)    │◄──│  slot_id (FK)   │   │  slot_number    │       │
//! │  │  slot_number    │   │  vehicle_no     │   │  vehicle_type   │       │
//! │  │  vehicle_type   │   │  entry_time     │   │  vehicle_no     │       │
//! │  │  occupied       │   │  exit_time?     │   │  entry_time     │       │
//! │  └─────────────────┘   │  amount_cents?  │   └─────────────────┘       │
//! │                        │  status         │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  VehicleType    │   │  TicketStatus   │   │   VehicleNo     │       │
//! │  │  Car | Bike     │   │  Active | Paid   │   │  trimmed, upper │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - `Slot.id` is the database key. `slot_number` is only unique per type,
//!   so the human label is `CAR-1` / `BIKE-1`.
//! - A ticket is found by its vehicle number while ACTIVE; after PAID it
//!   is only reachable through history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation;

// =============================================================================
// Vehicle Type
// =============================================================================

/// The kind of vehicle a slot accepts.
///
/// Stored and exchanged as `"CAR"` / `"BIKE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    /// Every vehicle type, in display order.
    pub const ALL: [VehicleType; 2] = [VehicleType::Car, VehicleType::Bike];

    /// Canonical uppercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Bike => "BIKE",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, surrounding whitespace ignored.
impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::parse_vehicle_type(s)
    }
}

// =============================================================================
// Ticket Status
// =============================================================================

/// Lifecycle state of a ticket.
///
/// ```text
/// ACTIVE ──exit──► PAID
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    /// Vehicle is inside the lot.
    Active,
    /// Vehicle has exited and the fee was recorded.
    Paid,
}

impl TicketStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "ACTIVE",
            TicketStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Vehicle Number
// =============================================================================

/// A normalized vehicle registration number.
///
/// Constructed only through [`VehicleNo::parse`], so every value held by
/// the lot service is trimmed, uppercase and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VehicleNo(String);

impl VehicleNo {
    /// Normalizes raw operator input.
    ///
    /// ## Example
    /// ```rust
    /// use parklot_core::VehicleNo;
    ///
    /// let no = VehicleNo::parse("  up14ab1234 ").unwrap();
    /// assert_eq!(no.as_str(), "UP14AB1234");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validation::normalize_vehicle_no(raw).map(VehicleNo)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VehicleNo {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Slot
// =============================================================================

/// One physical parking space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Slot {
    /// Database row id.
    pub id: i64,

    /// Number shown to operators, unique within its vehicle type.
    pub slot_number: i64,

    /// Which vehicles this slot accepts.
    pub vehicle_type: VehicleType,

    /// True while an ACTIVE ticket references this slot.
    pub occupied: bool,
}

impl Slot {
    /// Human label, e.g. `CAR-3`.
    #[inline]
    pub fn label(&self) -> SlotLabel {
        SlotLabel::new(self.vehicle_type, self.slot_number)
    }
}

/// `<TYPE>-<number>` label for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLabel {
    pub vehicle_type: VehicleType,
    pub slot_number: i64,
}

impl SlotLabel {
    pub const fn new(vehicle_type: VehicleType, slot_number: i64) -> Self {
        SlotLabel {
            vehicle_type,
            slot_number,
        }
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.vehicle_type, self.slot_number)
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// A parking session.
///
/// `exit_time` and `amount_cents` are `None` exactly while the ticket is
/// ACTIVE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Ticket {
    pub id: i64,

    /// Slot held by this session.
    pub slot_id: i64,

    pub vehicle_no: String,

    pub vehicle_type: VehicleType,

    #[ts(as = "String")]
    pub entry_time: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub exit_time: Option<DateTime<Utc>>,

    /// Fee in minor units, recorded at exit.
    pub amount_cents: Option<i64>,

    pub status: TicketStatus,
}

impl Ticket {
    /// Returns the recorded fee.
    #[inline]
    pub fn amount(&self) -> Option<Money> {
        self.amount_cents.map(Money::from_cents)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Active
    }

    /// Produces the PAID version of this ticket.
    ///
    /// Fails unless the ticket is ACTIVE; a settled ticket is never billed
    /// twice.
    pub fn settle(&self, exit_time: DateTime<Utc>, amount: Money) -> CoreResult<Ticket> {
        if !self.is_active() {
            return Err(CoreError::InvalidTicketStatus {
                ticket_id: self.id,
                status: self.status,
            });
        }

        Ok(Ticket {
            exit_time: Some(exit_time),
            amount_cents: Some(amount.cents()),
            status: TicketStatus::Paid,
            ..self.clone()
        })
    }
}

/// Values for inserting a fresh ACTIVE ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub slot_id: i64,
    pub vehicle_no: VehicleNo,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
}

impl NewTicket {
    pub fn active(slot: &Slot, vehicle_no: VehicleNo, entry_time: DateTime<Utc>) -> Self {
        NewTicket {
            slot_id: slot.id,
            vehicle_no,
            vehicle_type: slot.vehicle_type,
            entry_time,
        }
    }
}

// =============================================================================
// Occupied Slot
// =============================================================================

/// An occupied slot joined with the ACTIVE ticket holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OccupiedSlot {
    pub slot_number: i64,
    pub vehicle_type: VehicleType,
    pub vehicle_no: String,
    #[ts(as = "String")]
    pub entry_time: DateTime<Utc>,
}

impl OccupiedSlot {
    #[inline]
    pub fn label(&self) -> SlotLabel {
        SlotLabel::new(self.vehicle_type, self.slot_number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn active_ticket() -> Ticket {
        Ticket {
            id: 1,
            slot_id: 4,
            vehicle_no: "KA01X1".to_string(),
            vehicle_type: VehicleType::Bike,
            entry_time: Utc.with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap(),
            exit_time: None,
            amount_cents: None,
            status: TicketStatus::Active,
        }
    }

    #[test]
    fn test_vehicle_type_parse_is_case_insensitive() {
        assert_eq!("car".parse::<VehicleType>().unwrap(), VehicleType::Car);
        assert_eq!(" Bike ".parse::<VehicleType>().unwrap(), VehicleType::Bike);
        assert!("TRUCK".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_vehicle_type_serde_uppercase() {
        let json = serde_json::to_string(&VehicleType::Bike).unwrap();
        assert_eq!(json, "\"BIKE\"");

        let parsed: VehicleType = serde_json::from_str("\"CAR\"").unwrap();
        assert_eq!(parsed, VehicleType::Car);
    }

    #[test]
    fn test_slot_label() {
        let slot = Slot {
            id: 9,
            slot_number: 3,
            vehicle_type: VehicleType::Car,
            occupied: false,
        };
        assert_eq!(slot.label().to_string(), "CAR-3");
    }

    #[test]
    fn test_settle_active_ticket() {
        let ticket = active_ticket();
        let exit = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();

        let paid = ticket.settle(exit, Money::from_major(20)).unwrap();

        assert_eq!(paid.status, TicketStatus::Paid);
        assert_eq!(paid.exit_time, Some(exit));
        assert_eq!(paid.amount(), Some(Money::from_major(20)));
        assert_eq!(paid.entry_time, ticket.entry_time);
    }

    #[test]
    fn test_settle_paid_ticket_fails() {
        let exit = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();
        let paid = active_ticket().settle(exit, Money::from_major(20)).unwrap();

        let result = paid.settle(exit, Money::from_major(20));
        assert!(matches!(
            result,
            Err(CoreError::InvalidTicketStatus {
                status: TicketStatus::Paid,
                ..
            })
        ));
    }
}
