//! # Billing Module
//!
//! Tariff table and fee arithmetic for a parking session.
//!
//! ## Fee Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  minutes = floor(exit - entry)          (negative clamps to 0)          │
//! │  hours   = ceil(minutes / 60)           (0 clamps to 1)                 │
//! │                                                                         │
//! │  hours <= base_hours  →  base_fee                                      │
//! │  hours >  base_hours  →  base_fee + (hours - base_hours) × extra       │
//! │                                                                         │
//! │  ┌────────┬────────────┬──────────┬──────────────────┐                 │
//! │  │ Type   │ Base hours │ Base fee │ Extra per hour   │                 │
//! │  ├────────┼────────────┼──────────┼──────────────────┤                 │
//! │  │ CAR    │     2      │  30.00   │     10.00        │                 │
//! │  │ BIKE   │     2      │  20.00   │      5.00        │                 │
//! │  └────────┴────────────┴──────────┴──────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Live Duration
//! The "currently parked" views show elapsed time with plain floor
//! division ([`ParkedDuration`]). Only billing rounds up.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::money::Money;
use crate::types::VehicleType;

pub const MINUTES_PER_HOUR: i64 = 60;

// =============================================================================
// Tariff
// =============================================================================

/// Hourly pricing for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tariff {
    /// Hours covered by the base fee.
    pub base_hours: i64,
    pub base_fee: Money,
    /// Charged for each started hour beyond `base_hours`.
    pub extra_per_hour: Money,
}

pub const CAR_TARIFF: Tariff = Tariff {
    base_hours: 2,
    base_fee: Money::from_major(30),
    extra_per_hour: Money::from_major(10),
};

pub const BIKE_TARIFF: Tariff = Tariff {
    base_hours: 2,
    base_fee: Money::from_major(20),
    extra_per_hour: Money::from_major(5),
};

impl Tariff {
    /// Looks up the tariff for a vehicle type.
    pub const fn for_vehicle(vehicle_type: VehicleType) -> Tariff {
        match vehicle_type {
            VehicleType::Car => CAR_TARIFF,
            VehicleType::Bike => BIKE_TARIFF,
        }
    }

    /// Fee for a number of billable hours.
    pub fn fee_for_hours(&self, hours: i64) -> Money {
        if hours <= self.base_hours {
            self.base_fee
        } else {
            self.base_fee + self.extra_per_hour * (hours - self.base_hours)
        }
    }
}

impl VehicleType {
    #[inline]
    pub const fn tariff(&self) -> Tariff {
        Tariff::for_vehicle(*self)
    }
}

// =============================================================================
// Fee Arithmetic
// =============================================================================

/// Whole minutes between entry and exit, never negative.
pub fn elapsed_minutes(entry: DateTime<Utc>, exit: DateTime<Utc>) -> i64 {
    (exit - entry).num_minutes().max(0)
}

/// Started hours for a duration, with a one hour minimum.
///
/// ## Example
/// ```rust
/// use parklot_core::billing::billable_hours;
///
/// assert_eq!(billable_hours(0), 1);
/// assert_eq!(billable_hours(60), 1);
/// assert_eq!(billable_hours(61), 2);
/// ```
pub fn billable_hours(minutes: i64) -> i64 {
    let minutes = minutes.max(0);
    let hours = (minutes + MINUTES_PER_HOUR - 1) / MINUTES_PER_HOUR;
    hours.max(1)
}

/// Fee for a vehicle type parked for `minutes`.
pub fn fee(vehicle_type: VehicleType, minutes: i64) -> Money {
    vehicle_type.tariff().fee_for_hours(billable_hours(minutes))
}

// =============================================================================
// Bill
// =============================================================================

/// Outcome of billing one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bill {
    /// Elapsed whole minutes.
    pub minutes: i64,
    /// Billable hours after rounding up.
    pub hours: i64,
    pub amount: Money,
}

/// Bills a session from entry to exit.
pub fn bill(vehicle_type: VehicleType, entry: DateTime<Utc>, exit: DateTime<Utc>) -> Bill {
    let minutes = elapsed_minutes(entry, exit);
    let hours = billable_hours(minutes);

    Bill {
        minutes,
        hours,
        amount: vehicle_type.tariff().fee_for_hours(hours),
    }
}

// =============================================================================
// Parked Duration
// =============================================================================

/// Elapsed time of a vehicle still in the lot, e.g. `2h 30m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkedDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl ParkedDuration {
    pub fn from_minutes(total: i64) -> Self {
        let total = total.max(0);
        ParkedDuration {
            hours: total / MINUTES_PER_HOUR,
            minutes: total % MINUTES_PER_HOUR,
        }
    }

    pub fn between(entry: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_minutes(elapsed_minutes(entry, now))
    }

    pub fn total_minutes(&self) -> i64 {
        self.hours * MINUTES_PER_HOUR + self.minutes
    }
}

impl fmt::Display for ParkedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
