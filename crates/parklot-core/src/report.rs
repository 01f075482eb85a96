//! # Report Types
//!
//! Read models the lot service hands to the CLI and HTTP shells. Each one
//! carries exactly what both renderings need, so neither shell goes back to
//! the store for a second lookup.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::billing::{Bill, ParkedDuration};
use crate::types::{OccupiedSlot, SlotLabel, Ticket, VehicleType};

// =============================================================================
// Park / Exit
// =============================================================================

/// Result of a successful park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkReceipt {
    pub ticket_id: i64,
    pub slot: SlotLabel,
    pub vehicle_no: String,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
}

/// Result of a successful exit: the settled ticket and how it was billed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReceipt {
    pub ticket: Ticket,
    pub bill: Bill,
}

impl ExitReceipt {
    /// Exit time of the settled ticket.
    pub fn exit_time(&self) -> Option<DateTime<Utc>> {
        self.ticket.exit_time
    }
}

// =============================================================================
// Lot Status
// =============================================================================

/// Slot totals for one vehicle type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub total: i64,
    pub available: i64,
}

impl Occupancy {
    #[inline]
    pub fn occupied(&self) -> i64 {
        (self.total - self.available).max(0)
    }
}

/// Counts per type plus the list of occupied slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotStatus {
    by_type: BTreeMap<VehicleType, Occupancy>,
    pub occupied: Vec<OccupiedSlot>,
}

impl LotStatus {
    /// Builds a status board from the two count maps.
    ///
    /// A type missing from `totals` reports zero everywhere.
    pub fn from_counts(
        totals: &BTreeMap<VehicleType, i64>,
        available: &BTreeMap<VehicleType, i64>,
        occupied: Vec<OccupiedSlot>,
    ) -> Self {
        let by_type = VehicleType::ALL
            .into_iter()
            .map(|t| {
                let occupancy = Occupancy {
                    total: totals.get(&t).copied().unwrap_or(0),
                    available: available.get(&t).copied().unwrap_or(0),
                };
                (t, occupancy)
            })
            .collect();

        LotStatus { by_type, occupied }
    }

    /// Occupancy for one type.
    pub fn get(&self, vehicle_type: VehicleType) -> Occupancy {
        self.by_type.get(&vehicle_type).copied().unwrap_or_default()
    }

    /// Occupancy for every type, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, Occupancy)> + '_ {
        self.by_type.iter().map(|(t, o)| (*t, *o))
    }
}

// =============================================================================
// Parked Vehicles
// =============================================================================

/// A vehicle found by search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleLookup {
    pub ticket_id: i64,
    pub vehicle_no: String,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
    pub elapsed: ParkedDuration,
}

impl VehicleLookup {
    pub fn new(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        VehicleLookup {
            ticket_id: ticket.id,
            vehicle_no: ticket.vehicle_no.clone(),
            vehicle_type: ticket.vehicle_type,
            entry_time: ticket.entry_time,
            elapsed: ParkedDuration::between(ticket.entry_time, now),
        }
    }
}

/// One row of the "currently parked" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkedVehicle {
    pub slot: SlotLabel,
    pub vehicle_no: String,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
    pub elapsed: ParkedDuration,
}

impl ParkedVehicle {
    pub fn new(occupied: &OccupiedSlot, now: DateTime<Utc>) -> Self {
        ParkedVehicle {
            slot: occupied.label(),
            vehicle_no: occupied.vehicle_no.clone(),
            vehicle_type: occupied.vehicle_type,
            entry_time: occupied.entry_time,
            elapsed: ParkedDuration::between(occupied.entry_time, now),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_status_missing_type_reports_zero() {
        let mut totals = BTreeMap::new();
        totals.insert(VehicleType::Car, 5);
        let mut available = BTreeMap::new();
        available.insert(VehicleType::Car, 3);

        let status = LotStatus::from_counts(&totals, &available, Vec::new());

        assert_eq!(status.get(VehicleType::Car), Occupancy { total: 5, available: 3 });
        assert_eq!(status.get(VehicleType::Car).occupied(), 2);
        assert_eq!(status.get(VehicleType::Bike), Occupancy::default());
        assert_eq!(status.iter().count(), 2);
    }

    #[test]
    fn test_parked_vehicle_elapsed() {
        let entry = Utc.with_ymd_and_hms(2026, 10, 14, 10, 0, 0).unwrap();
        let occupied = OccupiedSlot {
            slot_number: 2,
            vehicle_type: VehicleType::Bike,
            vehicle_no: "KA01X1".to_string(),
            entry_time: entry,
        };

        let row = ParkedVehicle::new(&occupied, entry + Duration::minutes(75));

        assert_eq!(row.slot.to_string(), "BIKE-2");
        assert_eq!(row.elapsed.to_string(), "1h 15m");
    }
}
