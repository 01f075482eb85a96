//! # Parking Lot Service
//!
//! The one service both shells call. It combines the pure billing rules
//! from parklot-core with the slot and ticket repositories, and owns the
//! transactions that keep slots and tickets consistent.
//!
//! ## Park / Exit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  park(type, no, now)                                                   │
//! │     ├── ACTIVE ticket for no?  → AlreadyParked                         │
//! │     └── BEGIN                                                          │
//! │          ├── claim_free(type)  → none → NoSpaceAvailable (rollback)    │
//! │          ├── insert ticket     → unique clash → AlreadyParked          │
//! │          └── COMMIT                                                    │
//! │                                                                         │
//! │  exit(no, now)                                                         │
//! │     ├── ACTIVE ticket for no?  → none → VehicleNotParked               │
//! │     ├── bill = billing::bill(type, entry, now)                         │
//! │     └── BEGIN                                                          │
//! │          ├── complete_exit  WHERE status='ACTIVE'                      │
//! │          │                  → 0 rows → VehicleNotParked (rollback)     │
//! │          ├── set_occupied(slot, false)                                 │
//! │          └── COMMIT                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes `now` from the caller. Timestamps are stored at
//! whole-second precision.

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::{slot, ticket};
use parklot_core::billing;
use parklot_core::report::{ExitReceipt, LotStatus, ParkReceipt, ParkedVehicle, VehicleLookup};
use parklot_core::validation::{validate_history_limit, validate_slot_count};
use parklot_core::{CoreError, NewTicket, Ticket, ValidationError, VehicleNo, VehicleType};

/// Index column whose UNIQUE violation means "already parked".
const ACTIVE_VEHICLE_FIELD: &str = "tickets.vehicle_no";

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by the lot service.
#[derive(Debug, Error)]
pub enum LotError {
    /// Expected parking outcome (full lot, unknown vehicle, bad input).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for LotError {
    fn from(err: ValidationError) -> Self {
        LotError::Core(CoreError::Validation(err))
    }
}

pub type LotResult<T> = Result<T, LotError>;

// =============================================================================
// Service
// =============================================================================

/// Slot allocation, billing and reporting over one database.
#[derive(Debug, Clone)]
pub struct ParkingLot {
    db: Database,
}

impl ParkingLot {
    pub fn new(db: Database) -> Self {
        ParkingLot { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Parks a vehicle in the first free slot of its type.
    pub async fn park(
        &self,
        vehicle_type: VehicleType,
        vehicle_no: &VehicleNo,
        now: DateTime<Utc>,
    ) -> LotResult<ParkReceipt> {
        let now = now.trunc_subsecs(0);

        if self
            .db
            .tickets()
            .find_active_by_vehicle_no(vehicle_no.as_str())
            .await?
            .is_some()
        {
            return Err(CoreError::AlreadyParked(vehicle_no.to_string()).into());
        }

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let Some(claimed) = slot::claim_free(&mut *tx, vehicle_type).await? else {
            debug!(vehicle_type = %vehicle_type, "No free slot");
            return Err(CoreError::NoSpaceAvailable { vehicle_type }.into());
        };

        let new_ticket = NewTicket::active(&claimed, vehicle_no.clone(), now);
        let ticket_id = match ticket::insert(&mut *tx, &new_ticket).await {
            Ok(id) => id,
            Err(err) if err.is_unique_violation_on(ACTIVE_VEHICLE_FIELD) => {
                // lost a race with another park of the same vehicle
                return Err(CoreError::AlreadyParked(vehicle_no.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            ticket_id,
            vehicle_no = %vehicle_no,
            slot = %claimed.label(),
            "Vehicle parked"
        );

        Ok(ParkReceipt {
            ticket_id,
            slot: claimed.label(),
            vehicle_no: vehicle_no.to_string(),
            vehicle_type,
            entry_time: now,
        })
    }

    /// Bills and releases a parked vehicle.
    pub async fn exit(&self, vehicle_no: &VehicleNo, now: DateTime<Utc>) -> LotResult<ExitReceipt> {
        let now = now.trunc_subsecs(0);

        let active = self
            .db
            .tickets()
            .find_active_by_vehicle_no(vehicle_no.as_str())
            .await?
            .ok_or_else(|| CoreError::VehicleNotParked(vehicle_no.to_string()))?;

        let bill = billing::bill(active.vehicle_type, active.entry_time, now);
        let settled = active.settle(now, bill.amount)?;

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        match ticket::complete_exit(&mut *tx, &settled).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                warn!(ticket_id = settled.id, "Ticket settled concurrently");
                return Err(CoreError::VehicleNotParked(vehicle_no.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        }

        slot::set_occupied(&mut *tx, settled.slot_id, false).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            ticket_id = settled.id,
            vehicle_no = %vehicle_no,
            hours = bill.hours,
            amount = %bill.amount,
            "Vehicle exited"
        );

        Ok(ExitReceipt {
            ticket: settled,
            bill,
        })
    }

    /// Slot totals per type and the occupied slot list.
    pub async fn status(&self) -> LotResult<LotStatus> {
        let slots = self.db.slots();

        let totals = slots.count_by_type().await?;
        let available = slots.count_available_by_type().await?;
        let occupied = slots.list_occupied().await?;

        Ok(LotStatus::from_counts(&totals, &available, occupied))
    }

    /// Looks up a parked vehicle.
    pub async fn search(
        &self,
        vehicle_no: &VehicleNo,
        now: DateTime<Utc>,
    ) -> LotResult<Option<VehicleLookup>> {
        let found = self
            .db
            .tickets()
            .find_active_by_vehicle_no(vehicle_no.as_str())
            .await?;

        Ok(found.map(|t| VehicleLookup::new(&t, now)))
    }

    /// Every vehicle currently in the lot, with elapsed time.
    pub async fn parked(&self, now: DateTime<Utc>) -> LotResult<Vec<ParkedVehicle>> {
        let occupied = self.db.slots().list_occupied().await?;

        Ok(occupied.iter().map(|o| ParkedVehicle::new(o, now)).collect())
    }

    /// The most recently settled tickets.
    pub async fn history(&self, limit: i64) -> LotResult<Vec<Ticket>> {
        validate_history_limit(limit)?;

        Ok(self.db.tickets().recent_history(limit).await?)
    }

    /// Creates the slot layout when the lot has no slots yet.
    ///
    /// ## Returns
    /// `true` if slots were created.
    pub async fn provision_if_empty(&self, layout: &[(VehicleType, i64)]) -> LotResult<bool> {
        for (_, count) in layout {
            validate_slot_count(*count)?;
        }

        let slots = self.db.slots();
        let existing = slots.count().await?;
        if existing > 0 {
            debug!(existing, "Slots already provisioned");
            return Ok(false);
        }

        for (vehicle_type, count) in layout {
            let created = slots.provision(*vehicle_type, *count).await?;
            info!(vehicle_type = %vehicle_type, created, "Provisioned slots");
        }

        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use parklot_core::{Money, TicketStatus};

    use crate::pool::DbConfig;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    fn no(raw: &str) -> VehicleNo {
        VehicleNo::parse(raw).unwrap()
    }

    async fn lot(car: i64, bike: i64) -> ParkingLot {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = ParkingLot::new(db);
        lot.provision_if_empty(&[(VehicleType::Car, car), (VehicleType::Bike, bike)])
            .await
            .unwrap();
        lot
    }

    #[tokio::test]
    async fn test_park_then_exit_two_and_a_half_hours() {
        let lot = lot(2, 2).await;

        let receipt = lot.park(VehicleType::Car, &no("UP14AB1234"), t0()).await.unwrap();
        assert_eq!(receipt.ticket_id, 1);
        assert_eq!(receipt.slot.to_string(), "CAR-1");

        let exit = lot
            .exit(&no("UP14AB1234"), t0() + Duration::minutes(150))
            .await
            .unwrap();
        assert_eq!(exit.bill.hours, 3);
        assert_eq!(exit.bill.amount, Money::from_major(40));
        assert_eq!(exit.ticket.status, TicketStatus::Paid);

        let slot = lot.database().slots().get_by_id(1).await.unwrap().unwrap();
        assert!(!slot.occupied);

        let history = lot.history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].vehicle_no, "UP14AB1234");
        assert_eq!(history[0].vehicle_type, VehicleType::Car);
        assert_eq!(history[0].amount(), Some(Money::from_major(40)));
    }

    #[tokio::test]
    async fn test_immediate_exit_bills_one_hour() {
        let lot = lot(0, 1).await;

        lot.park(VehicleType::Bike, &no("KA01X1"), t0()).await.unwrap();
        let exit = lot.exit(&no("KA01X1"), t0()).await.unwrap();

        assert_eq!(exit.bill.hours, 1);
        assert_eq!(exit.bill.amount, Money::from_major(20));
        assert!(lot.search(&no("KA01X1"), t0()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_full_lot_creates_nothing() {
        let lot = lot(1, 0).await;

        let err = lot.park(VehicleType::Bike, &no("KA01X1"), t0()).await.unwrap_err();
        assert!(matches!(
            err,
            LotError::Core(CoreError::NoSpaceAvailable {
                vehicle_type: VehicleType::Bike
            })
        ));

        let status = lot.status().await.unwrap();
        assert_eq!(status.get(VehicleType::Car).available, 1);
        assert!(lot.database().tickets().get_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_park_twice_is_rejected() {
        let lot = lot(3, 0).await;

        lot.park(VehicleType::Car, &no("UP14AB1234"), t0()).await.unwrap();
        let err = lot
            .park(VehicleType::Car, &no("up14ab1234"), t0())
            .await
            .unwrap_err();

        assert!(matches!(err, LotError::Core(CoreError::AlreadyParked(_))));

        let status = lot.status().await.unwrap();
        assert_eq!(status.get(VehicleType::Car).total, 3);
        assert_eq!(status.get(VehicleType::Car).available, 2);
    }

    #[tokio::test]
    async fn test_second_exit_does_not_bill_twice() {
        let lot = lot(1, 0).await;

        lot.park(VehicleType::Car, &no("UP14AB1234"), t0()).await.unwrap();
        lot.exit(&no("UP14AB1234"), t0() + Duration::minutes(30)).await.unwrap();

        let err = lot
            .exit(&no("UP14AB1234"), t0() + Duration::minutes(300))
            .await
            .unwrap_err();
        assert!(matches!(err, LotError::Core(CoreError::VehicleNotParked(_))));

        let history = lot.history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount(), Some(Money::from_major(30)));
    }

    #[tokio::test]
    async fn test_slot_is_reused_after_exit() {
        let lot = lot(1, 0).await;

        lot.park(VehicleType::Car, &no("AAA1"), t0()).await.unwrap();
        lot.exit(&no("AAA1"), t0() + Duration::minutes(10)).await.unwrap();

        let receipt = lot
            .park(VehicleType::Car, &no("BBB2"), t0() + Duration::minutes(20))
            .await
            .unwrap();
        assert_eq!(receipt.slot.to_string(), "CAR-1");
        assert_eq!(receipt.ticket_id, 2);
    }

    #[tokio::test]
    async fn test_status_and_parked_views() {
        let lot = lot(2, 2).await;

        lot.park(VehicleType::Bike, &no("KA01X1"), t0()).await.unwrap();
        lot.park(VehicleType::Car, &no("UP14AB1234"), t0()).await.unwrap();

        let status = lot.status().await.unwrap();
        assert_eq!(status.get(VehicleType::Car).available, 1);
        assert_eq!(status.get(VehicleType::Bike).available, 1);
        assert_eq!(status.occupied.len(), 2);

        let parked = lot.parked(t0() + Duration::minutes(135)).await.unwrap();
        let rows: Vec<(String, String)> = parked
            .iter()
            .map(|p| (p.slot.to_string(), p.elapsed.to_string()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("CAR-1".to_string(), "2h 15m".to_string()),
                ("BIKE-1".to_string(), "2h 15m".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_reports_live_minutes() {
        let lot = lot(1, 0).await;
        lot.park(VehicleType::Car, &no("UP14AB1234"), t0()).await.unwrap();

        let found = lot
            .search(&no("UP14AB1234"), t0() + Duration::minutes(47))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.ticket_id, 1);
        assert_eq!(found.vehicle_type, VehicleType::Car);
        assert_eq!(found.elapsed.total_minutes(), 47);
        assert_eq!(found.elapsed.hours, 0);
    }

    #[tokio::test]
    async fn test_provision_only_when_empty() {
        let lot = lot(2, 1).await;

        let again = lot
            .provision_if_empty(&[(VehicleType::Car, 50)])
            .await
            .unwrap();
        assert!(!again);
        assert_eq!(lot.database().slots().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_history_limit_is_validated() {
        let lot = lot(1, 0).await;

        let err = lot.history(0).await.unwrap_err();
        assert!(matches!(err, LotError::Core(CoreError::Validation(_))));
    }

    /// File-backed lot so several connections write at once.
    struct FileLot {
        lot: ParkingLot,
        path: std::path::PathBuf,
    }

    impl FileLot {
        async fn open(car: i64) -> Self {
            let nanos = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            let path = std::env::temp_dir()
                .join(format!("parklot-race-{}-{}.db", std::process::id(), nanos));

            let db = Database::new(DbConfig::new(&path).max_connections(8))
                .await
                .unwrap();
            let lot = ParkingLot::new(db);
            lot.provision_if_empty(&[(VehicleType::Car, car)]).await.unwrap();

            FileLot { lot, path }
        }

        async fn remove(self) {
            self.lot.database().close().await;
            for suffix in ["", "-wal", "-shm"] {
                let mut file = self.path.clone().into_os_string();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_parks_single_writer_per_vehicle() {
        let file_lot = FileLot::open(30).await;

        let plates: Vec<String> = (0..10)
            .map(|_| "SAME1".to_string())
            .chain((0..10).map(|i| format!("RACE{i}")))
            .collect();

        let handles: Vec<_> = plates
            .into_iter()
            .map(|plate| {
                let lot = file_lot.lot.clone();
                tokio::spawn(async move { lot.park(VehicleType::Car, &no(&plate), t0()).await })
            })
            .collect();

        let mut parked = 0;
        let mut already = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => parked += 1,
                Err(LotError::Core(CoreError::AlreadyParked(plate))) => {
                    assert_eq!(plate, "SAME1");
                    already += 1;
                }
                Err(other) => panic!("unexpected park failure: {other}"),
            }
        }

        // one SAME1 plus the ten distinct plates
        assert_eq!(parked, 11);
        assert_eq!(already, 9);

        let status = file_lot.lot.status().await.unwrap();
        let car = status.get(VehicleType::Car);
        assert_eq!(car.total, 30);
        assert_eq!(car.available, 30 - parked);
        assert_eq!(status.occupied.len(), parked as usize);

        let mut slots: Vec<i64> = status.occupied.iter().map(|o| o.slot_number).collect();
        slots.dedup();
        assert_eq!(slots.len(), parked as usize);

        file_lot.remove().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_exits_bill_once() {
        let file_lot = FileLot::open(2).await;
        file_lot
            .lot
            .park(VehicleType::Car, &no("UP14AB1234"), t0())
            .await
            .unwrap();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let lot = file_lot.lot.clone();
                tokio::spawn(async move {
                    lot.exit(&no("UP14AB1234"), t0() + Duration::minutes(30)).await
                })
            })
            .collect();

        let mut billed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => billed += 1,
                Err(LotError::Core(CoreError::VehicleNotParked(_))) => {}
                Err(other) => panic!("unexpected exit failure: {other}"),
            }
        }
        assert_eq!(billed, 1);

        let history = file_lot.lot.history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(file_lot.lot.status().await.unwrap().get(VehicleType::Car).available, 2);

        file_lot.remove().await;
    }
}
