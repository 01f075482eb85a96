//! # Slot Repository
//!
//! Database operations for parking slots.
//!
//! ## Slot Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  claim_free(CAR)                                                       │
//! │                                                                         │
//! │  UPDATE slots SET occupied = 1                                         │
//! │  WHERE id = (SELECT id FROM slots                                      │
//! │              WHERE vehicle_type = 'CAR' AND occupied = 0               │
//! │              ORDER BY id LIMIT 1)                                      │
//! │    AND occupied = 0                                                    │
//! │  RETURNING ...                                                         │
//! │                                                                         │
//! │  One statement selects and flips the slot, so two concurrent parks     │
//! │  can never receive the same slot. No row back → lot is full.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use parklot_core::{OccupiedSlot, Slot, VehicleType};

/// Repository for slot database operations.
#[derive(Debug, Clone)]
pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    /// Creates a new SlotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SlotRepository { pool }
    }

    /// Gets a slot by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, slot_number, vehicle_type, occupied
            FROM slots
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Finds a free slot of the given type without claiming it.
    ///
    /// Lowest id first.
    pub async fn find_free(&self, vehicle_type: VehicleType) -> DbResult<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, slot_number, vehicle_type, occupied
            FROM slots
            WHERE vehicle_type = ?1 AND occupied = 0
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(vehicle_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Atomically claims a free slot of the given type.
    pub async fn claim_free(&self, vehicle_type: VehicleType) -> DbResult<Option<Slot>> {
        claim_free(&self.pool, vehicle_type).await
    }

    /// Marks a slot occupied. No double-mark guard.
    pub async fn mark_occupied(&self, id: i64) -> DbResult<()> {
        set_occupied(&self.pool, id, true).await
    }

    /// Marks a slot free. No double-mark guard.
    pub async fn mark_free(&self, id: i64) -> DbResult<()> {
        set_occupied(&self.pool, id, false).await
    }

    /// Total number of slots.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM slots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Slot totals per vehicle type.
    ///
    /// Types without slots are absent from the map.
    pub async fn count_by_type(&self) -> DbResult<BTreeMap<VehicleType, i64>> {
        let rows: Vec<(VehicleType, i64)> = sqlx::query_as(
            r#"
            SELECT vehicle_type, COUNT(*)
            FROM slots
            GROUP BY vehicle_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Free slot counts per vehicle type.
    ///
    /// Types with no free slot are absent from the map.
    pub async fn count_available_by_type(&self) -> DbResult<BTreeMap<VehicleType, i64>> {
        let rows: Vec<(VehicleType, i64)> = sqlx::query_as(
            r#"
            SELECT vehicle_type, COUNT(*)
            FROM slots
            WHERE occupied = 0
            GROUP BY vehicle_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Occupied slots joined with their ACTIVE ticket.
    ///
    /// An occupied slot with no ACTIVE ticket is left out. Cars come
    /// first, then bikes, each by slot number.
    pub async fn list_occupied(&self) -> DbResult<Vec<OccupiedSlot>> {
        let rows = sqlx::query_as::<_, OccupiedSlot>(
            r#"
            SELECT s.slot_number, s.vehicle_type, t.vehicle_no, t.entry_time
            FROM slots s
            JOIN tickets t ON t.slot_id = s.id AND t.status = 'ACTIVE'
            WHERE s.occupied = 1
            ORDER BY CASE s.vehicle_type WHEN 'CAR' THEN 0 ELSE 1 END, s.slot_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Appends `count` free slots of a type, numbered after the current
    /// highest slot number of that type.
    ///
    /// ## Returns
    /// Number of slots created.
    pub async fn provision(&self, vehicle_type: VehicleType, count: i64) -> DbResult<i64> {
        debug!(vehicle_type = %vehicle_type, count, "Provisioning slots");

        let mut tx = self.pool.begin().await?;

        let highest: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(slot_number), 0) FROM slots WHERE vehicle_type = ?1",
        )
        .bind(vehicle_type)
        .fetch_one(&mut *tx)
        .await?;

        for slot_number in (highest + 1)..=(highest + count) {
            sqlx::query("INSERT INTO slots (slot_number, vehicle_type, occupied) VALUES (?1, ?2, 0)")
                .bind(slot_number)
                .bind(vehicle_type)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(count.max(0))
    }
}

// =============================================================================
// Executor-Generic Writes
// =============================================================================

/// Claims the lowest-id free slot of a type in one conditional update.
pub async fn claim_free<'e, E>(executor: E, vehicle_type: VehicleType) -> DbResult<Option<Slot>>
where
    E: SqliteExecutor<'e>,
{
    let slot = sqlx::query_as::<_, Slot>(
        r#"
        UPDATE slots
        SET occupied = 1
        WHERE id = (
            SELECT id FROM slots
            WHERE vehicle_type = ?1 AND occupied = 0
            ORDER BY id
            LIMIT 1
        )
        AND occupied = 0
        RETURNING id, slot_number, vehicle_type, occupied
        "#,
    )
    .bind(vehicle_type)
    .fetch_optional(executor)
    .await?;

    if let Some(slot) = &slot {
        debug!(slot_id = slot.id, slot = %slot.label(), "Claimed slot");
    }

    Ok(slot)
}

/// Sets the occupied flag of a slot.
pub async fn set_occupied<'e, E>(executor: E, id: i64, occupied: bool) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    debug!(slot_id = id, occupied, "Updating slot");

    let result = sqlx::query("UPDATE slots SET occupied = ?1 WHERE id = ?2")
        .bind(occupied)
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Slot", id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup(car: i64, bike: i64) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.slots().provision(VehicleType::Car, car).await.unwrap();
        db.slots().provision(VehicleType::Bike, bike).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_provision_numbers_after_highest() {
        let db = setup(2, 1).await;
        let created = db.slots().provision(VehicleType::Car, 2).await.unwrap();
        assert_eq!(created, 2);

        let totals = db.slots().count_by_type().await.unwrap();
        assert_eq!(totals.get(&VehicleType::Car), Some(&4));
        assert_eq!(totals.get(&VehicleType::Bike), Some(&1));
        assert_eq!(db.slots().count().await.unwrap(), 5);

        // ids 1-2 are CAR, 3 is BIKE, so the new CAR slots get ids 4 and 5
        let third = db.slots().get_by_id(4).await.unwrap().unwrap();
        let fourth = db.slots().get_by_id(5).await.unwrap().unwrap();
        assert_eq!(third.label().to_string(), "CAR-3");
        assert_eq!(fourth.label().to_string(), "CAR-4");
    }

    #[tokio::test]
    async fn test_find_free_prefers_lowest_id() {
        let db = setup(3, 0).await;

        let slot = db.slots().find_free(VehicleType::Car).await.unwrap().unwrap();
        assert_eq!(slot.id, 1);
        assert!(!slot.occupied);

        assert!(db.slots().find_free(VehicleType::Bike).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_claim_free_until_full() {
        let db = setup(2, 0).await;
        let slots = db.slots();

        let first = slots.claim_free(VehicleType::Car).await.unwrap().unwrap();
        let second = slots.claim_free(VehicleType::Car).await.unwrap().unwrap();

        assert_eq!(first.slot_number, 1);
        assert_eq!(second.slot_number, 2);
        assert!(first.occupied && second.occupied);
        assert!(slots.claim_free(VehicleType::Car).await.unwrap().is_none());

        let available = slots.count_available_by_type().await.unwrap();
        assert_eq!(available.get(&VehicleType::Car), None);
    }

    #[tokio::test]
    async fn test_mark_free_and_occupied() {
        let db = setup(1, 0).await;
        let slots = db.slots();

        slots.mark_occupied(1).await.unwrap();
        assert!(slots.get_by_id(1).await.unwrap().unwrap().occupied);

        // no guard against marking twice
        slots.mark_occupied(1).await.unwrap();

        slots.mark_free(1).await.unwrap();
        assert!(!slots.get_by_id(1).await.unwrap().unwrap().occupied);
    }

    #[tokio::test]
    async fn test_mark_unknown_slot_is_not_found() {
        let db = setup(1, 0).await;

        let err = db.slots().mark_free(99).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_occupied_skips_slot_without_ticket() {
        let db = setup(2, 0).await;

        // occupied flag set, but no ACTIVE ticket references it
        db.slots().mark_occupied(1).await.unwrap();

        assert!(db.slots().list_occupied().await.unwrap().is_empty());
    }
}
