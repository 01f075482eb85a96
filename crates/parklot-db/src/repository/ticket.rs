//! # Ticket Repository
//!
//! Database operations for parking tickets.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ticket Lifecycle                                  │
//! │                                                                         │
//! │  1. PARK                                                               │
//! │     └── insert() → Ticket { status: ACTIVE, exit_time: NULL }          │
//! │         (same transaction as the slot claim)                           │
//! │                                                                         │
//! │  2. EXIT                                                               │
//! │     └── complete_exit() → Ticket { status: PAID, amount_cents }        │
//! │         WHERE status = 'ACTIVE', zero rows → NotFound                  │
//! │         (same transaction as freeing the slot)                         │
//! │                                                                         │
//! │  3. HISTORY                                                            │
//! │     └── recent_history() → PAID tickets, latest exit first             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use parklot_core::{NewTicket, Ticket, TicketStatus};

/// Repository for ticket database operations.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, slot_id, vehicle_no, vehicle_type, entry_time,
                   exit_time, amount_cents, status
            FROM tickets
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Finds the ACTIVE ticket for an exact vehicle number.
    pub async fn find_active_by_vehicle_no(&self, vehicle_no: &str) -> DbResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, slot_id, vehicle_no, vehicle_type, entry_time,
                   exit_time, amount_cents, status
            FROM tickets
            WHERE vehicle_no = ?1 AND status = 'ACTIVE'
            "#,
        )
        .bind(vehicle_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Persists a new ACTIVE ticket.
    ///
    /// ## Returns
    /// The assigned ticket id.
    pub async fn create(&self, ticket: &NewTicket) -> DbResult<i64> {
        insert(&self.pool, ticket).await
    }

    /// Persists the PAID state of a settled ticket.
    pub async fn complete_exit(&self, ticket: &Ticket) -> DbResult<()> {
        complete_exit(&self.pool, ticket).await
    }

    /// The most recently exited PAID tickets, latest first.
    pub async fn recent_history(&self, limit: i64) -> DbResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, slot_id, vehicle_no, vehicle_type, entry_time,
                   exit_time, amount_cents, status
            FROM tickets
            WHERE status = 'PAID'
            ORDER BY exit_time DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }
}

// =============================================================================
// Executor-Generic Writes
// =============================================================================

/// Inserts an ACTIVE ticket and returns its id.
///
/// A second ACTIVE ticket for the same vehicle fails with
/// `UniqueViolation { field: "tickets.vehicle_no" }`.
pub async fn insert<'e, E>(executor: E, ticket: &NewTicket) -> DbResult<i64>
where
    E: SqliteExecutor<'e>,
{
    debug!(
        vehicle_no = %ticket.vehicle_no,
        slot_id = ticket.slot_id,
        "Inserting ticket"
    );

    let result = sqlx::query(
        r#"
        INSERT INTO tickets (slot_id, vehicle_no, vehicle_type, entry_time, status)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(ticket.slot_id)
    .bind(ticket.vehicle_no.as_str())
    .bind(ticket.vehicle_type)
    .bind(ticket.entry_time)
    .bind(TicketStatus::Active)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Writes exit time, amount and status of a settled ticket.
///
/// Only an ACTIVE row is updated, so a ticket is settled at most once.
/// Zero rows affected → `NotFound`.
pub async fn complete_exit<'e, E>(executor: E, ticket: &Ticket) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    debug!(ticket_id = ticket.id, status = %ticket.status, "Completing exit");

    let result = sqlx::query(
        r#"
        UPDATE tickets
        SET exit_time = ?1, amount_cents = ?2, status = ?3
        WHERE id = ?4 AND status = 'ACTIVE'
        "#,
    )
    .bind(ticket.exit_time)
    .bind(ticket.amount_cents)
    .bind(ticket.status)
    .bind(ticket.id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Active ticket", ticket.id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
