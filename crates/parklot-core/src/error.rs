//! # Error Types
//!
//! Domain-specific error types for parklot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  parklot-core errors (this file)                                       │
//! │  ├── CoreError        - Parking outcomes (no space, not parked, ...)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  parklot-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LotError         - CoreError | DbError from the lot service       │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - Status code + {"error": ...} body              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LotError → ApiError → Client      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{TicketStatus, VehicleType};

// =============================================================================
// Core Error
// =============================================================================

/// Parking outcomes that stop an operation.
///
/// These are expected results of normal use (a full lot, a mistyped plate),
/// not faults. Shells render them as messages or 4xx responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Every slot of the requested type is occupied.
    ///
    /// ## When This Occurs
    /// ```text
    /// park(BIKE, "KA01X1")
    ///      │
    ///      ▼
    /// claim free BIKE slot → none
    ///      │
    ///      ▼
    /// NoSpaceAvailable { vehicle_type: Bike }
    /// (no ticket created, no slot touched)
    /// ```
    #[error("No space available for {vehicle_type}")]
    NoSpaceAvailable { vehicle_type: VehicleType },

    /// No ACTIVE ticket exists for the vehicle number.
    #[error("No active ticket found for vehicle number: {0}")]
    VehicleNotParked(String),

    /// The vehicle already holds an ACTIVE ticket.
    #[error("Vehicle {0} is already parked")]
    AlreadyParked(String),

    /// Ticket is not in a state that allows the requested transition.
    #[error("Ticket {ticket_id} is {status}, cannot perform operation")]
    InvalidTicketStatus { ticket_id: i64, status: TicketStatus },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the shells before any store is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. control characters, malformed form body).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NoSpaceAvailable {
            vehicle_type: VehicleType::Car,
        };
        assert_eq!(err.to_string(), "No space available for CAR");

        let err = CoreError::VehicleNotParked("UP14AB1234".to_string());
        assert_eq!(
            err.to_string(),
            "No active ticket found for vehicle number: UP14AB1234"
        );

        let err = CoreError::InvalidTicketStatus {
            ticket_id: 7,
            status: TicketStatus::Paid,
        };
        assert_eq!(err.to_string(), "Ticket 7 is PAID, cannot perform operation");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "vehicle number".to_string(),
        };
        assert_eq!(err.to_string(), "vehicle number is required");

        let err = ValidationError::TooLong {
            field: "vehicle number".to_string(),
            max: 20,
        };
        assert_eq!(err.to_string(), "vehicle number must be at most 20 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "vehicle type".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
