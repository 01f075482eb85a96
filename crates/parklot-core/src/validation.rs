//! # Validation Module
//!
//! Input normalization shared by the CLI and HTTP shells.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Shell (CLI prompt / HTTP form body)                          │
//! │  └── THIS MODULE: trim, uppercase, type lookup, length                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ParkingLot service                                           │
//! │  └── already-parked check, slot availability                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (vehicle_type, slot_number)                                │
//! │  └── UNIQUE vehicle_no WHERE status = 'ACTIVE'                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::VehicleType;
use crate::MAX_VEHICLE_NO_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for a history page.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// Upper bound for slots provisioned of one type in one call.
pub const MAX_SLOTS_PER_TYPE: i64 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Normalizes a vehicle registration number.
///
/// ## Rules
/// - Surrounding whitespace is removed, letters are uppercased
/// - Must not be empty
/// - At most [`MAX_VEHICLE_NO_LEN`] characters
/// - No control characters
///
/// ## Example
/// ```rust
/// use parklot_core::validation::normalize_vehicle_no;
///
/// assert_eq!(normalize_vehicle_no(" ka01x1 ").unwrap(), "KA01X1");
/// assert!(normalize_vehicle_no("   ").is_err());
/// ```
pub fn normalize_vehicle_no(raw: &str) -> ValidationResult<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "vehicle number".to_string(),
        });
    }

    if trimmed.chars().count() > MAX_VEHICLE_NO_LEN {
        return Err(ValidationError::TooLong {
            field: "vehicle number".to_string(),
            max: MAX_VEHICLE_NO_LEN,
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "vehicle number".to_string(),
            reason: "contains control characters".to_string(),
        });
    }

    Ok(trimmed.to_uppercase())
}

/// Parses a vehicle type, ignoring case and surrounding whitespace.
pub fn parse_vehicle_type(raw: &str) -> ValidationResult<VehicleType> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "vehicle type".to_string(),
        });
    }

    VehicleType::ALL
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| ValidationError::NotAllowed {
            field: "vehicle type".to_string(),
            allowed: VehicleType::ALL.iter().map(|t| t.as_str().to_string()).collect(),
        })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the size of a history page.
pub fn validate_history_limit(limit: i64) -> ValidationResult<()> {
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "history limit".to_string(),
            min: 1,
            max: MAX_HISTORY_LIMIT,
        });
    }
    Ok(())
}

/// Validates a number of slots to provision.
pub fn validate_slot_count(count: i64) -> ValidationResult<()> {
    if !(0..=MAX_SLOTS_PER_TYPE).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "slot count".to_string(),
            min: 0,
            max: MAX_SLOTS_PER_TYPE,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vehicle_no() {
        assert_eq!(normalize_vehicle_no("up14ab1234").unwrap(), "UP14AB1234");
        assert_eq!(normalize_vehicle_no("  KA 01 X 1\n").unwrap(), "KA 01 X 1");

        assert!(matches!(
            normalize_vehicle_no(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            normalize_vehicle_no(&"A".repeat(21)),
            Err(ValidationError::TooLong { max: 20, .. })
        ));
        assert!(matches!(
            normalize_vehicle_no("AB\u{7}12"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_vehicle_type() {
        assert_eq!(parse_vehicle_type("CAR").unwrap(), VehicleType::Car);
        assert_eq!(parse_vehicle_type("bike").unwrap(), VehicleType::Bike);
        assert!(matches!(
            parse_vehicle_type(""),
            Err(ValidationError::Required { .. })
        ));

        let err = parse_vehicle_type("bus").unwrap_err();
        assert_eq!(
            err.to_string(),
            "vehicle type must be one of: [\"CAR\", \"BIKE\"]"
        );
    }

    #[test]
    fn test_validate_history_limit() {
        assert!(validate_history_limit(10).is_ok());
        assert!(validate_history_limit(0).is_err());
        assert!(validate_history_limit(MAX_HISTORY_LIMIT + 1).is_err());
    }

    #[test]
    fn test_validate_slot_count() {
        assert!(validate_slot_count(0).is_ok());
        assert!(validate_slot_count(20).is_ok());
        assert!(validate_slot_count(-1).is_err());
    }
}
