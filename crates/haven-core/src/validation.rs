//! # Validation Module
//!
//! Eager input checks run before any money is computed.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Booking UI                                                   │
//! │  ├── Date pickers, numeric inputs                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── nights > 0, amounts >= 0, finite                                  │
//! │  └── Rejects before a negative total can exist                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculators                                                  │
//! │  └── Checked arithmetic; overflow becomes OutOfRange                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a night count.
///
/// ```rust
/// use haven_core::validation::validate_nights;
///
/// assert!(validate_nights(3).is_ok());
/// assert!(validate_nights(0).is_err());
/// assert!(validate_nights(-2).is_err());
/// ```
pub fn validate_nights(nights: i64) -> ValidationResult<()> {
    if nights <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "nights".to_string(),
            value: nights.to_string(),
        });
    }

    Ok(())
}

/// Validates a major-unit decimal amount (nightly rate, cleaning fee).
///
/// Zero is allowed: a listing without a cleaning fee passes `0`.
pub fn validate_major_amount(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount.to_string(),
        });
    }

    Ok(())
}

/// Validates a minor-unit amount (amount paid, payout amount).
pub fn validate_minor_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount.minor().to_string(),
        });
    }

    Ok(())
}

/// Validates a booking identifier. Any non-blank string is accepted; ids are
/// owned by the booking store, not by this engine.
pub fn validate_booking_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "booking_id".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_nights() {
        assert!(validate_nights(1).is_ok());
        assert!(validate_nights(365).is_ok());
        assert!(validate_nights(0).is_err());
        assert!(validate_nights(-1).is_err());
    }

    #[test]
    fn test_validate_major_amount() {
        assert!(validate_major_amount("price", Decimal::new(45000, 2)).is_ok());
        assert!(validate_major_amount("price", Decimal::ZERO).is_ok());
        assert_eq!(
            validate_major_amount("cleaning_fee", Decimal::new(-1, 2)),
            Err(ValidationError::Negative {
                field: "cleaning_fee".to_string(),
                value: "-0.01".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_minor_amount() {
        assert!(validate_minor_amount("total_paid", Money::from_minor(0)).is_ok());
        assert!(validate_minor_amount("total_paid", Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_booking_id() {
        assert!(validate_booking_id("bk_123").is_ok());
        assert!(validate_booking_id("").is_err());
        assert!(validate_booking_id("   ").is_err());
    }
}
