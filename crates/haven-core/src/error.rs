//! # Error Types
//!
//! Domain-specific error types for haven-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError            - what every public operation returns            │
//! │  ├── ValidationError  - bad caller input (amounts, nights, ids)        │
//! │  └── ConfigError      - bad fee schedule / payout policy / TOML        │
//! │                                                                         │
//! │  NOT an error: unknown cancellation policy text. That resolves to a    │
//! │  zero refund with reason "Unknown policy" (see refund module).         │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │                         ├──► CoreError ──► booking UI / admin screens  │
//! │        ConfigError ─────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and value in the message
//! 3. Errors are enum variants, never String
//! 4. Nothing here is retryable: every error is a caller or config bug

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the booking money engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected before any computation ran.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The fee schedule or payout policy is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// True when the caller supplied bad input (as opposed to bad config).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised eagerly so that a negative night count or a NaN price never turns
/// into a negative guest total further down the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: String },

    /// Floating point input was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value does not fit the supported monetary range.
    #[error("{field} is out of the supported range")]
    OutOfRange { field: String },

    /// Invalid format (e.g., currency code, date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Configuration errors.
///
/// Raised when a [`CommissionStructure`](crate::commission::CommissionStructure)
/// or [`PayoutPolicy`](crate::payout::PayoutPolicy) is built, never at
/// calculation time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A ratio is outside [0, 100%).
    #[error("{field} must be between 0 and 9999 bps, got {bps}")]
    RateOutOfRange { field: String, bps: u32 },

    /// Percentage that cannot be expressed as a rate.
    #[error("{value}% is not a valid rate: {reason}")]
    InvalidPercentage { value: String, reason: String },

    /// Fixed processing fee below zero.
    #[error("processing_fee_fixed must not be negative, got {0}")]
    NegativeFixedFee(i64),

    /// Release hour is not a valid hour of day.
    #[error("release_hour must be between 0 and 23, got {0}")]
    InvalidReleaseHour(u32),

    /// Platform UTC offset is not a valid offset.
    #[error("utc_offset_seconds must be within ±24h, got {0}")]
    InvalidUtcOffset(i32),

    /// Unknown enum value in config.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Config file could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
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
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "nights".to_string(),
            value: "0".to_string(),
        };
        assert_eq!(err.to_string(), "nights must be positive, got 0");

        let err = ValidationError::NotFinite {
            field: "price_per_night".to_string(),
        };
        assert_eq!(err.to_string(), "price_per_night must be a finite number");
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::RateOutOfRange {
            field: "vat_rate".to_string(),
            bps: 10000,
        };
        assert_eq!(
            err.to_string(),
            "vat_rate must be between 0 and 9999 bps, got 10000"
        );
        assert_eq!(
            ConfigError::InvalidReleaseHour(24).to_string(),
            "release_hour must be between 0 and 23, got 24"
        );
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "booking_id".to_string(),
        }
        .into();
        assert!(core_err.is_invalid_input());

        let core_err: CoreError = ConfigError::NegativeFixedFee(-1).into();
        assert!(!core_err.is_invalid_input());
        assert!(matches!(core_err, CoreError::Config(_)));
    }
}
