//! # Domain Types
//!
//! Small value types shared by every component of the engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌────────────────────┐   ┌─────────────────┐    │
//! │  │      Rate       │   │ CancellationPolicy │   │  BookingStatus  │    │
//! │  │  ─────────────  │   │  ────────────────  │   │  ─────────────  │    │
//! │  │  bps (u32)      │   │  Flexible          │   │  Confirmed      │    │
//! │  │  500 = 5%       │   │  Moderate          │   │  Cancelled      │    │
//! │  └─────────────────┘   │  Strict            │   │  Completed      │    │
//! │                        │  NonRefundable     │   └─────────────────┘    │
//! │                        └────────────────────┘                          │
//! │                                                 ┌─────────────────┐    │
//! │                                                 │  PayoutStatus   │    │
//! │                                                 │  ─────────────  │    │
//! │                                                 │  Held           │    │
//! │                                                 │  PendingRelease │    │
//! │                                                 │  Released       │    │
//! │                                                 │  Cancelled      │    │
//! │                                                 └─────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{ConfigError, ValidationError};
use crate::BPS_SCALE;

// =============================================================================
// Rate
// =============================================================================

/// A ratio represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 290 bps = 2.9% (card processing), 1200 bps = 12% (platform commission)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage such as `2.9`.
    ///
    /// The percentage must lie in [0, 100) and resolve to whole basis points:
    /// `0.125` is rejected rather than rounded.
    ///
    /// ```rust
    /// use haven_core::Rate;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Rate::try_from_percentage(Decimal::new(29, 1)).unwrap().bps(), 290);
    /// assert!(Rate::try_from_percentage(Decimal::new(125, 3)).is_err());
    /// ```
    pub fn try_from_percentage(pct: Decimal) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPercentage {
            value: pct.to_string(),
            reason: reason.to_string(),
        };

        if pct.is_sign_negative() && !pct.is_zero() {
            return Err(invalid("must not be negative"));
        }
        let bps = pct
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| invalid("out of range"))?;
        if !bps.fract().is_zero() {
            return Err(invalid("finer than one basis point"));
        }
        match bps.to_u32() {
            Some(bps) if bps < BPS_SCALE => Ok(Rate(bps)),
            _ => Err(invalid("must be below 100%")),
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Cancellation Policy
// =============================================================================

/// The cancellation rule set a listing was booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Full refund up to one day before check-in.
    Flexible,
    /// Full refund 5+ days out, half refund 1-4 days out.
    Moderate,
    /// Full refund 14+ days out, half refund 7-13 days out.
    Strict,
    /// Never refunded.
    NonRefundable,
}

impl CancellationPolicy {
    pub const ALL: [CancellationPolicy; 4] = [
        CancellationPolicy::Flexible,
        CancellationPolicy::Moderate,
        CancellationPolicy::Strict,
        CancellationPolicy::NonRefundable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CancellationPolicy::Flexible => "flexible",
            CancellationPolicy::Moderate => "moderate",
            CancellationPolicy::Strict => "strict",
            CancellationPolicy::NonRefundable => "non_refundable",
        }
    }
}

impl fmt::Display for CancellationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancellationPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flexible" => Ok(CancellationPolicy::Flexible),
            "moderate" => Ok(CancellationPolicy::Moderate),
            "strict" => Ok(CancellationPolicy::Strict),
            "non_refundable" | "non-refundable" | "nonrefundable" => {
                Ok(CancellationPolicy::NonRefundable)
            }
            other => Err(ValidationError::InvalidFormat {
                field: "cancellation_policy".to_string(),
                reason: format!(
                    "unknown policy '{}'. Valid options: flexible, moderate, strict, non_refundable",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle state of the booking a payout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(ValidationError::InvalidFormat {
                field: "booking_status".to_string(),
                reason: format!("unknown booking status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Payout Status
// =============================================================================

/// Where a host's funds for one booking currently stand.
///
/// Always derived from (now, check-in, booking status); never stored and
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// More than a day before release.
    Held,
    /// Release is today or tomorrow.
    PendingRelease,
    /// Release time has passed.
    Released,
    /// Booking was cancelled; overrides every time-based state.
    Cancelled,
}

impl PayoutStatus {
    /// Funds that will still be paid out.
    pub fn is_pending(&self) -> bool {
        matches!(self, PayoutStatus::Held | PayoutStatus::PendingRelease)
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutStatus::Held => write!(f, "held"),
            PayoutStatus::PendingRelease => write!(f, "pending_release"),
            PayoutStatus::Released => write!(f, "released"),
            PayoutStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(290);
        assert_eq!(rate.bps(), 290);
        assert!((rate.percentage() - 2.9).abs() < 0.001);
    }

    #[test]
    fn test_rate_from_percentage() {
        assert_eq!(Rate::try_from_percentage(Decimal::new(12, 0)).unwrap().bps(), 1200);
        assert_eq!(Rate::try_from_percentage(Decimal::new(29, 1)).unwrap().bps(), 290);
        assert_eq!(Rate::try_from_percentage(Decimal::new(9999, 2)).unwrap().bps(), 9999);
        assert!(Rate::try_from_percentage(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn test_rate_from_percentage_rejects_bad_input() {
        let rejected = [
            Decimal::new(-5, 0),
            Decimal::new(-1, 2),
            Decimal::new(125, 3),
            Decimal::new(100, 0),
            Decimal::new(250, 0),
            Decimal::MAX,
        ];
        for pct in rejected {
            assert!(
                matches!(
                    Rate::try_from_percentage(pct),
                    Err(ConfigError::InvalidPercentage { .. })
                ),
                "accepted {pct}"
            );
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("flexible".parse::<CancellationPolicy>().unwrap(), CancellationPolicy::Flexible);
        assert_eq!(" Moderate ".parse::<CancellationPolicy>().unwrap(), CancellationPolicy::Moderate);
        assert_eq!("strict".parse::<CancellationPolicy>().unwrap(), CancellationPolicy::Strict);
        assert_eq!(
            "non-refundable".parse::<CancellationPolicy>().unwrap(),
            CancellationPolicy::NonRefundable
        );
        assert!("super_flexible".parse::<CancellationPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in CancellationPolicy::ALL {
            assert_eq!(policy.to_string().parse::<CancellationPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PayoutStatus::PendingRelease).unwrap(),
            "\"pending_release\""
        );
        assert_eq!(
            serde_json::to_string(&CancellationPolicy::NonRefundable).unwrap(),
            "\"non_refundable\""
        );
        let status: BookingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_payout_status_pending() {
        assert!(PayoutStatus::Held.is_pending());
        assert!(PayoutStatus::PendingRelease.is_pending());
        assert!(!PayoutStatus::Released.is_pending());
        assert!(!PayoutStatus::Cancelled.is_pending());
    }
}
