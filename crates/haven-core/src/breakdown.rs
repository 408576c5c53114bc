//! # Price Breakdown Calculator
//!
//! Turns a nightly rate, a stay length and an optional cleaning fee into the
//! complete, balanced money picture of a booking.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price_per_night (AED) ──► base_price (fils) ──► × nights = subtotal    │
//! │                                                                         │
//! │  ① service_fee   = round(subtotal × service_rate)                      │
//! │  ② before_vat    = subtotal + cleaning_fee + service_fee               │
//! │  ③ vat_amount    = round(before_vat × vat_rate)                        │
//! │  ④ guest_total   = before_vat + vat_amount                             │
//! │  ⑤ commission    = round(subtotal × commission_rate)                   │
//! │  ⑥ processing    = round(subtotal × processing_rate + fixed)           │
//! │  ⑦ host_earnings = subtotal + cleaning_fee - commission - processing   │
//! │                                                                         │
//! │  Commission and processing are charged on the room subtotal only:      │
//! │  the host keeps the whole cleaning fee.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::commission::{self, CommissionStructure};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_major_amount, validate_nights};

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every monetary component of one booking, in minor units.
///
/// ## Invariants
/// - `total_amount = subtotal + cleaning_fee`
/// - `guest_total = total_amount + service_fee + vat_amount`
/// - `host_earnings = total_amount - platform_commission - processing_fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    /// Nightly rate.
    pub base_price: Money,
    pub nights: i64,
    /// `base_price × nights`.
    pub subtotal: Money,
    pub cleaning_fee: Money,
    /// Guest-facing surcharge.
    pub service_fee: Money,
    pub vat_amount: Money,
    /// What the stay itself costs: subtotal plus cleaning.
    pub total_amount: Money,
    /// What the guest is charged.
    pub guest_total: Money,
    /// What the host is paid out.
    pub host_earnings: Money,
    pub platform_commission: Money,
    pub processing_fee: Money,
}

impl PriceBreakdown {
    /// Checks all three balance invariants.
    ///
    /// A breakdown whose sums overflow `i64` (only possible for one built by
    /// hand or deserialized) is reported as unbalanced.
    pub fn is_balanced(&self) -> bool {
        let total_amount = self.subtotal.checked_add(self.cleaning_fee);
        let guest_total = self
            .total_amount
            .checked_add(self.service_fee)
            .and_then(|m| m.checked_add(self.vat_amount));
        let host_earnings = self
            .total_amount
            .checked_sub(self.platform_commission)
            .and_then(|m| m.checked_sub(self.processing_fee));

        total_amount == Some(self.total_amount)
            && guest_total == Some(self.guest_total)
            && host_earnings == Some(self.host_earnings)
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes the breakdown for a stay.
///
/// ## Errors
/// - `nights <= 0`
/// - negative `price_per_night` or `cleaning_fee`
/// - amounts too large for 64-bit minor units
///
/// ## Example
/// ```rust
/// use haven_core::breakdown::calculate_price_breakdown;
/// use haven_core::commission::CommissionStructure;
/// use rust_decimal::Decimal;
///
/// let b = calculate_price_breakdown(
///     Decimal::new(450, 0),
///     3,
///     Decimal::ZERO,
///     &CommissionStructure::default(),
/// )
/// .unwrap();
/// assert_eq!(b.guest_total.minor(), 146003);
/// assert_eq!(b.host_earnings.minor(), 114785);
/// ```
pub fn calculate_price_breakdown(
    price_per_night: Decimal,
    nights: i64,
    cleaning_fee: Decimal,
    structure: &CommissionStructure,
) -> CoreResult<PriceBreakdown> {
    validate_nights(nights)?;
    validate_major_amount("price_per_night", price_per_night)?;
    validate_major_amount("cleaning_fee", cleaning_fee)?;

    let base_price = Money::from_major(price_per_night).ok_or_else(|| out_of_range("price_per_night"))?;
    let cleaning_fee = Money::from_major(cleaning_fee).ok_or_else(|| out_of_range("cleaning_fee"))?;

    let subtotal = base_price
        .checked_mul(nights)
        .ok_or_else(|| out_of_range("subtotal"))?;
    let total_amount = subtotal
        .checked_add(cleaning_fee)
        .ok_or_else(|| out_of_range("total_amount"))?;

    let service_fee = commission::service_fee(subtotal, structure.service_fee_rate());
    let amount_before_vat = total_amount
        .checked_add(service_fee)
        .ok_or_else(|| out_of_range("guest_total"))?;
    let vat_amount = commission::vat(amount_before_vat, structure.vat_rate());
    let guest_total = amount_before_vat
        .checked_add(vat_amount)
        .ok_or_else(|| out_of_range("guest_total"))?;

    let platform_commission =
        commission::commission(subtotal, structure.platform_commission_rate());
    let processing_fee = commission::processing_fee(subtotal, structure);
    let host_earnings = total_amount - platform_commission - processing_fee;

    let breakdown = PriceBreakdown {
        base_price,
        nights,
        subtotal,
        cleaning_fee,
        service_fee,
        vat_amount,
        total_amount,
        guest_total,
        host_earnings,
        platform_commission,
        processing_fee,
    };

    debug!(
        nights,
        subtotal = %breakdown.subtotal,
        guest_total = %breakdown.guest_total,
        host_earnings = %breakdown.host_earnings,
        "Calculated price breakdown"
    );

    Ok(breakdown)
}

/// Same as [`calculate_price_breakdown`] for callers holding `f64` major
/// units (JSON request bodies). NaN and infinities are rejected.
pub fn calculate_price_breakdown_f64(
    price_per_night: f64,
    nights: i64,
    cleaning_fee: f64,
    structure: &CommissionStructure,
) -> CoreResult<PriceBreakdown> {
    let price = to_decimal("price_per_night", price_per_night)?;
    let cleaning = to_decimal("cleaning_fee", cleaning_fee)?;
    calculate_price_breakdown(price, nights, cleaning, structure)
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, ValidationError> {
    use rust_decimal::prelude::FromPrimitive;

    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::Rate;
    use std::str::FromStr;

    fn default_breakdown(price: i64, nights: i64, cleaning: i64) -> PriceBreakdown {
        calculate_price_breakdown(
            Decimal::new(price, 0),
            nights,
            Decimal::new(cleaning, 0),
            &CommissionStructure::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_booking() {
        let b = default_breakdown(450, 3, 0);
        assert_eq!(b.base_price.minor(), 45000);
        assert_eq!(b.subtotal.minor(), 135000);
        assert_eq!(b.service_fee.minor(), 4050);
        assert_eq!(b.vat_amount.minor(), 6953);
        assert_eq!(b.guest_total.minor(), 146003);
        assert_eq!(b.platform_commission.minor(), 16200);
        assert_eq!(b.processing_fee.minor(), 4015);
        assert_eq!(b.host_earnings.minor(), 114785);
        assert_eq!(b.total_amount.minor(), 135000);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_cleaning_fee_goes_to_host_and_is_taxed() {
        let b = default_breakdown(450, 3, 150);
        assert_eq!(b.cleaning_fee.minor(), 15000);
        assert_eq!(b.total_amount.minor(), 150000);
        // service fee is on the subtotal only
        assert_eq!(b.service_fee.minor(), 4050);
        // VAT is on subtotal + cleaning + service fee: 154050 × 5% = 7702.5
        assert_eq!(b.vat_amount.minor(), 7703);
        assert_eq!(b.guest_total.minor(), 161753);
        // commission and processing unchanged by cleaning
        assert_eq!(b.platform_commission.minor(), 16200);
        assert_eq!(b.processing_fee.minor(), 4015);
        assert_eq!(b.host_earnings.minor(), 129785);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_fractional_major_units() {
        let b = calculate_price_breakdown(
            Decimal::from_str("99.99").unwrap(),
            2,
            Decimal::from_str("25.50").unwrap(),
            &CommissionStructure::default(),
        )
        .unwrap();
        assert_eq!(b.base_price.minor(), 9999);
        assert_eq!(b.subtotal.minor(), 19998);
        // 19998 × 3% = 599.94
        assert_eq!(b.service_fee.minor(), 600);
        // (19998 + 2550 + 600) × 5% = 1157.4
        assert_eq!(b.vat_amount.minor(), 1157);
        // 19998 × 12% = 2399.76
        assert_eq!(b.platform_commission.minor(), 2400);
        // 19998 × 2.9% = 579.942 → 580 + 100
        assert_eq!(b.processing_fee.minor(), 680);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_structure_is_injected_per_call() {
        let promo = CommissionStructure::default()
            .with_platform_commission_rate(Rate::from_bps(0))
            .unwrap();
        let b = calculate_price_breakdown(Decimal::new(450, 0), 3, Decimal::ZERO, &promo).unwrap();
        assert_eq!(b.platform_commission.minor(), 0);
        assert_eq!(b.host_earnings.minor(), 135000 - 4015);

        // the default is unaffected
        assert_eq!(default_breakdown(450, 3, 0).platform_commission.minor(), 16200);
    }

    #[test]
    fn test_zero_price_is_valid() {
        let b = default_breakdown(0, 1, 0);
        assert_eq!(b.guest_total.minor(), 0);
        // the fixed processing fee still applies
        assert_eq!(b.processing_fee.minor(), 100);
        assert_eq!(b.host_earnings.minor(), -100);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let s = CommissionStructure::default();
        for nights in [0, -1, -30] {
            let err = calculate_price_breakdown(Decimal::new(450, 0), nights, Decimal::ZERO, &s)
                .unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }

        let err =
            calculate_price_breakdown(Decimal::new(-450, 0), 3, Decimal::ZERO, &s).unwrap_err();
        assert!(err.is_invalid_input());

        let err =
            calculate_price_breakdown(Decimal::new(450, 0), 3, Decimal::new(-1, 0), &s).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let s = CommissionStructure::default();
        let huge = Decimal::from(i64::MAX / 100);
        let err = calculate_price_breakdown(huge, 1000, Decimal::ZERO, &s).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field }) if field == "subtotal"
        ));
    }

    #[test]
    fn test_f64_entry_point() {
        let s = CommissionStructure::default();
        let b = calculate_price_breakdown_f64(450.0, 3, 0.0, &s).unwrap();
        assert_eq!(b.guest_total.minor(), 146003);

        let err = calculate_price_breakdown_f64(f64::NAN, 3, 0.0, &s).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotFinite { .. })
        ));
        assert!(calculate_price_breakdown_f64(450.0, 3, f64::NEG_INFINITY, &s).is_err());

        let err = calculate_price_breakdown_f64(1e300, 1, 0.0, &s).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field }) if field == "price_per_night"
        ));
    }

    #[test]
    fn test_balance_invariants_hold_across_inputs() {
        let s = CommissionStructure::default();
        for price_cents in [0_i64, 1, 99, 4999, 12345, 45000, 99999, 1_000_001] {
            for nights in [1_i64, 2, 3, 7, 14, 30] {
                for cleaning_cents in [0_i64, 1, 2550, 15000] {
                    let b = calculate_price_breakdown(
                        Decimal::new(price_cents, 2),
                        nights,
                        Decimal::new(cleaning_cents, 2),
                        &s,
                    )
                    .unwrap();
                    assert!(b.is_balanced(), "unbalanced: {:?}", b);
                    assert_eq!(b.subtotal.minor(), price_cents * nights);
                    assert!(!b.guest_total.is_negative());
                    assert!(!b.vat_amount.is_negative());
                }
            }
        }
    }

    #[test]
    fn test_overflowing_breakdown_is_unbalanced() {
        let b = default_breakdown(450, 3, 0);
        assert!(b.is_balanced());

        let tampered = PriceBreakdown {
            subtotal: Money::from_minor(i64::MAX),
            cleaning_fee: Money::from_minor(1),
            ..b
        };
        assert!(!tampered.is_balanced());

        let tampered = PriceBreakdown {
            total_amount: Money::from_minor(i64::MIN),
            ..b
        };
        assert!(!tampered.is_balanced());

        let json = serde_json::json!({
            "base_price": 0, "nights": 1, "subtotal": i64::MAX, "cleaning_fee": 0,
            "service_fee": i64::MAX, "vat_amount": 0, "total_amount": i64::MAX,
            "guest_total": -2, "host_earnings": i64::MAX, "platform_commission": 0,
            "processing_fee": 0
        });
        let decoded: PriceBreakdown = serde_json::from_value(json).unwrap();
        assert!(!decoded.is_balanced());
    }

    #[test]
    fn test_serializes_as_plain_integers() {
        let b = default_breakdown(450, 3, 0);
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["guest_total"], 146003);
        assert_eq!(json["nights"], 3);
        let back: PriceBreakdown = serde_json::from_value(json).unwrap();
        assert_eq!(back, b);
    }
}
