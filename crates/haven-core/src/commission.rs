//! # Commission Engine
//!
//! Single-purpose rounding functions for every fee the platform charges,
//! plus the [`CommissionStructure`] that parameterizes them.
//!
//! ## Who Pays What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   GUEST side (added on top)          HOST side (deducted)               │
//! │   ─────────────────────────          ────────────────────               │
//! │   service fee  3% of subtotal        commission 12% of subtotal         │
//! │   VAT          5% of pre-tax total   processing 2.9% of subtotal + 1.00 │
//! │                                                                         │
//! │   Each function rounds half away from zero on its own.                  │
//! │   Composing them in a different order changes cent-level results.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The default structure is an ordinary value. There is no global fee table:
//! every calculation receives the structure it should use, so promotional or
//! grandfathered schedules can coexist.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::money::Money;
use crate::types::Rate;
use crate::BPS_SCALE;

// =============================================================================
// Commission Structure
// =============================================================================

/// The fee schedule applied to a booking.
///
/// Immutable once built. Every ratio is validated to lie in [0, 100%) and the
/// fixed processing fee to be non-negative; an invalid schedule never reaches
/// a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommissionSettings", into = "CommissionSettings")]
pub struct CommissionStructure {
    platform_commission_rate: Rate,
    service_fee_rate: Rate,
    processing_fee_rate: Rate,
    processing_fee_fixed: Money,
    vat_rate: Rate,
}

impl CommissionStructure {
    /// Builds a validated fee schedule.
    pub fn new(
        platform_commission_rate: Rate,
        service_fee_rate: Rate,
        processing_fee_rate: Rate,
        processing_fee_fixed: Money,
        vat_rate: Rate,
    ) -> Result<Self, ConfigError> {
        check_rate("platform_commission_rate", platform_commission_rate)?;
        check_rate("service_fee_rate", service_fee_rate)?;
        check_rate("processing_fee_rate", processing_fee_rate)?;
        check_rate("vat_rate", vat_rate)?;
        if processing_fee_fixed.is_negative() {
            return Err(ConfigError::NegativeFixedFee(processing_fee_fixed.minor()));
        }

        Ok(CommissionStructure {
            platform_commission_rate,
            service_fee_rate,
            processing_fee_rate,
            processing_fee_fixed,
            vat_rate,
        })
    }

    #[inline]
    pub fn platform_commission_rate(&self) -> Rate {
        self.platform_commission_rate
    }

    #[inline]
    pub fn service_fee_rate(&self) -> Rate {
        self.service_fee_rate
    }

    #[inline]
    pub fn processing_fee_rate(&self) -> Rate {
        self.processing_fee_rate
    }

    #[inline]
    pub fn processing_fee_fixed(&self) -> Money {
        self.processing_fee_fixed
    }

    #[inline]
    pub fn vat_rate(&self) -> Rate {
        self.vat_rate
    }

    /// Returns a copy with a different commission rate, e.g. for a promotion.
    pub fn with_platform_commission_rate(self, rate: Rate) -> Result<Self, ConfigError> {
        CommissionStructure::new(
            rate,
            self.service_fee_rate,
            self.processing_fee_rate,
            self.processing_fee_fixed,
            self.vat_rate,
        )
    }
}

/// Platform defaults: 12% commission, 3% service fee, 2.9% + 1.00 processing,
/// 5% VAT.
impl Default for CommissionStructure {
    fn default() -> Self {
        CommissionStructure {
            platform_commission_rate: Rate::from_bps(1200),
            service_fee_rate: Rate::from_bps(300),
            processing_fee_rate: Rate::from_bps(290),
            processing_fee_fixed: Money::from_minor(100),
            vat_rate: Rate::from_bps(500),
        }
    }
}

fn check_rate(field: &str, rate: Rate) -> Result<(), ConfigError> {
    if rate.bps() >= BPS_SCALE {
        return Err(ConfigError::RateOutOfRange {
            field: field.to_string(),
            bps: rate.bps(),
        });
    }
    Ok(())
}

/// On-disk shape of a [`CommissionStructure`] (rates in basis points).
///
/// ```toml
/// [commission]
/// platform_commission_bps = 1200
/// service_fee_bps = 300
/// processing_fee_bps = 290
/// processing_fee_fixed = 100   # minor units
/// vat_bps = 500
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSettings {
    pub platform_commission_bps: u32,
    pub service_fee_bps: u32,
    pub processing_fee_bps: u32,
    pub processing_fee_fixed: i64,
    pub vat_bps: u32,
}

impl Default for CommissionSettings {
    fn default() -> Self {
        CommissionStructure::default().into()
    }
}

impl TryFrom<CommissionSettings> for CommissionStructure {
    type Error = ConfigError;

    fn try_from(s: CommissionSettings) -> Result<Self, Self::Error> {
        CommissionStructure::new(
            Rate::from_bps(s.platform_commission_bps),
            Rate::from_bps(s.service_fee_bps),
            Rate::from_bps(s.processing_fee_bps),
            Money::from_minor(s.processing_fee_fixed),
            Rate::from_bps(s.vat_bps),
        )
    }
}

impl From<CommissionStructure> for CommissionSettings {
    fn from(c: CommissionStructure) -> Self {
        CommissionSettings {
            platform_commission_bps: c.platform_commission_rate.bps(),
            service_fee_bps: c.service_fee_rate.bps(),
            processing_fee_bps: c.processing_fee_rate.bps(),
            processing_fee_fixed: c.processing_fee_fixed.minor(),
            vat_bps: c.vat_rate.bps(),
        }
    }
}

// =============================================================================
// Fee Functions
// =============================================================================

/// Platform commission: `round(amount × rate)`.
#[inline]
pub fn commission(amount: Money, rate: Rate) -> Money {
    amount.apply_rate(rate)
}

/// Value-added tax: `round(amount × rate)`.
#[inline]
pub fn vat(amount: Money, rate: Rate) -> Money {
    amount.apply_rate(rate)
}

/// Guest service fee: `round(amount × rate)`.
#[inline]
pub fn service_fee(amount: Money, rate: Rate) -> Money {
    amount.apply_rate(rate)
}

/// Payment processing fee: `round(amount × rate + fixed)`.
///
/// The fixed part is already whole fils, so rounding the percentage part
/// alone gives the same result as rounding the sum.
#[inline]
pub fn processing_fee(amount: Money, structure: &CommissionStructure) -> Money {
    amount
        .apply_rate(structure.processing_fee_rate)
        .saturating_add(structure.processing_fee_fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn from_percentages(pcts: [Decimal; 4], fixed: i64) -> Result<CommissionStructure, ConfigError> {
        CommissionStructure::new(
            Rate::try_from_percentage(pcts[0])?,
            Rate::try_from_percentage(pcts[1])?,
            Rate::try_from_percentage(pcts[2])?,
            Money::from_minor(fixed),
            Rate::try_from_percentage(pcts[3])?,
        )
    }

    #[test]
    fn test_structure_from_percentages() {
        let s = from_percentages(
            [Decimal::new(12, 0), Decimal::new(3, 0), Decimal::new(29, 1), Decimal::new(5, 0)],
            100,
        )
        .unwrap();
        assert_eq!(s, CommissionStructure::default());

        let err = from_percentages(
            [Decimal::new(-12, 0), Decimal::new(3, 0), Decimal::new(29, 1), Decimal::new(5, 0)],
            100,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPercentage { .. }));

        let err = from_percentages(
            [Decimal::new(12, 0), Decimal::new(3, 0), Decimal::new(2925, 3), Decimal::new(5, 0)],
            100,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPercentage { .. }));
    }

    #[test]
    fn test_default_structure() {
        let s = CommissionStructure::default();
        assert_eq!(s.platform_commission_rate().bps(), 1200);
        assert_eq!(s.service_fee_rate().bps(), 300);
        assert_eq!(s.processing_fee_rate().bps(), 290);
        assert_eq!(s.processing_fee_fixed().minor(), 100);
        assert_eq!(s.vat_rate().bps(), 500);
    }

    #[test]
    fn test_fee_functions_on_reference_subtotal() {
        let s = CommissionStructure::default();
        let subtotal = Money::from_minor(135000);
        assert_eq!(commission(subtotal, s.platform_commission_rate()).minor(), 16200);
        assert_eq!(service_fee(subtotal, s.service_fee_rate()).minor(), 4050);
        assert_eq!(processing_fee(subtotal, &s).minor(), 4015);
        assert_eq!(vat(Money::from_minor(139050), s.vat_rate()).minor(), 6953);
    }

    #[test]
    fn test_processing_fee_on_zero_is_fixed_fee() {
        let s = CommissionStructure::default();
        assert_eq!(processing_fee(Money::zero(), &s).minor(), 100);
    }

    #[test]
    fn test_rounding_is_per_call() {
        // 1 fil at 50% = 0.5 → 1; two separate calls round twice
        let half = Rate::from_bps(5000);
        let one = Money::from_minor(1);
        assert_eq!(commission(one, half).minor(), 1);
        assert_eq!((commission(one, half) + commission(one, half)).minor(), 2);
        assert_eq!(commission(Money::from_minor(2), half).minor(), 1);
    }

    #[test]
    fn test_invalid_structures_fail_at_construction() {
        let ok = Rate::from_bps(100);
        let err = CommissionStructure::new(Rate::from_bps(10000), ok, ok, Money::zero(), ok)
            .unwrap_err();
        assert!(matches!(err, ConfigError::RateOutOfRange { ref field, bps: 10000 } if field == "platform_commission_rate"));

        let err = CommissionStructure::new(ok, ok, ok, Money::zero(), Rate::from_bps(25000))
            .unwrap_err();
        assert!(matches!(err, ConfigError::RateOutOfRange { ref field, .. } if field == "vat_rate"));

        let err = CommissionStructure::new(ok, ok, ok, Money::from_minor(-5), ok).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeFixedFee(-5)));

        assert!(CommissionStructure::new(Rate::from_bps(9999), ok, ok, Money::zero(), ok).is_ok());
    }

    #[test]
    fn test_with_platform_commission_rate_leaves_original_untouched() {
        let base = CommissionStructure::default();
        let promo = base.with_platform_commission_rate(Rate::from_bps(800)).unwrap();
        assert_eq!(promo.platform_commission_rate().bps(), 800);
        assert_eq!(base.platform_commission_rate().bps(), 1200);
        assert_eq!(promo.vat_rate(), base.vat_rate());
    }

    #[test]
    fn test_settings_conversion() {
        let settings = CommissionSettings::default();
        assert_eq!(settings.platform_commission_bps, 1200);
        assert_eq!(CommissionStructure::try_from(settings).unwrap(), CommissionStructure::default());

        let bad = CommissionSettings {
            service_fee_bps: 12000,
            ..CommissionSettings::default()
        };
        assert!(CommissionStructure::try_from(bad).is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_rate() {
        let json = r#"{"platform_commission_bps":1200,"service_fee_bps":300,"processing_fee_bps":290,"processing_fee_fixed":100,"vat_bps":10000}"#;
        assert!(serde_json::from_str::<CommissionStructure>(json).is_err());

        let json = r#"{"vat_bps":0}"#;
        let s: CommissionStructure = serde_json::from_str(json).unwrap();
        assert!(s.vat_rate().is_zero());
        assert_eq!(s.platform_commission_rate().bps(), 1200);
    }
}
