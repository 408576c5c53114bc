//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    135000 × 0.029 = 3914.9999999999995  → rounds to 3915? or 3914?     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units + Basis Points                       │
//! │    135000 × 290 bps = 39_150_000 / 10_000 = 3915 exactly              │
//! │    Every rounding step is explicit and happens in a known order        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Every rounding in this crate is **half away from zero** (6952.5 → 6953,
//! -2.5 → -3) and is applied at each individual step, never deferred.
//!
//! ## Usage
//! ```rust
//! use haven_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! // Nightly rates arrive as major units (AED 450.00)
//! let nightly = Money::from_major(Decimal::new(450, 0)).unwrap();
//! assert_eq!(nightly.minor(), 45000);
//!
//! // Arithmetic stays in fils
//! let total = nightly * 3;
//! assert_eq!(total.minor(), 135000);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;
use crate::{BPS_SCALE, DEFAULT_CURRENCY, MINOR_UNITS_PER_MAJOR};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (fils for AED).
///
/// ## Design Decisions
/// - **i64 (signed)**: penalties and refunds are computed by subtraction
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money Flows
/// ```text
/// nightly rate ──► base_price ──► subtotal ──┬──► service fee ──► VAT ──► guest_total
///                                            │
///                                            └──► commission, processing ──► host_earnings
///                                                                             │
///                                 PayoutSchedule.amount ◄─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (fils/cents).
    ///
    /// ```rust
    /// use haven_core::money::Money;
    ///
    /// let fee = Money::from_minor(4050); // AED 40.50
    /// assert_eq!(fee.minor(), 4050);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Converts a major-unit decimal (e.g. `450.00` AED) into minor units.
    ///
    /// Sub-fil precision is rounded half away from zero, so `10.005` becomes
    /// 1001 fils. Returns `None` when the value does not fit in an `i64`.
    pub fn from_major(major: Decimal) -> Option<Self> {
        major
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_UNITS_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_UNITS_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a rate and rounds half away from zero.
    ///
    /// ## Implementation
    /// `round(amount × bps / 10000)` in `i128`, so no intermediate overflow.
    ///
    /// ```rust
    /// use haven_core::money::Money;
    /// use haven_core::types::Rate;
    ///
    /// // 139050 fils at 5% = 6952.5 → 6953
    /// let vat = Money::from_minor(139050).apply_rate(Rate::from_bps(500));
    /// assert_eq!(vat.minor(), 6953);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money(clamp_i64(round_half_away(scaled, BPS_SCALE as i128)))
    }

    /// Takes a whole-number percentage of this amount (refund tiers).
    pub fn percent(&self, pct: u8) -> Money {
        Money(clamp_i64(round_half_away(self.0 as i128 * pct as i128, 100)))
    }

    /// Divides evenly across `count` parts, rounding half away from zero.
    ///
    /// Returns zero when `count` is zero.
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(clamp_i64(round_half_away(self.0 as i128, count as i128)))
    }

    /// Checked multiplication by a count (nights).
    #[inline]
    pub fn checked_mul(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Checked addition.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Saturating addition, for fee sums that cannot meaningfully overflow.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Adds up every amount, or `None` on the first overflow.
    ///
    /// ```rust
    /// use haven_core::money::Money;
    ///
    /// let fees = [Money::from_minor(4015), Money::from_minor(4015)];
    /// assert_eq!(Money::checked_sum(fees), Some(Money::from_minor(8030)));
    /// assert_eq!(Money::checked_sum([Money::from_minor(i64::MAX), Money::from_minor(1)]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }
}

/// Integer division rounding half away from zero. `denom` must be positive.
pub(crate) fn round_half_away(numer: i128, denom: i128) -> i128 {
    debug_assert!(denom > 0);
    if numer >= 0 {
        (2 * numer + denom) / (2 * denom)
    } else {
        -((2 * -numer + denom) / (2 * denom))
    }
}

fn clamp_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Currency Code
// =============================================================================

/// ISO-4217 style three-letter currency code, upper-case ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode(DEFAULT_CURRENCY.to_string())
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidFormat {
                field: "currency".to_string(),
                reason: format!("expected three upper-case letters, got '{}'", s),
            });
        }
        Ok(CurrencyCode(code.to_string()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Formats an amount for receipts and dashboards: `AED 1,460.03`.
///
/// Minor units are divided by 100, the major part is grouped in thousands
/// and the currency code is prefixed. Negative amounts render as `-AED 5.50`.
///
/// ```rust
/// use haven_core::money::{format_currency, CurrencyCode, Money};
///
/// let aed: CurrencyCode = "AED".parse().unwrap();
/// assert_eq!(format_currency(Money::from_minor(146003), &aed), "AED 1,460.03");
/// ```
pub fn format_currency(amount: Money, currency: &CurrencyCode) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let major = (amount.minor() as i128 / MINOR_UNITS_PER_MAJOR as i128).unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        currency,
        group_thousands(major),
        amount.minor_part()
    )
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain major-unit rendering (`1460.03`), for logs and debugging.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}


// =============================================================================
// Unit Tests
// =============================================================================
