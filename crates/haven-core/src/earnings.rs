//! # Host Earnings Aggregator
//!
//! Rolls many [`PayoutSchedule`]s up into the host dashboard summary.
//!
//! ## Partitioning
//! ```text
//! schedules ──┬── status = released               ──► released_payouts
//!             ├── status ∈ {held, pending_release} ──► pending_payouts
//!             └── status = cancelled              ──► cancelled_bookings (count)
//!
//! total_earnings       = Σ amount over every schedule
//! average_booking_value = total_earnings / count   (0 when empty)
//! ```
//!
//! ## Fee Fields
//! [`aggregate_host_earnings`] estimates `platform_commission` and
//! `processing_fees` by applying one flat fee schedule to the aggregate
//! total. That diverges from the real figures whenever bookings were priced
//! under different schedules. Callers that still hold each booking's
//! [`PriceBreakdown`] should use [`aggregate_with_breakdowns`], which sums the
//! per-booking fees instead.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::breakdown::PriceBreakdown;
use crate::commission::{self, CommissionStructure};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::payout::PayoutSchedule;
use crate::types::PayoutStatus;

/// Earnings summary across a host's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HostEarnings {
    pub total_earnings: Money,
    pub pending_payouts: Money,
    pub released_payouts: Money,
    pub total_bookings: usize,
    pub cancelled_bookings: usize,
    pub average_booking_value: Money,
    pub platform_commission: Money,
    pub processing_fees: Money,
}

/// Amount totals shared by both aggregation flavours.
struct Totals {
    total: Money,
    pending: Money,
    released: Money,
    count: usize,
    cancelled: usize,
}

fn totals<'a>(schedules: impl Iterator<Item = &'a PayoutSchedule>) -> CoreResult<Totals> {
    let mut t = Totals {
        total: Money::zero(),
        pending: Money::zero(),
        released: Money::zero(),
        count: 0,
        cancelled: 0,
    };
    for s in schedules {
        t.total = add(t.total, s.amount, "total_earnings")?;
        t.count += 1;
        if s.status.is_pending() {
            t.pending = add(t.pending, s.amount, "pending_payouts")?;
        } else if s.status == PayoutStatus::Released {
            t.released = add(t.released, s.amount, "released_payouts")?;
        } else {
            t.cancelled += 1;
        }
    }
    Ok(t)
}

fn add(acc: Money, amount: Money, field: &str) -> Result<Money, ValidationError> {
    acc.checked_add(amount).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
    }
}

/// Summarizes schedules, estimating fees from `structure` applied to the
/// aggregate total.
///
/// With no schedules both fee fields are zero, not the lone fixed processing
/// fee the flat formula would give for a zero total.
///
/// Fails with `OutOfRange` when the amounts do not sum within `i64` minor
/// units.
///
/// ```rust
/// use haven_core::commission::CommissionStructure;
/// use haven_core::earnings::aggregate_host_earnings;
///
/// let empty = aggregate_host_earnings(&[], &CommissionStructure::default()).unwrap();
/// assert!(empty.total_earnings.is_zero());
/// assert!(empty.average_booking_value.is_zero());
/// assert!(empty.processing_fees.is_zero());
/// ```
pub fn aggregate_host_earnings(
    schedules: &[PayoutSchedule],
    structure: &CommissionStructure,
) -> CoreResult<HostEarnings> {
    let t = totals(schedules.iter())?;
    let (platform_commission, processing_fees) = if t.count == 0 {
        (Money::zero(), Money::zero())
    } else {
        (
            commission::commission(t.total, structure.platform_commission_rate()),
            commission::processing_fee(t.total, structure),
        )
    };

    let earnings = HostEarnings {
        total_earnings: t.total,
        pending_payouts: t.pending,
        released_payouts: t.released,
        total_bookings: t.count,
        cancelled_bookings: t.cancelled,
        average_booking_value: t.total.average_over(t.count),
        platform_commission,
        processing_fees,
    };

    debug!(
        bookings = earnings.total_bookings,
        total = %earnings.total_earnings,
        released = %earnings.released_payouts,
        pending = %earnings.pending_payouts,
        "Aggregated host earnings (flat-rate fee estimate)"
    );

    Ok(earnings)
}

/// Summarizes schedules, summing the fees each booking was actually priced
/// with.
pub fn aggregate_with_breakdowns(
    entries: &[(PayoutSchedule, PriceBreakdown)],
) -> CoreResult<HostEarnings> {
    let t = totals(entries.iter().map(|(s, _)| s))?;
    let platform_commission = Money::checked_sum(entries.iter().map(|(_, b)| b.platform_commission))
        .ok_or_else(|| out_of_range("platform_commission"))?;
    let processing_fees = Money::checked_sum(entries.iter().map(|(_, b)| b.processing_fee))
        .ok_or_else(|| out_of_range("processing_fees"))?;

    let earnings = HostEarnings {
        total_earnings: t.total,
        pending_payouts: t.pending,
        released_payouts: t.released,
        total_bookings: t.count,
        cancelled_bookings: t.cancelled,
        average_booking_value: t.total.average_over(t.count),
        platform_commission,
        processing_fees,
    };

    debug!(
        bookings = earnings.total_bookings,
        total = %earnings.total_earnings,
        platform_commission = %earnings.platform_commission,
        "Aggregated host earnings from booking breakdowns"
    );

    Ok(earnings)
}
