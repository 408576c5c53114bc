//! # Refund Policy Evaluator
//!
//! Classifies a cancellation against the booking's policy and the number of
//! days left before check-in.
//!
//! ## Tier Table (first match wins)
//! ```text
//! ┌────────────────┬──────────────────┬──────────────────┬─────────────────┐
//! │ Policy         │ Tier 1           │ Tier 2           │ Otherwise       │
//! ├────────────────┼──────────────────┼──────────────────┼─────────────────┤
//! │ flexible       │ days ≥ 1  → 100% │                  │ 0%              │
//! │ moderate       │ days ≥ 5  → 100% │ days ≥ 1 → 50%   │ 0%              │
//! │ strict         │ days ≥ 14 → 100% │ days ≥ 7 → 50%   │ 0%              │
//! │ non_refundable │                  │                  │ always 0%       │
//! └────────────────┴──────────────────┴──────────────────┴─────────────────┘
//! ```
//!
//! An unrecognised policy name is not an error: it resolves to a zero refund
//! with reason `"Unknown policy"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::calendar::{Clock, DayCount};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::CancellationPolicy;
use crate::validation::validate_minor_amount;

/// Reason attached when the policy name can't be recognised.
pub const UNKNOWN_POLICY_REASON: &str = "Unknown policy";

// =============================================================================
// Refund Calculation
// =============================================================================

/// Outcome of a cancellation.
///
/// `refund_amount + penalty_amount` always equals the amount paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RefundCalculation {
    pub refund_amount: Money,
    /// One of 0, 50 or 100.
    pub refund_percentage: u8,
    pub penalty_amount: Money,
    pub is_eligible: bool,
    pub reason: String,
    /// The day count the tier was chosen on.
    pub days_until_check_in: i64,
}

/// A matched row of the tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundTier {
    pub percentage: u8,
    pub reason: &'static str,
}

impl CancellationPolicy {
    /// Looks up the refund tier for a cancellation `days` before check-in.
    pub fn refund_tier(&self, days: i64) -> RefundTier {
        let (percentage, reason) = match self {
            CancellationPolicy::Flexible if days >= 1 => {
                (100, "Full refund: cancelled at least 1 day before check-in")
            }
            CancellationPolicy::Flexible => {
                (0, "No refund: cancelled less than 1 day before check-in")
            }
            CancellationPolicy::Moderate if days >= 5 => {
                (100, "Full refund: cancelled at least 5 days before check-in")
            }
            CancellationPolicy::Moderate if days >= 1 => {
                (50, "50% refund: cancelled 1 to 4 days before check-in")
            }
            CancellationPolicy::Moderate => {
                (0, "No refund: cancelled less than 1 day before check-in")
            }
            CancellationPolicy::Strict if days >= 14 => {
                (100, "Full refund: cancelled at least 14 days before check-in")
            }
            CancellationPolicy::Strict if days >= 7 => {
                (50, "50% refund: cancelled 7 to 13 days before check-in")
            }
            CancellationPolicy::Strict => {
                (0, "No refund: cancelled less than 7 days before check-in")
            }
            CancellationPolicy::NonRefundable => (0, "No refund: booking is non-refundable"),
        };
        RefundTier { percentage, reason }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates cancellations with a fixed day-count convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefundPolicyEvaluator {
    day_count: DayCount,
}

impl RefundPolicyEvaluator {
    pub fn new(day_count: DayCount) -> Self {
        RefundPolicyEvaluator { day_count }
    }

    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Computes the refund for a cancellation made at `cancelled_at`.
    ///
    /// ## Errors
    /// Negative `total_paid`.
    pub fn evaluate(
        &self,
        total_paid: Money,
        check_in: DateTime<Utc>,
        policy: CancellationPolicy,
        cancelled_at: DateTime<Utc>,
    ) -> CoreResult<RefundCalculation> {
        validate_minor_amount("total_paid", total_paid)?;

        let days = self.day_count.days_between(cancelled_at, check_in);
        let tier = policy.refund_tier(days);
        let refund = settle(total_paid, tier.percentage, tier.reason, days);

        debug!(
            policy = %policy,
            days_until_check_in = days,
            refund_percentage = refund.refund_percentage,
            refund_amount = %refund.refund_amount,
            "Evaluated refund"
        );

        Ok(refund)
    }

    /// Like [`evaluate`](Self::evaluate) but takes the policy name as stored
    /// by the listing. Unknown names give a zero refund instead of an error.
    pub fn evaluate_named(
        &self,
        total_paid: Money,
        check_in: DateTime<Utc>,
        policy: &str,
        cancelled_at: DateTime<Utc>,
    ) -> CoreResult<RefundCalculation> {
        match policy.parse::<CancellationPolicy>() {
            Ok(policy) => self.evaluate(total_paid, check_in, policy, cancelled_at),
            Err(_) => {
                validate_minor_amount("total_paid", total_paid)?;
                warn!(policy = %policy, "Unknown cancellation policy, refusing refund");
                let days = self.day_count.days_between(cancelled_at, check_in);
                Ok(settle(total_paid, 0, UNKNOWN_POLICY_REASON, days))
            }
        }
    }

    /// Evaluates a cancellation happening now, as reported by `clock`.
    pub fn evaluate_now(
        &self,
        total_paid: Money,
        check_in: DateTime<Utc>,
        policy: CancellationPolicy,
        clock: &dyn Clock,
    ) -> CoreResult<RefundCalculation> {
        self.evaluate(total_paid, check_in, policy, clock.now())
    }
}

fn settle(total_paid: Money, percentage: u8, reason: &str, days: i64) -> RefundCalculation {
    let refund_amount = total_paid.percent(percentage);
    let penalty_amount = total_paid - refund_amount;
    RefundCalculation {
        refund_amount,
        refund_percentage: percentage,
        penalty_amount,
        is_eligible: refund_amount.is_positive(),
        reason: reason.to_string(),
        days_until_check_in: days,
    }
}

/// Computes a refund with the default (UTC calendar day) convention.
pub fn calculate_refund_amount(
    total_paid: Money,
    check_in: DateTime<Utc>,
    policy: CancellationPolicy,
    cancelled_at: DateTime<Utc>,
) -> CoreResult<RefundCalculation> {
    RefundPolicyEvaluator::default().evaluate(total_paid, check_in, policy, cancelled_at)
}

// =============================================================================
// Unit Tests
// =============================================================================
