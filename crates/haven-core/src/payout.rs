//! # Payout Scheduler
//!
//! Decides when a host's money for a booking becomes releasable.
//!
//! ## State Machine (evaluated against an injected "now")
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   booking cancelled? ──yes──► CANCELLED   (terminal, ignores dates)     │
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │   now ≥ release_date? ─yes──► RELEASED                                  │
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │   days_until_release ≤ 1? ─yes──► PENDING_RELEASE                       │
//! │          │ no                                                           │
//! │          ▼                                                              │
//! │        HELD                                                             │
//! │                                                                         │
//! │   release_date = check-in date at 15:00 platform time (UTC+4)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status is a projection, not stored state: re-run [`PayoutScheduler::reevaluate`]
//! whenever "now" or the booking's lifecycle changes.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::calendar::calendar_days_between;
use crate::error::{ConfigError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BookingStatus, PayoutStatus};
use crate::validation::{validate_booking_id, validate_minor_amount};
use crate::{DEFAULT_PLATFORM_UTC_OFFSET_SECONDS, DEFAULT_RELEASE_HOUR};

const MAX_OFFSET_SECONDS: i32 = 24 * 60 * 60;

// =============================================================================
// Payout Policy
// =============================================================================

/// When funds are released relative to check-in.
///
/// ```toml
/// [payout]
/// release_hour = 15           # platform-local hour on the check-in date
/// utc_offset_seconds = 14400  # platform time, UTC+4 (fixed, no DST)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutPolicy {
    pub release_hour: u32,
    pub utc_offset_seconds: i32,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        PayoutPolicy {
            release_hour: DEFAULT_RELEASE_HOUR,
            utc_offset_seconds: DEFAULT_PLATFORM_UTC_OFFSET_SECONDS,
        }
    }
}

impl PayoutPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.release_hour > 23 {
            return Err(ConfigError::InvalidReleaseHour(self.release_hour));
        }
        self.offset()?;
        Ok(())
    }

    /// Platform time zone as a fixed offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.utc_offset_seconds.abs() >= MAX_OFFSET_SECONDS {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_seconds));
        }
        FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_seconds))
    }
}

// =============================================================================
// Payout Schedule
// =============================================================================

/// Release state of one booking's host payout at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayoutSchedule {
    pub booking_id: String,
    #[ts(as = "String")]
    pub check_in_date: DateTime<Utc>,
    pub amount: Money,
    #[ts(as = "String")]
    pub release_date: DateTime<Utc>,
    pub status: PayoutStatus,
    /// Platform-local calendar days until release; negative once past.
    pub days_until_release: i64,
}

impl PayoutSchedule {
    /// True when the funds may be transferred to the host.
    pub fn is_releasable(&self) -> bool {
        self.status == PayoutStatus::Released
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Builds [`PayoutSchedule`]s under one [`PayoutPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct PayoutScheduler {
    release_hour: u32,
    offset: FixedOffset,
}

impl Default for PayoutScheduler {
    fn default() -> Self {
        PayoutScheduler {
            release_hour: DEFAULT_RELEASE_HOUR,
            offset: FixedOffset::east_opt(DEFAULT_PLATFORM_UTC_OFFSET_SECONDS)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl PayoutScheduler {
    /// Creates a scheduler, validating the policy up front.
    pub fn new(policy: PayoutPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(PayoutScheduler {
            release_hour: policy.release_hour,
            offset: policy.offset()?,
        })
    }

    /// The instant funds for a stay starting at `check_in` are released.
    pub fn release_date(&self, check_in: DateTime<Utc>) -> CoreResult<DateTime<Utc>> {
        let local_date = check_in.with_timezone(&self.offset).date_naive();
        local_date
            .and_hms_opt(self.release_hour, 0, 0)
            .and_then(|local| local.and_local_timezone(self.offset).single())
            .map(|release| release.with_timezone(&Utc))
            .ok_or_else(|| {
                ValidationError::InvalidFormat {
                    field: "check_in_date".to_string(),
                    reason: format!("no release time exists for {}", check_in),
                }
                .into()
            })
    }

    /// Computes the payout schedule for a booking as of `now`.
    ///
    /// ## Errors
    /// Blank `booking_id`, negative `amount`, or a check-in date so close to
    /// the representable limits that the release time can't be built.
    pub fn schedule(
        &self,
        booking_id: &str,
        check_in: DateTime<Utc>,
        amount: Money,
        booking_status: BookingStatus,
        now: DateTime<Utc>,
    ) -> CoreResult<PayoutSchedule> {
        validate_booking_id(booking_id)?;
        validate_minor_amount("amount", amount)?;

        let release_date = self.release_date(check_in)?;
        let (status, days_until_release) = self.project(release_date, booking_status, now);

        debug!(
            booking_id = %booking_id,
            status = %status,
            days_until_release,
            "Calculated payout schedule"
        );

        Ok(PayoutSchedule {
            booking_id: booking_id.to_string(),
            check_in_date: check_in,
            amount,
            release_date,
            status,
            days_until_release,
        })
    }

    /// Re-derives an existing schedule for a new instant or booking status.
    pub fn reevaluate(
        &self,
        schedule: &PayoutSchedule,
        booking_status: BookingStatus,
        now: DateTime<Utc>,
    ) -> PayoutSchedule {
        let (status, days_until_release) = self.project(schedule.release_date, booking_status, now);
        PayoutSchedule {
            status,
            days_until_release,
            ..schedule.clone()
        }
    }

    fn project(
        &self,
        release_date: DateTime<Utc>,
        booking_status: BookingStatus,
        now: DateTime<Utc>,
    ) -> (PayoutStatus, i64) {
        let days = calendar_days_between(now, release_date, &self.offset);
        let status = if booking_status == BookingStatus::Cancelled {
            PayoutStatus::Cancelled
        } else if now >= release_date {
            PayoutStatus::Released
        } else if days <= 1 {
            PayoutStatus::PendingRelease
        } else {
            PayoutStatus::Held
        };
        (status, days)
    }
}

/// Computes a payout schedule under the default platform policy.
pub fn calculate_payout_schedule(
    booking_id: &str,
    check_in: DateTime<Utc>,
    amount: Money,
    booking_status: BookingStatus,
    now: DateTime<Utc>,
) -> CoreResult<PayoutSchedule> {
    PayoutScheduler::default().schedule(booking_id, check_in, amount, booking_status, now)
}

// =============================================================================
// Unit Tests
// =============================================================================
