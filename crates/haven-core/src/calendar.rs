//! # Calendar Module
//!
//! Day counting and time injection.
//!
//! The engine never reads the system clock inside a calculation. Callers pass
//! an explicit `DateTime<Utc>` or a [`Clock`], so one evaluation always sees
//! one consistent "now".
//!
//! ## Day Count Modes
//! ```text
//! cancelled_at = Mar 10 23:00 UTC      check_in = Mar 15 01:00 UTC
//!
//!   CalendarUtc  : date(Mar 15) - date(Mar 10)          = 5 days
//!   ElapsedCeil  : ceil(4 days 2 hours)                 = 5 days
//!
//! cancelled_at = Mar 10 01:00 UTC      check_in = Mar 15 00:00 UTC
//!
//!   CalendarUtc  : date(Mar 15) - date(Mar 10)          = 5 days
//!   ElapsedCeil  : ceil(4 days 23 hours)                = 5 days
//!
//! cancelled_at = Mar 10 22:00 UTC      check_in = Mar 11 02:00 UTC
//!
//!   CalendarUtc  : 1 day            ElapsedCeil : ceil(4 hours) = 1 day
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Clock
// =============================================================================

/// Source of "now" for callers that don't already hold a timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and replaying past evaluations.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// Day Count
// =============================================================================

/// How "days until check-in" is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCount {
    /// Whole UTC calendar days between the two dates. Time of day is ignored.
    #[default]
    CalendarUtc,
    /// Ceiling of the exact elapsed duration in 24-hour days.
    ElapsedCeil,
}

impl DayCount {
    /// Days from `from` until `to`. Negative when `to` is in the past.
    pub fn days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        match self {
            DayCount::CalendarUtc => calendar_days_between(from, to, &Utc),
            DayCount::ElapsedCeil => elapsed_days_ceil(from, to),
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCount::CalendarUtc => write!(f, "calendar_utc"),
            DayCount::ElapsedCeil => write!(f, "elapsed_ceil"),
        }
    }
}

impl FromStr for DayCount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calendar_utc" | "calendar" => Ok(DayCount::CalendarUtc),
            "elapsed_ceil" | "elapsed" => Ok(DayCount::ElapsedCeil),
            other => Err(ConfigError::Invalid(format!(
                "Unknown day count: '{}'. Valid options: calendar_utc, elapsed_ceil",
                other
            ))),
        }
    }
}

/// Calendar days between two instants as seen in `tz`.
pub fn calendar_days_between<Tz: TimeZone>(from: DateTime<Utc>, to: DateTime<Utc>, tz: &Tz) -> i64 {
    let from_date = from.with_timezone(tz).date_naive();
    let to_date = to.with_timezone(tz).date_naive();
    (to_date - from_date).num_days()
}

/// `ceil((to - from) / 24h)`, computed on whole milliseconds.
pub fn elapsed_days_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    -((-millis).div_euclid(MILLIS_PER_DAY))
}
