//! # haven-core: Booking Money Engine for Haven
//!
//! This crate computes the authoritative money picture of a property-rental
//! booking: what the guest pays, how that splits into fees and taxes, what
//! the host earns, what a cancellation refunds, and when host funds are
//! released. Every function is pure.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Haven Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Booking UI • Admin refund/payout screens • Invoice renderer   │   │
//! │  │   (supply nightly rate, dates, policy; display typed results)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data (serde / TS bindings)       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ haven-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐   ┌────────────┐   ┌────────────┐              │   │
//! │  │   │ commission │──►│ breakdown  │   │   refund   │              │   │
//! │  │   │ fee rounding│  │ guest/host │   │ tier table │              │   │
//! │  │   └────────────┘   └─────┬──────┘   └────────────┘              │   │
//! │  │                          │ amounts                              │   │
//! │  │                    ┌─────▼──────┐   ┌────────────┐              │   │
//! │  │                    │   payout   │──►│  earnings  │              │   │
//! │  │                    │ release FSM│   │ host totals│              │   │
//! │  │                    └────────────┘   └────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO SYSTEM CLOCK IN CALCULATIONS    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type, half-away-from-zero rounding, currency display
//! - [`types`] - Rate (bps), policies and statuses
//! - [`commission`] - Fee schedule and per-fee rounding functions
//! - [`breakdown`] - Guest total / host earnings for a stay
//! - [`refund`] - Cancellation refund tiers
//! - [`payout`] - Host fund release schedule
//! - [`earnings`] - Host earnings summary
//! - [`calendar`] - Clock injection and day counting
//! - [`config`] - TOML engine configuration
//! - [`validation`] - Eager input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; safe from any thread
//! 2. **Integer Money**: fils in `i64`, rates in basis points, no floats
//! 3. **Ordered Rounding**: each fee rounds on its own, in a fixed order
//! 4. **Injected Config and Time**: no global fee table, no hidden `now()`
//!
//! ## Example Usage
//!
//! ```rust
//! use haven_core::breakdown::calculate_price_breakdown;
//! use haven_core::commission::CommissionStructure;
//! use haven_core::money::{format_currency, CurrencyCode};
//! use rust_decimal::Decimal;
//!
//! let fees = CommissionStructure::default();
//! let quote = calculate_price_breakdown(Decimal::new(450, 0), 3, Decimal::ZERO, &fees).unwrap();
//!
//! assert_eq!(format_currency(quote.guest_total, &CurrencyCode::default()), "AED 1,460.03");
//! assert_eq!(quote.host_earnings.minor(), 114785);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod breakdown;
pub mod calendar;
pub mod commission;
pub mod config;
pub mod earnings;
pub mod error;
pub mod money;
pub mod payout;
pub mod refund;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use breakdown::{calculate_price_breakdown, calculate_price_breakdown_f64, PriceBreakdown};
pub use calendar::{Clock, DayCount, FixedClock, SystemClock};
pub use commission::CommissionStructure;
pub use config::EngineConfig;
pub use earnings::{aggregate_host_earnings, aggregate_with_breakdowns, HostEarnings};
pub use error::{ConfigError, CoreError, CoreResult, ValidationError};
pub use money::{format_currency, CurrencyCode, Money};
pub use payout::{calculate_payout_schedule, PayoutPolicy, PayoutSchedule, PayoutScheduler};
pub use refund::{calculate_refund_amount, RefundCalculation, RefundPolicyEvaluator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minor units per major unit (100 fils = 1 AED).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Basis points in a whole (10000 bps = 100%).
pub const BPS_SCALE: u32 = 10_000;

/// Display currency when none is configured.
pub const DEFAULT_CURRENCY: &str = "AED";

/// Platform-local hour at which host funds are released on check-in day.
pub const DEFAULT_RELEASE_HOUR: u32 = 15;

/// Platform time: UTC+4 (Gulf Standard Time, no daylight saving).
pub const DEFAULT_PLATFORM_UTC_OFFSET_SECONDS: i32 = 4 * 60 * 60;
