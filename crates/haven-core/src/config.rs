//! # Engine Configuration
//!
//! One value bundling everything a deployment may tune: the fee schedule,
//! the payout policy, the refund day-count convention and the display
//! currency.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. TOML text or file handed in by the host application                │
//! │  2. Default values (lowest priority)                                   │
//! │                                                                         │
//! │  The engine reads no environment variables. Whoever embeds it decides  │
//! │  where the TOML comes from.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! currency = "AED"
//!
//! [commission]
//! platform_commission_bps = 1200
//! service_fee_bps = 300
//! processing_fee_bps = 290
//! processing_fee_fixed = 100
//! vat_bps = 500
//!
//! [payout]
//! release_hour = 15
//! utc_offset_seconds = 14400
//!
//! [refund]
//! day_count = "calendar_utc"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::calendar::DayCount;
use crate::commission::CommissionStructure;
use crate::error::ConfigError;
use crate::money::CurrencyCode;
use crate::payout::{PayoutPolicy, PayoutScheduler};
use crate::refund::RefundPolicyEvaluator;

/// Refund evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundSettings {
    pub day_count: DayCount,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub currency: CurrencyCode,
    pub commission: CommissionStructure,
    pub payout: PayoutPolicy,
    pub refund: RefundSettings,
}

impl EngineConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// Missing sections fall back to defaults. The fee schedule is validated
    /// while parsing; the payout policy right after.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading engine config from file");
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(
            currency = %config.currency,
            commission_bps = config.commission.platform_commission_rate().bps(),
            day_count = %config.refund.day_count,
            "Engine config loaded"
        );
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.payout.validate()
    }

    /// A refund evaluator using the configured day count.
    pub fn refund_evaluator(&self) -> RefundPolicyEvaluator {
        RefundPolicyEvaluator::new(self.refund.day_count)
    }

    /// A payout scheduler using the configured policy.
    pub fn payout_scheduler(&self) -> Result<PayoutScheduler, ConfigError> {
        PayoutScheduler::new(self.payout)
    }
}
