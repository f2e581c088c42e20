//! # Platform Settings Snapshot
//!
//! The single typed configuration object consumed by pricing and offer
//! creation. Fetched once per operation as a point-in-time snapshot:
//! the price and validity applied to an offer must reflect settings at
//! offer-creation time, never settings at acceptance time.
//!
//! Missing or unset values fall back to the documented defaults below,
//! so pricing never fails closed.

use serde::{Deserialize, Serialize};

use crate::request::AmountTier;

/// Default base prices per tier, in integer currency units.
pub const DEFAULT_PRICE_100: u64 = 5_000;
pub const DEFAULT_PRICE_1000: u64 = 20_000;
pub const DEFAULT_PRICE_5000: u64 = 75_000;
pub const DEFAULT_PRICE_10000: u64 = 140_000;

/// Default urgency surcharge, percent.
pub const DEFAULT_URGENCY_SURCHARGE_PERCENT: u32 = 10;

/// Default offer validity, minutes.
pub const DEFAULT_OFFER_VALIDITY_MINUTES: i64 = 60;

/// Default maximum offer message length, characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 500;

/// Read-only, point-in-time platform configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Base price for the 100 L tier.
    pub price_100: u64,
    /// Base price for the 1 000 L tier.
    pub price_1000: u64,
    /// Base price for the 5 000 L tier.
    pub price_5000: u64,
    /// Base price for the 10 000 L tier.
    pub price_10000: u64,
    /// Urgency surcharge, percent of the base price.
    pub urgency_surcharge_percent: u32,
    /// Configured offer validity in minutes; consumers of this value
    /// must clamp it to a positive minimum.
    pub offer_validity_minutes: i64,
    /// Maximum length of an offer message, in characters.
    pub max_message_length: usize,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            price_100: DEFAULT_PRICE_100,
            price_1000: DEFAULT_PRICE_1000,
            price_5000: DEFAULT_PRICE_5000,
            price_10000: DEFAULT_PRICE_10000,
            urgency_surcharge_percent: DEFAULT_URGENCY_SURCHARGE_PERCENT,
            offer_validity_minutes: DEFAULT_OFFER_VALIDITY_MINUTES,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl PlatformSettings {
    /// Base price for the given volume tier.
    pub fn base_price(&self, tier: AmountTier) -> u64 {
        match tier {
            AmountTier::L100 => self.price_100,
            AmountTier::L1000 => self.price_1000,
            AmountTier::L5000 => self.price_5000,
            AmountTier::L10000 => self.price_10000,
        }
    }
}
