//! # aqua-pricing — Pure Pricing Engine
//!
//! Computes delivery prices and offer validity from the platform
//! settings snapshot. Every function here is pure: same inputs, same
//! outputs, no side effects, no failure modes. Missing settings fall
//! back to the defaults documented in `aqua_core::settings`, so pricing
//! never fails closed.
//!
//! Money is integer currency units throughout. The urgency surcharge
//! uses integer arithmetic with half-up rounding — no floats, so the
//! result is deterministic across platforms.

use chrono::{DateTime, Duration, Utc};

use aqua_core::{AmountTier, PlatformSettings};

/// Smallest permitted offer validity, minutes. Configured values below
/// this are clamped up so an offer can never be born expired.
pub const MIN_VALIDITY_MINUTES: i64 = 5;

/// Delivery price for a volume tier, with the urgency surcharge applied
/// when `urgent` is set.
///
/// The surcharge multiplies the base price by
/// `(1 + surcharge_percent / 100)` and rounds to the nearest integer
/// currency unit (half-up).
pub fn compute_price(tier: AmountTier, urgent: bool, settings: &PlatformSettings) -> u64 {
    let base = settings.base_price(tier);
    if !urgent {
        return base;
    }
    let pct = u64::from(settings.urgency_surcharge_percent);
    (base * (100 + pct) + 50) / 100
}

/// Offer validity duration in minutes, clamped to a positive minimum.
pub fn compute_validity(settings: &PlatformSettings) -> i64 {
    settings.offer_validity_minutes.max(MIN_VALIDITY_MINUTES)
}

/// Expiry instant for an offer created at `now` with the given validity.
pub fn compute_expiry(now: DateTime<Utc>, validity_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(validity_minutes)
}
