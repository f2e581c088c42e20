//! # Offer Record
//!
//! A provider's time-boxed proposal to fulfill a specific request.
//!
//! ## States
//!
//! ```text
//! Active ──▶ Accepted      (terminal, exactly one per request)
//!    │
//!    ├──▶ Cancelled        (terminal, provider withdrawal)
//!    ├──▶ Expired          (terminal, external sweep)
//!    └──▶ RequestFilled    (terminal, a sibling offer was accepted)
//! ```
//!
//! ## Invariants
//!
//! - At most one (request, provider) pair may hold a simultaneously
//!   *active* offer.
//! - For a given request, at most one offer ever reaches `Accepted`;
//!   the moment one does, every other active offer for that request
//!   moves to `RequestFilled` in the same logical operation.
//! - An offer whose `expires_at` has passed is logically inactive even
//!   while its persisted status still reads `Active` — acceptance must
//!   re-check wall-clock expiry at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{OfferId, ProviderId, RequestId};

/// The lifecycle status of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Eligible for acceptance (subject to wall-clock expiry).
    Active,
    /// Accepted by the consumer (terminal).
    Accepted,
    /// Validity window passed without acceptance (terminal).
    Expired,
    /// Withdrawn by the provider (terminal).
    Cancelled,
    /// A sibling offer was accepted first (terminal).
    RequestFilled,
}

impl OfferStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Accepted => "ACCEPTED",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
            Self::RequestFilled => "REQUEST_FILLED",
        };
        f.write_str(s)
    }
}

/// A provider's time-boxed delivery offer for a specific request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Unique offer identifier.
    pub id: OfferId,
    /// The request this offer targets.
    pub request_id: RequestId,
    /// The submitting provider.
    pub provider_id: ProviderId,
    /// Proposed delivery window start; strictly after creation time.
    pub window_start: DateTime<Utc>,
    /// Proposed delivery window end; strictly after the start.
    pub window_end: DateTime<Utc>,
    /// Optional bounded free-text message to the consumer.
    pub message: Option<String>,
    /// Quoted price, computed from the settings snapshot at creation.
    pub price: u64,
    /// Instant after which the offer is no longer acceptable.
    pub expires_at: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: OfferStatus,
    /// When the offer was created.
    pub created_at: DateTime<Utc>,
    /// When the offer was accepted, if it was.
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Offer {
    /// Whether the offer is acceptable at `now`: persisted status is
    /// `Active` *and* the validity window has not passed.
    pub fn is_acceptable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Active && self.expires_at > now
    }

    /// Human-readable delivery window, composed at acceptance and
    /// stored on the request for display.
    pub fn delivery_window_label(&self) -> String {
        format!(
            "{} - {}",
            self.window_start.format("%Y-%m-%d %H:%M"),
            self.window_end.format("%H:%M")
        )
    }
}
