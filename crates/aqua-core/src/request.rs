//! # Water Request Record
//!
//! The consumer-side entity: a delivery ask for a fixed water volume
//! tier, optionally urgent, optionally guest-owned.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Accepted ──▶ Delivered (terminal)
//!    │            │
//!    │            └──▶ Cancelled (terminal)
//!    │
//!    ├──▶ Cancelled (terminal)
//!    └──▶ NoOffers (set by the external sweep only)
//! ```
//!
//! Exactly one provider may ever be assigned, and only while
//! transitioning Pending → Accepted. The `NoOffers` transition belongs
//! exclusively to the external time-based sweep; this core never infers
//! it. Requests become immutable once Delivered or Cancelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{ConsumerId, ProviderId, RequestId, ServiceAreaId};

// ─── Volume Tiers ────────────────────────────────────────────────────

/// The fixed set of requestable water volumes, in liters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTier {
    /// 100 L — bottled / small tank.
    L100,
    /// 1 000 L — household tank.
    L1000,
    /// 5 000 L — large cistern.
    L5000,
    /// 10 000 L — full tanker load.
    L10000,
}

impl AmountTier {
    /// The requested volume in liters.
    pub fn liters(&self) -> u32 {
        match self {
            Self::L100 => 100,
            Self::L1000 => 1_000,
            Self::L5000 => 5_000,
            Self::L10000 => 10_000,
        }
    }

    /// Resolve a tier from a liter count, if it matches a fixed tier.
    pub fn from_liters(liters: u32) -> Option<Self> {
        match liters {
            100 => Some(Self::L100),
            1_000 => Some(Self::L1000),
            5_000 => Some(Self::L5000),
            10_000 => Some(Self::L10000),
            _ => None,
        }
    }

    /// All tiers, smallest first.
    pub const ALL: [AmountTier; 4] = [Self::L100, Self::L1000, Self::L5000, Self::L10000];
}

impl std::fmt::Display for AmountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}L", self.liters())
    }
}

// ─── Payment Method ──────────────────────────────────────────────────

/// How the consumer intends to pay on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card terminal on delivery.
    Card,
}

// ─── Request Status ──────────────────────────────────────────────────

/// The lifecycle status of a water request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting offers; the only state offers may be created in.
    Pending,
    /// An offer was accepted and a provider assigned.
    Accepted,
    /// Delivery completed (terminal).
    Delivered,
    /// Cancelled by the consumer or an operator (terminal).
    Cancelled,
    /// All offers lapsed with none accepted; set by the external sweep.
    NoOffers,
}

impl RequestStatus {
    /// Whether this status is terminal (the request is immutable).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::NoOffers => "NO_OFFERS",
        };
        f.write_str(s)
    }
}

// ─── Caller Identity ─────────────────────────────────────────────────

/// Who is invoking a consumer-side operation.
///
/// Guest-owned requests skip the ownership check in this core and rely
/// on a capability token validated by an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdentity {
    /// An authenticated consumer account.
    Consumer(ConsumerId),
    /// A guest holding an externally validated tracking token.
    Guest,
}

// ─── Water Request ───────────────────────────────────────────────────

/// A consumer's delivery ask for a fixed water volume tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// Registered consumer, or `None` for guest requests.
    pub consumer: Option<ConsumerId>,
    /// Guest contact name (guest requests only).
    pub guest_name: Option<String>,
    /// Guest contact phone (guest requests only).
    pub guest_phone: Option<String>,
    /// Service area the delivery address falls in.
    pub service_area: ServiceAreaId,
    /// Free-text delivery address.
    pub address: String,
    /// Requested volume tier.
    pub amount: AmountTier,
    /// Urgency flag; urgent requests carry a price surcharge.
    pub urgent: bool,
    /// Intended payment method.
    pub payment_method: PaymentMethod,
    /// Free-text delivery instructions.
    pub instructions: Option<String>,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Assigned provider; set exactly once, at acceptance.
    pub supplier: Option<ProviderId>,
    /// Human-readable delivery window, composed at acceptance.
    pub delivery_window: Option<String>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When an offer was accepted.
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the delivery completed.
    pub delivered_at: Option<DateTime<Utc>>,
}

impl WaterRequest {
    /// Whether the request belongs to a guest (no registered consumer).
    pub fn is_guest(&self) -> bool {
        self.consumer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_liters_roundtrip() {
        for tier in AmountTier::ALL {
            assert_eq!(AmountTier::from_liters(tier.liters()), Some(tier));
        }
        assert_eq!(AmountTier::from_liters(250), None);
    }

    #[test]
    fn test_status_terminality() {
        assert!(RequestStatus::Delivered.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Accepted.is_terminal());
        assert!(!RequestStatus::NoOffers.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::NoOffers.to_string(), "NO_OFFERS");
        assert_eq!(RequestStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::NoOffers).unwrap(),
            "\"no_offers\""
        );
        assert_eq!(
            serde_json::from_str::<RequestStatus>("\"pending\"").unwrap(),
            RequestStatus::Pending
        );
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(AmountTier::L1000.to_string(), "1000L");
    }
}
