//! # aqua-match — Offer/Request Matching Engine
//!
//! The transactional core of AquaMatch. Three components share a
//! `MatchStore` and split the work:
//!
//! - **RequestCatalog** (`catalog.rs`): read-side queries — pending
//!   requests visible to a provider (gated on verification, availability,
//!   and service areas) and single-request detail with offer counts.
//!
//! - **OfferLifecycle** (`offer.rs`): creates and withdraws offers,
//!   applying the pricing/expiry snapshot at creation time and enforcing
//!   one active offer per (request, provider) pair.
//!
//! - **AcceptanceCoordinator** (`accept.rs`): the only write path that
//!   moves a request out of `Pending`. Accepts exactly one offer per
//!   request under concurrency, invalidates sibling offers, and fires
//!   the acceptance notification without ever letting its failure roll
//!   back a committed acceptance.
//!
//! ## Concurrency Model
//!
//! Every operation is a short-lived unit of work; there is no scheduler
//! or background worker in this crate. All status mutation goes through
//! the store's guarded conditional updates (`update_offer_status_if`,
//! `accept_request_if_pending`), so two concurrent acceptances — of the
//! same offer or of different offers on the same request — cannot both
//! succeed. The loser receives a `Conflict`, never a silent no-op.
//!
//! The time-based sweep that flips expired offers to `Expired` is
//! external; acceptance re-checks wall-clock expiry at read time and
//! treats a past-expiry offer as inactive regardless of persisted status.
//!
//! ## Crate Policy
//!
//! - Depends on `aqua-core` and `aqua-pricing` internally.
//! - No business logic panics; every failure is a `MatchError`.
//! - Notification dispatch is fire-and-forget: failures are logged via
//!   `tracing` and never propagated.

pub mod accept;
pub mod catalog;
pub mod notify;
pub mod offer;
pub mod store;

// ─── Catalog re-exports ─────────────────────────────────────────────

pub use catalog::{RequestCatalog, RequestDetail, RequestSummary};

// ─── Offer lifecycle re-exports ─────────────────────────────────────

pub use offer::{NewOffer, OfferLifecycle};

// ─── Acceptance re-exports ──────────────────────────────────────────

pub use accept::{Acceptance, AcceptanceCoordinator};

// ─── Notification re-exports ────────────────────────────────────────

pub use notify::{ChannelSink, LogSink, NotificationEvent, NotificationSink, NotifyError};

// ─── Store re-exports ───────────────────────────────────────────────

pub use store::{MatchStore, MemoryStore};

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared scenario builders for the engine tests.

    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use crate::store::MatchStore;

    use aqua_core::{
        AmountTier, ConsumerId, Offer, OfferId, OfferStatus, PaymentMethod, ProviderId,
        ProviderProfile, RequestId, RequestStatus, ServiceAreaId, VerificationStatus,
        WaterRequest,
    };

    use crate::store::MemoryStore;

    pub fn approved_provider(store: &MemoryStore, areas: Vec<ServiceAreaId>) -> ProviderId {
        let id = ProviderId::new();
        store.upsert_provider(ProviderProfile {
            id,
            name: "Aguatero Norte".to_string(),
            verification: VerificationStatus::Approved,
            available: true,
            service_areas: areas,
        });
        id
    }

    pub fn pending_request(
        store: &MemoryStore,
        area: ServiceAreaId,
        consumer: Option<ConsumerId>,
        urgent: bool,
    ) -> RequestId {
        let id = RequestId::new();
        store.insert_request(WaterRequest {
            id,
            consumer,
            guest_name: consumer.is_none().then(|| "Ana".to_string()),
            guest_phone: consumer.is_none().then(|| "+595 981 000000".to_string()),
            service_area: area,
            address: "Av. Mcal. López 1234".to_string(),
            amount: AmountTier::L1000,
            urgent,
            payment_method: PaymentMethod::Cash,
            instructions: None,
            status: RequestStatus::Pending,
            supplier: None,
            delivery_window: None,
            created_at: Utc::now(),
            accepted_at: None,
            delivered_at: None,
        });
        id
    }

    pub fn active_offer(
        store: &MemoryStore,
        request_id: RequestId,
        provider_id: ProviderId,
    ) -> OfferId {
        let now = Utc::now();
        let id = OfferId::new();
        store
            .insert_offer(Offer {
                id,
                request_id,
                provider_id,
                window_start: now + Duration::hours(1),
                window_end: now + Duration::hours(3),
                message: None,
                price: 20_000,
                expires_at: now + Duration::minutes(60),
                status: OfferStatus::Active,
                created_at: now,
                accepted_at: None,
            })
            .expect("offer insert");
        id
    }

    pub fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }
}
