//! # Match Store — Guarded Persistence Seam
//!
//! `MatchStore` is the trait boundary between the matching engine and
//! whatever holds the Offer/Request tables. Its mutation surface is
//! deliberately narrow: every status write is a conditional update keyed
//! on the current status, so the engine's single-writer guarantees hold
//! over any backend that can do a per-row compare-and-swap.
//!
//! `MemoryStore` is the in-process implementation: plain maps behind a
//! `std::sync::RwLock`. Conditional updates take the write lock for the
//! duration of the check-and-set, which is what makes them atomic.
//!
//! No other writer is permitted to touch `status` on either entity
//! outside these methods — the external expiry sweep is specified to go
//! through the same guarded transition.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use aqua_core::{
    MatchError, Offer, OfferId, OfferStatus, PlatformSettings, ProviderId, ProviderProfile,
    RequestId, RequestStatus, ServiceAreaId, WaterRequest,
};

/// Storage seam for the matching engine.
///
/// Read methods return owned snapshots; a caller must never assume a
/// snapshot is still current at write time — that is what the guarded
/// update methods are for.
pub trait MatchStore: Send + Sync {
    /// Point-in-time platform settings snapshot.
    fn settings_snapshot(&self) -> PlatformSettings;

    /// Provider profile by id.
    fn provider(&self, id: ProviderId) -> Option<ProviderProfile>;

    /// Request by id.
    fn request(&self, id: RequestId) -> Option<WaterRequest>;

    /// All pending requests whose service area is in `areas`.
    fn pending_requests_in(&self, areas: &[ServiceAreaId]) -> Vec<WaterRequest>;

    /// Offer by id.
    fn offer(&self, id: OfferId) -> Option<Offer>;

    /// Offer together with its parent request, in one read.
    fn offer_with_request(&self, id: OfferId) -> Option<(Offer, WaterRequest)>;

    /// Count of currently-active offers on a request.
    fn active_offer_count(&self, request_id: RequestId) -> usize;

    /// The provider's active offer on a request, if one exists.
    fn active_offer_for(&self, request_id: RequestId, provider_id: ProviderId) -> Option<Offer>;

    /// Insert a new offer, enforcing the at-most-one-active-per-
    /// (request, provider) uniqueness constraint.
    ///
    /// # Errors
    ///
    /// `MatchError::Duplicate` if the pair already holds an active offer.
    fn insert_offer(&self, offer: Offer) -> Result<(), MatchError>;

    /// Guarded status transition for a single offer.
    ///
    /// Atomically moves the offer from `expected` to `next` and returns
    /// `true`; returns `false` without writing if the current status is
    /// not `expected`. Transitions into `Accepted` stamp `accepted_at`
    /// with `at`; transitions back to `Active` (compensation) clear it.
    fn update_offer_status_if(
        &self,
        id: OfferId,
        expected: OfferStatus,
        next: OfferStatus,
        at: DateTime<Utc>,
    ) -> bool;

    /// Guarded acceptance of a request.
    ///
    /// Atomically moves the request from `Pending` to `Accepted`,
    /// assigning the supplier and the human-readable delivery window,
    /// and returns `true`; returns `false` without writing if the
    /// request is absent or no longer pending.
    fn accept_request_if_pending(
        &self,
        id: RequestId,
        supplier: ProviderId,
        delivery_window: String,
        at: DateTime<Utc>,
    ) -> bool;

    /// Move every still-active offer on the request — except `winner` —
    /// to `RequestFilled`. Returns the number of offers updated.
    ///
    /// Best-effort batch: the request is already committed to `Accepted`
    /// when this runs, so no further guard is required.
    fn fill_sibling_offers(&self, request_id: RequestId, winner: OfferId) -> usize;
}

// ─── In-Memory Store ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct StoreInner {
    requests: HashMap<RequestId, WaterRequest>,
    offers: HashMap<OfferId, Offer>,
    providers: HashMap<ProviderId, ProviderProfile>,
    settings: PlatformSettings,
}

/// In-process `MatchStore` backed by maps under a single `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store with default platform settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the platform settings snapshot.
    pub fn set_settings(&self, settings: PlatformSettings) {
        self.write().settings = settings;
    }

    /// Seed a request. Intake flows are external to this core; this is
    /// the boundary they hand requests across.
    pub fn insert_request(&self, request: WaterRequest) {
        self.write().requests.insert(request.id, request);
    }

    /// Seed or update a provider profile.
    pub fn upsert_provider(&self, profile: ProviderProfile) {
        self.write().providers.insert(profile.id, profile);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        // Lock poisoning only occurs if a writer panicked; the engine
        // has no panicking paths, so recover the guard either way.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl MatchStore for MemoryStore {
    fn settings_snapshot(&self) -> PlatformSettings {
        self.read().settings.clone()
    }

    fn provider(&self, id: ProviderId) -> Option<ProviderProfile> {
        self.read().providers.get(&id).cloned()
    }

    fn request(&self, id: RequestId) -> Option<WaterRequest> {
        self.read().requests.get(&id).cloned()
    }

    fn pending_requests_in(&self, areas: &[ServiceAreaId]) -> Vec<WaterRequest> {
        self.read()
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending && areas.contains(&r.service_area))
            .cloned()
            .collect()
    }

    fn offer(&self, id: OfferId) -> Option<Offer> {
        self.read().offers.get(&id).cloned()
    }

    fn offer_with_request(&self, id: OfferId) -> Option<(Offer, WaterRequest)> {
        let inner = self.read();
        let offer = inner.offers.get(&id)?.clone();
        let request = inner.requests.get(&offer.request_id)?.clone();
        Some((offer, request))
    }

    fn active_offer_count(&self, request_id: RequestId) -> usize {
        self.read()
            .offers
            .values()
            .filter(|o| o.request_id == request_id && o.status == OfferStatus::Active)
            .count()
    }

    fn active_offer_for(&self, request_id: RequestId, provider_id: ProviderId) -> Option<Offer> {
        self.read()
            .offers
            .values()
            .find(|o| {
                o.request_id == request_id
                    && o.provider_id == provider_id
                    && o.status == OfferStatus::Active
            })
            .cloned()
    }

    fn insert_offer(&self, offer: Offer) -> Result<(), MatchError> {
        let mut inner = self.write();
        let duplicate = inner.offers.values().any(|o| {
            o.request_id == offer.request_id
                && o.provider_id == offer.provider_id
                && o.status == OfferStatus::Active
        });
        if duplicate {
            return Err(MatchError::Duplicate);
        }
        inner.offers.insert(offer.id, offer);
        Ok(())
    }

    fn update_offer_status_if(
        &self,
        id: OfferId,
        expected: OfferStatus,
        next: OfferStatus,
        at: DateTime<Utc>,
    ) -> bool {
        let mut inner = self.write();
        let Some(offer) = inner.offers.get_mut(&id) else {
            return false;
        };
        if offer.status != expected {
            return false;
        }
        offer.status = next;
        match next {
            OfferStatus::Accepted => offer.accepted_at = Some(at),
            OfferStatus::Active => offer.accepted_at = None,
            _ => {}
        }
        true
    }

    fn accept_request_if_pending(
        &self,
        id: RequestId,
        supplier: ProviderId,
        delivery_window: String,
        at: DateTime<Utc>,
    ) -> bool {
        let mut inner = self.write();
        let Some(request) = inner.requests.get_mut(&id) else {
            return false;
        };
        if request.status != RequestStatus::Pending {
            return false;
        }
        request.status = RequestStatus::Accepted;
        request.supplier = Some(supplier);
        request.delivery_window = Some(delivery_window);
        request.accepted_at = Some(at);
        true
    }

    fn fill_sibling_offers(&self, request_id: RequestId, winner: OfferId) -> usize {
        let mut inner = self.write();
        let mut updated = 0;
        for offer in inner.offers.values_mut() {
            if offer.request_id == request_id
                && offer.id != winner
                && offer.status == OfferStatus::Active
            {
                offer.status = OfferStatus::RequestFilled;
                updated += 1;
            }
        }
        updated
    }
}
