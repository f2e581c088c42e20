//! # Acceptance Coordinator — The Core State Machine
//!
//! The only write path that moves a request out of `Pending`.
//!
//! ## Transitions
//!
//! ```text
//! Offer.Active   ──accept──▶  Offer.Accepted       (terminal, exactly one per request)
//! Offer.Active   ──sibling──▶ Offer.RequestFilled  (terminal, all other active offers)
//! Request.Pending ──accept──▶ Request.Accepted
//! ```
//!
//! ## Write Protocol
//!
//! Steps 5–6 are two separately guarded writes, not one multi-row
//! transaction: first the offer (Active → Accepted, guarded on "still
//! active"), then the request (Pending → Accepted, guarded on "still
//! pending"). If the request guard loses — a competing acceptance of a
//! *different* offer committed the request first — the offer write is
//! **compensated** back to Active and the caller gets a `Conflict`,
//! never an accepted offer dangling on a filled request.
//!
//! The offer guard prevents two acceptances of the *same* offer from
//! both succeeding; the request guard prevents acceptances of two
//! *different* offers on the same request from both succeeding. The
//! loser of either race receives a `Conflict`, not a silent no-op.
//!
//! Sibling invalidation (step 8) and the provider notification (step 9)
//! run after the request is committed; neither can undo an acceptance.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use aqua_core::{
    CallerIdentity, ConflictReason, MatchError, OfferId, OfferStatus, RequestId, RequestStatus,
};

use crate::notify::{NotificationEvent, NotificationSink};
use crate::store::MatchStore;

/// Identifiers returned to the caller for navigation/confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptance {
    /// The offer that won.
    pub offer_id: OfferId,
    /// Its parent request.
    pub request_id: RequestId,
}

/// Owns the pending → accepted transition for requests.
pub struct AcceptanceCoordinator<S> {
    store: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
}

impl<S> Clone for AcceptanceCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<S: MatchStore> AcceptanceCoordinator<S> {
    /// Create a coordinator over the given store and notifier.
    pub fn new(store: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Accept one offer, fill its request, and invalidate its siblings.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the offer does not exist.
    /// - `Conflict` with a status-specific reason if the offer is not
    ///   acceptable: already accepted, expired (including wall-clock
    ///   expiry of a still-`Active` row), or otherwise unavailable.
    /// - `Conflict` if the parent request is no longer pending, or if a
    ///   competing acceptance won the request mid-flight (in which case
    ///   the offer write has been compensated).
    /// - `Forbidden` if an authenticated consumer calls on a request
    ///   owned by a different consumer. Guest-owned requests skip this
    ///   check; their capability token is validated externally.
    pub fn accept_offer(
        &self,
        offer_id: OfferId,
        caller: CallerIdentity,
    ) -> Result<Acceptance, MatchError> {
        // Step 1: one read for the offer and its parent request.
        let (offer, request) = self
            .store
            .offer_with_request(offer_id)
            .ok_or_else(|| MatchError::not_found(format!("offer {offer_id}")))?;

        // Step 2: offer must be acceptable now. The expiry sweep is
        // external, so a past-expiry row can still read Active; the
        // wall clock decides.
        let now = Utc::now();
        match offer.status {
            OfferStatus::Active if !offer.is_acceptable_at(now) => {
                return Err(MatchError::Conflict(ConflictReason::OfferExpired));
            }
            OfferStatus::Active => {}
            OfferStatus::Accepted => {
                return Err(MatchError::Conflict(ConflictReason::OfferAlreadyAccepted));
            }
            OfferStatus::Expired => {
                return Err(MatchError::Conflict(ConflictReason::OfferExpired));
            }
            OfferStatus::Cancelled | OfferStatus::RequestFilled => {
                return Err(MatchError::Conflict(ConflictReason::OfferUnavailable));
            }
        }

        // Step 3: the parent request must still be open.
        if request.status != RequestStatus::Pending {
            return Err(MatchError::Conflict(ConflictReason::RequestNotPending));
        }

        // Step 4: ownership. A consumer may only accept offers on their
        // own request; guest-owned requests have no consumer reference.
        if let CallerIdentity::Consumer(caller_id) = caller {
            if let Some(owner) = request.consumer {
                if owner != caller_id {
                    return Err(MatchError::forbidden(
                        "request belongs to another consumer",
                    ));
                }
            }
        }

        // Step 5: guarded offer write. Losing here means a concurrent
        // acceptance of this same offer already won.
        if !self.store.update_offer_status_if(
            offer_id,
            OfferStatus::Active,
            OfferStatus::Accepted,
            now,
        ) {
            return Err(MatchError::Conflict(ConflictReason::OfferAlreadyAccepted));
        }

        // Step 6: guarded request write.
        let window = offer.delivery_window_label();
        if !self
            .store
            .accept_request_if_pending(offer.request_id, offer.provider_id, window.clone(), now)
        {
            // Step 7: compensate. A competing acceptance of a different
            // offer committed the request between steps 5 and 6; revert
            // the offer so it is not left accepted on a filled request.
            let reverted = self.store.update_offer_status_if(
                offer_id,
                OfferStatus::Accepted,
                OfferStatus::Active,
                now,
            );
            if !reverted {
                // No other writer touches Accepted offers, so this
                // indicates a store defect rather than a race.
                tracing::error!(%offer_id, "compensating rollback failed to revert offer");
            }
            // If the race was lost to a competing acceptance, this offer
            // is now a sibling of the winner — and the winner's sibling
            // sweep may have run while this offer still read Accepted.
            // Converge it to RequestFilled here rather than leaving an
            // active offer on a filled request.
            if let Some(request) = self.store.request(offer.request_id) {
                if request.status == RequestStatus::Accepted {
                    self.store.update_offer_status_if(
                        offer_id,
                        OfferStatus::Active,
                        OfferStatus::RequestFilled,
                        now,
                    );
                }
            }
            tracing::warn!(%offer_id, request_id = %offer.request_id, "acceptance lost request race; offer compensated");
            return Err(MatchError::Conflict(ConflictReason::AcceptanceRaceLost));
        }

        // Step 8: invalidate siblings. The request is committed, so no
        // further guard is needed.
        let filled = self.store.fill_sibling_offers(offer.request_id, offer_id);
        tracing::info!(%offer_id, request_id = %offer.request_id, provider_id = %offer.provider_id, siblings_filled = filled, "offer accepted");

        // Step 9: fire-and-forget provider notification. Fires for
        // guest-owned requests too; guest-side notification is keyed by
        // tracking token and handled externally.
        let event = NotificationEvent::OfferAccepted {
            recipient: offer.provider_id,
            request_id: offer.request_id,
            offer_id,
            delivery_window: window,
        };
        if let Err(err) = self.notifier.enqueue(event) {
            tracing::warn!(%offer_id, error = %err, "acceptance notification dropped");
        }

        Ok(Acceptance {
            offer_id,
            request_id: offer.request_id,
        })
    }
}
