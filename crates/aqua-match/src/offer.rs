//! # Offer Lifecycle — Creation and Withdrawal
//!
//! Creates offers against pending requests and lets providers withdraw
//! their own active offers. Validation is fail-fast with a fixed order:
//! the first violation wins, so callers get a stable, predictable error
//! for any given bad input.
//!
//! Pricing and expiry are computed from the platform settings snapshot
//! fetched at creation time — an offer keeps the price and validity it
//! was born with even if settings change before acceptance.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use aqua_core::{
    ConflictReason, MatchError, Offer, OfferId, OfferStatus, ProviderId, RequestId, RequestStatus,
};
use aqua_pricing::{compute_expiry, compute_price, compute_validity};

use crate::notify::{NotificationEvent, NotificationSink};
use crate::store::MatchStore;

/// Input for offer creation.
#[derive(Debug, Clone)]
pub struct NewOffer {
    /// The request being offered on.
    pub request_id: RequestId,
    /// The submitting provider.
    pub provider_id: ProviderId,
    /// Proposed delivery window start; must be strictly in the future.
    pub window_start: DateTime<Utc>,
    /// Proposed delivery window end; must be strictly after the start.
    pub window_end: DateTime<Utc>,
    /// Optional message to the consumer, bounded by platform settings.
    pub message: Option<String>,
}

/// Creates and withdraws offers.
pub struct OfferLifecycle<S> {
    store: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
}

impl<S> Clone for OfferLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<S: MatchStore> OfferLifecycle<S> {
    /// Create an offer lifecycle over the given store and notifier.
    pub fn new(store: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Create an offer on a pending request.
    ///
    /// Validation order (first violation wins):
    ///
    /// 1. Provider verified and currently available — else `Forbidden`.
    /// 2. Window start strictly in the future, end strictly after start
    ///    — else `InvalidInput`.
    /// 3. Message within the platform maximum — else `InvalidInput`.
    /// 4. Request exists — else `NotFound`; request pending — else
    ///    `Conflict`.
    /// 5. Insert under the one-active-offer-per-(request, provider)
    ///    constraint — else `Duplicate`.
    ///
    /// On success a `new_offer` notification is enqueued for registered
    /// consumers, best-effort: its failure never affects the created
    /// offer.
    pub fn create_offer(&self, input: NewOffer) -> Result<OfferId, MatchError> {
        let provider = self
            .store
            .provider(input.provider_id)
            .ok_or_else(|| MatchError::not_found(format!("provider {}", input.provider_id)))?;
        let status = provider.status();
        if !status.verified {
            return Err(MatchError::forbidden("provider is not verified"));
        }
        if !status.available {
            return Err(MatchError::forbidden("provider is not currently available"));
        }

        let now = Utc::now();
        if input.window_start <= now {
            return Err(MatchError::invalid("delivery window must start in the future"));
        }
        if input.window_end <= input.window_start {
            return Err(MatchError::invalid("delivery window must end after it starts"));
        }

        let settings = self.store.settings_snapshot();
        if let Some(message) = &input.message {
            if message.chars().count() > settings.max_message_length {
                return Err(MatchError::invalid(format!(
                    "message exceeds {} characters",
                    settings.max_message_length
                )));
            }
        }

        let request = self
            .store
            .request(input.request_id)
            .ok_or_else(|| MatchError::not_found(format!("request {}", input.request_id)))?;
        if request.status != RequestStatus::Pending {
            return Err(MatchError::Conflict(ConflictReason::RequestNotPending));
        }

        let price = compute_price(request.amount, request.urgent, &settings);
        let expires_at = compute_expiry(now, compute_validity(&settings));
        let offer = Offer {
            id: OfferId::new(),
            request_id: input.request_id,
            provider_id: input.provider_id,
            window_start: input.window_start,
            window_end: input.window_end,
            message: input.message,
            price,
            expires_at,
            status: OfferStatus::Active,
            created_at: now,
            accepted_at: None,
        };
        let offer_id = offer.id;
        self.store.insert_offer(offer)?;
        tracing::info!(%offer_id, request_id = %input.request_id, provider_id = %input.provider_id, price, "offer created");

        if let Some(consumer) = request.consumer {
            let event = NotificationEvent::NewOffer {
                recipient: consumer,
                request_id: input.request_id,
                offer_id,
                provider_id: input.provider_id,
                price,
            };
            if let Err(err) = self.notifier.enqueue(event) {
                tracing::warn!(%offer_id, error = %err, "new-offer notification dropped");
            }
        }

        Ok(offer_id)
    }

    /// Withdraw (cancel) the provider's own active offer.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the offer does not exist.
    /// - `Forbidden` if it belongs to a different provider.
    /// - `Conflict` if it is not active — only active offers are
    ///   withdrawable.
    pub fn withdraw_offer(
        &self,
        offer_id: OfferId,
        provider_id: ProviderId,
    ) -> Result<(), MatchError> {
        let offer = self
            .store
            .offer(offer_id)
            .ok_or_else(|| MatchError::not_found(format!("offer {offer_id}")))?;
        if offer.provider_id != provider_id {
            return Err(MatchError::forbidden("offer belongs to another provider"));
        }
        if offer.status != OfferStatus::Active {
            return Err(MatchError::Conflict(ConflictReason::OfferUnavailable));
        }
        // Guarded write: a concurrent acceptance may have won since the read.
        if !self.store.update_offer_status_if(
            offer_id,
            OfferStatus::Active,
            OfferStatus::Cancelled,
            Utc::now(),
        ) {
            return Err(MatchError::Conflict(ConflictReason::OfferUnavailable));
        }
        tracing::info!(%offer_id, %provider_id, "offer withdrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::{FailingSink, RecordingSink};
    use crate::notify::LogSink;
    use crate::testutil;
    use aqua_core::{ConsumerId, ProviderProfile, ServiceAreaId, VerificationStatus};
    use chrono::Duration;

    fn valid_window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + Duration::hours(1), now + Duration::hours(3))
    }

    fn lifecycle(store: Arc<crate::MemoryStore>) -> OfferLifecycle<crate::MemoryStore> {
        OfferLifecycle::new(store, Arc::new(LogSink))
    }

    #[test]
    fn test_create_offer_happy_path_prices_from_snapshot() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store.clone());
        let offer_id = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: Some("Llego por la mañana".to_string()),
            })
            .unwrap();

        let offer = store.offer(offer_id).unwrap();
        assert_eq!(offer.status, OfferStatus::Active);
        // 1000 L, not urgent, default table.
        assert_eq!(offer.price, 20_000);
        // Default validity is 60 minutes.
        assert_eq!(offer.expires_at, offer.created_at + Duration::minutes(60));
    }

    #[test]
    fn test_urgent_request_gets_surcharged_quote() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, true);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store.clone());
        let offer_id = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap();
        assert_eq!(store.offer(offer_id).unwrap().price, 22_000);
    }

    #[test]
    fn test_unverified_provider_is_forbidden_and_no_row_inserted() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider_id = ProviderId::new();
        store.upsert_provider(ProviderProfile {
            id: provider_id,
            name: "Pendiente".to_string(),
            verification: VerificationStatus::Pending,
            available: true,
            service_areas: vec![area],
        });
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store.clone());
        let err = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, MatchError::Forbidden(_)));
        assert_eq!(store.active_offer_count(request), 0);
    }

    #[test]
    fn test_gating_precedes_window_validation() {
        // An unverified provider with a bad window still gets Forbidden:
        // the validation order is fixed.
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider_id = ProviderId::new();
        store.upsert_provider(ProviderProfile {
            id: provider_id,
            name: "Pendiente".to_string(),
            verification: VerificationStatus::Rejected,
            available: false,
            service_areas: vec![],
        });
        let request = testutil::pending_request(&store, area, None, false);

        let lifecycle = lifecycle(store);
        let now = Utc::now();
        let err = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id,
                window_start: now - Duration::hours(1),
                window_end: now - Duration::hours(2),
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, MatchError::Forbidden(_)));
    }

    #[test]
    fn test_window_must_start_in_future_and_end_after_start() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let lifecycle = lifecycle(store);
        let now = Utc::now();

        let past_start = lifecycle.create_offer(NewOffer {
            request_id: request,
            provider_id: provider,
            window_start: now - Duration::minutes(1),
            window_end: now + Duration::hours(2),
            message: None,
        });
        assert!(matches!(past_start, Err(MatchError::InvalidInput(_))));

        let inverted = lifecycle.create_offer(NewOffer {
            request_id: request,
            provider_id: provider,
            window_start: now + Duration::hours(2),
            window_end: now + Duration::hours(1),
            message: None,
        });
        assert!(matches!(inverted, Err(MatchError::InvalidInput(_))));

        let empty = lifecycle.create_offer(NewOffer {
            request_id: request,
            provider_id: provider,
            window_start: now + Duration::hours(2),
            window_end: now + Duration::hours(2),
            message: None,
        });
        assert!(matches!(empty, Err(MatchError::InvalidInput(_))));
    }

    #[test]
    fn test_oversized_message_is_invalid_input() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store);
        let err = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: Some("x".repeat(501)),
            })
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[test]
    fn test_message_at_maximum_length_is_accepted() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();
        let max = store.settings_snapshot().max_message_length;

        let lifecycle = lifecycle(store.clone());
        let offer_id = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: Some("x".repeat(max)),
            })
            .unwrap();
        let message = store.offer(offer_id).unwrap().message.unwrap();
        assert_eq!(message.chars().count(), max);
    }

    #[test]
    fn test_missing_request_is_not_found() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store);
        let err = lifecycle
            .create_offer(NewOffer {
                request_id: RequestId::new(),
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, MatchError::NotFound(_)));
    }

    #[test]
    fn test_non_pending_request_is_conflict() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        store.accept_request_if_pending(request, provider, "w".into(), Utc::now());
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store);
        let err = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap_err();
        assert_eq!(err, MatchError::Conflict(ConflictReason::RequestNotPending));
    }

    #[test]
    fn test_second_offer_on_same_request_is_duplicate() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();

        let lifecycle = lifecycle(store.clone());
        let input = NewOffer {
            request_id: request,
            provider_id: provider,
            window_start: start,
            window_end: end,
            message: None,
        };
        lifecycle.create_offer(input.clone()).unwrap();
        let err = lifecycle.create_offer(input).unwrap_err();
        assert_eq!(err, MatchError::Duplicate);
        assert_eq!(store.active_offer_count(request), 1);
    }

    #[test]
    fn test_registered_consumer_gets_new_offer_event() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let consumer = ConsumerId::new();
        let request = testutil::pending_request(&store, area, Some(consumer), false);
        let (start, end) = valid_window();

        let sink = Arc::new(RecordingSink::default());
        let lifecycle = OfferLifecycle::new(store, sink.clone());
        let offer_id = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            NotificationEvent::NewOffer { recipient, offer_id: oid, .. }
                if *recipient == consumer && *oid == offer_id
        ));
    }

    #[test]
    fn test_guest_request_skips_consumer_notification() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let (start, end) = valid_window();

        let sink = Arc::new(RecordingSink::default());
        let lifecycle = OfferLifecycle::new(store, sink.clone());
        lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_notification_failure_does_not_fail_creation() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, Some(ConsumerId::new()), false);
        let (start, end) = valid_window();

        let lifecycle = OfferLifecycle::new(store.clone(), Arc::new(FailingSink));
        let offer_id = lifecycle
            .create_offer(NewOffer {
                request_id: request,
                provider_id: provider,
                window_start: start,
                window_end: end,
                message: None,
            })
            .unwrap();
        assert!(store.offer(offer_id).is_some());
    }

    #[test]
    fn test_withdraw_own_active_offer() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let offer = testutil::active_offer(&store, request, provider);

        let lifecycle = lifecycle(store.clone());
        lifecycle.withdraw_offer(offer, provider).unwrap();
        assert_eq!(store.offer(offer).unwrap().status, OfferStatus::Cancelled);
    }

    #[test]
    fn test_withdraw_is_fenced_by_ownership_and_state() {
        let store = testutil::store();
        let area = ServiceAreaId::new();
        let provider = testutil::approved_provider(&store, vec![area]);
        let other = testutil::approved_provider(&store, vec![area]);
        let request = testutil::pending_request(&store, area, None, false);
        let offer = testutil::active_offer(&store, request, provider);

        let lifecycle = lifecycle(store.clone());
        assert!(matches!(
            lifecycle.withdraw_offer(OfferId::new(), provider),
            Err(MatchError::NotFound(_))
        ));
        assert!(matches!(
            lifecycle.withdraw_offer(offer, other),
            Err(MatchError::Forbidden(_))
        ));

        lifecycle.withdraw_offer(offer, provider).unwrap();
        // Already cancelled: no longer withdrawable.
        assert_eq!(
            lifecycle.withdraw_offer(offer, provider).unwrap_err(),
            MatchError::Conflict(ConflictReason::OfferUnavailable)
        );
    }
}
