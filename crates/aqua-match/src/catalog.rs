//! # Request Catalog — Read-Side Queries
//!
//! What a provider sees before offering: the pending requests in their
//! service areas, and the detail of a single request. An ineligible
//! provider gets an empty list *plus* the derived `ProviderStatus` so
//! the caller can render the correct reason — a deliberate non-error
//! empty result, not a failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use aqua_core::{
    ConflictReason, MatchError, OfferId, ProviderId, ProviderStatus, RequestId, RequestStatus,
    WaterRequest,
};

use crate::store::MatchStore;

/// A pending request as listed for providers, annotated with the
/// current count of active offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSummary {
    /// The request record.
    pub request: WaterRequest,
    /// Currently-active offers on it.
    pub active_offers: usize,
}

/// Full request detail for the pre-offer view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDetail {
    /// The request record.
    pub request: WaterRequest,
    /// Currently-active offers on it.
    pub active_offers: usize,
    /// The calling provider's own active offer, if any, for idempotent
    /// re-display ("you already offered").
    pub own_offer_id: Option<OfferId>,
}

/// Read-side catalog of pending requests.
#[derive(Debug)]
pub struct RequestCatalog<S> {
    store: Arc<S>,
}

impl<S> Clone for RequestCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: MatchStore> RequestCatalog<S> {
    /// Create a catalog over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pending requests visible to the provider, with the derived
    /// gating status.
    ///
    /// If any gate fails (not verified, not available, no service
    /// areas) the list is empty and the status tells the caller why.
    /// Otherwise the list holds every pending request in the provider's
    /// areas, ordered by urgency descending then creation time
    /// descending (newest first).
    ///
    /// # Errors
    ///
    /// `NotFound` if the provider does not exist.
    pub fn list_available(
        &self,
        provider_id: ProviderId,
    ) -> Result<(Vec<RequestSummary>, ProviderStatus), MatchError> {
        let provider = self
            .store
            .provider(provider_id)
            .ok_or_else(|| MatchError::not_found(format!("provider {provider_id}")))?;
        let status = provider.status();
        if !status.eligible() {
            tracing::debug!(%provider_id, ?status, "catalog: provider not eligible");
            return Ok((Vec::new(), status));
        }

        let mut requests = self.store.pending_requests_in(&provider.service_areas);
        requests.sort_by(|a, b| {
            b.urgent
                .cmp(&a.urgent)
                .then(b.created_at.cmp(&a.created_at))
        });

        let summaries = requests
            .into_iter()
            .map(|request| {
                let active_offers = self.store.active_offer_count(request.id);
                RequestSummary {
                    request,
                    active_offers,
                }
            })
            .collect();
        Ok((summaries, status))
    }

    /// Detail of a single pending request, with the caller's own active
    /// offer surfaced if one exists.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist.
    /// - `Conflict` if the request is no longer pending — the detail
    ///   view is only meaningful pre-acceptance.
    pub fn get_detail(
        &self,
        request_id: RequestId,
        provider_id: ProviderId,
    ) -> Result<RequestDetail, MatchError> {
        let request = self
            .store
            .request(request_id)
            .ok_or_else(|| MatchError::not_found(format!("request {request_id}")))?;
        if request.status != RequestStatus::Pending {
            return Err(MatchError::Conflict(ConflictReason::RequestNotPending));
        }
        let active_offers = self.store.active_offer_count(request_id);
        let own_offer_id = self
            .store
            .active_offer_for(request_id, provider_id)
            .map(|o| o.id);
        Ok(RequestDetail {
            request,
            active_offers,
            own_offer_id,
        })
    }
}
