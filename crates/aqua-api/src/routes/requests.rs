//! # Request Routes — Provider-Facing Catalog and Offer Submission
//!
//! - `GET  /v1/requests` — pending requests visible to the caller
//! - `GET  /v1/requests/{id}` — single request detail
//! - `POST /v1/requests/{id}/offers` — submit an offer

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aqua_core::{OfferId, ProviderStatus, RequestId};
use aqua_match::{NewOffer, RequestDetail, RequestSummary};

use crate::auth::ProviderCaller;
use crate::error::AppError;
use crate::state::AppState;

/// Response body for the catalog listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListAvailableResponse {
    /// Pending requests in the provider's areas, urgency-first.
    pub requests: Vec<RequestSummary>,
    /// Derived gating status; explains an empty list.
    pub provider_status: ProviderStatus,
}

/// `GET /v1/requests`
pub async fn list_available(
    State(state): State<AppState>,
    ProviderCaller(provider_id): ProviderCaller,
) -> Result<Json<ListAvailableResponse>, AppError> {
    let (requests, provider_status) = state.catalog.list_available(provider_id)?;
    Ok(Json(ListAvailableResponse {
        requests,
        provider_status,
    }))
}

/// `GET /v1/requests/{id}`
pub async fn get_detail(
    State(state): State<AppState>,
    ProviderCaller(provider_id): ProviderCaller,
    Path(request_id): Path<RequestId>,
) -> Result<Json<RequestDetail>, AppError> {
    let detail = state.catalog.get_detail(request_id, provider_id)?;
    Ok(Json(detail))
}

/// Request body for offer submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOfferBody {
    /// Proposed delivery window start (RFC 3339).
    pub window_start: DateTime<Utc>,
    /// Proposed delivery window end (RFC 3339).
    pub window_end: DateTime<Utc>,
    /// Optional message to the consumer.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for offer submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOfferResponse {
    /// The created offer.
    pub offer_id: OfferId,
}

/// `POST /v1/requests/{id}/offers`
pub async fn create_offer(
    State(state): State<AppState>,
    ProviderCaller(provider_id): ProviderCaller,
    Path(request_id): Path<RequestId>,
    Json(body): Json<CreateOfferBody>,
) -> Result<(StatusCode, Json<CreateOfferResponse>), AppError> {
    let offer_id = state.offers.create_offer(NewOffer {
        request_id,
        provider_id,
        window_start: body.window_start,
        window_end: body.window_end,
        message: body.message,
    })?;
    Ok((StatusCode::CREATED, Json(CreateOfferResponse { offer_id })))
}
