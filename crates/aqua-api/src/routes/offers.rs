//! # Offer Routes — Withdrawal and Acceptance
//!
//! - `POST /v1/offers/{id}/withdraw` — provider withdraws an active offer
//! - `POST /v1/offers/{id}/accept` — consumer/guest accepts an offer

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use aqua_core::OfferId;
use aqua_match::Acceptance;

use crate::auth::{AcceptCaller, ProviderCaller};
use crate::error::AppError;
use crate::state::AppState;

/// Response body for a successful withdrawal.
#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawResponse {
    /// The offer that was cancelled.
    pub offer_id: OfferId,
    /// Always "cancelled"; present for UI convenience.
    pub status: String,
}

/// `POST /v1/offers/{id}/withdraw`
pub async fn withdraw(
    State(state): State<AppState>,
    ProviderCaller(provider_id): ProviderCaller,
    Path(offer_id): Path<OfferId>,
) -> Result<Json<WithdrawResponse>, AppError> {
    state.offers.withdraw_offer(offer_id, provider_id)?;
    Ok(Json(WithdrawResponse {
        offer_id,
        status: "cancelled".to_string(),
    }))
}

/// `POST /v1/offers/{id}/accept`
pub async fn accept(
    State(state): State<AppState>,
    AcceptCaller(caller): AcceptCaller,
    Path(offer_id): Path<OfferId>,
) -> Result<Json<Acceptance>, AppError> {
    let acceptance = state.acceptance.accept_offer(offer_id, caller)?;
    Ok(Json(acceptance))
}
