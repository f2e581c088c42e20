//! # aqua-api — Axum HTTP Surface
//!
//! The HTTP layer over the AquaMatch engine, built on Axum/Tower/Tokio.
//!
//! ## Routes
//!
//! - `GET  /v1/requests` — pending requests visible to the calling provider
//! - `GET  /v1/requests/{id}` — single request detail (pre-offer view)
//! - `POST /v1/requests/{id}/offers` — submit an offer
//! - `POST /v1/offers/{id}/withdraw` — withdraw an active offer
//! - `POST /v1/offers/{id}/accept` — accept an offer (consumer/guest)
//! - `GET  /health/live` — unauthenticated liveness probe
//!
//! ## Caller Identity
//!
//! Authentication is an external collaborator: an upstream gateway
//! resolves the session and forwards the result as `x-actor-role` and
//! `x-actor-id` headers, which the extractors in `auth.rs` turn into
//! typed callers. Absent or malformed headers are surfaced uniformly as
//! 401 before a handler runs.
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — they delegate to the engine
//!   components and translate `MatchError` into `AppError`.
//! - All errors map to structured JSON responses via `AppError`.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/v1/requests", get(routes::requests::list_available))
        .route("/v1/requests/{id}", get(routes::requests::get_detail))
        .route(
            "/v1/requests/{id}/offers",
            post(routes::requests::create_offer),
        )
        .route("/v1/offers/{id}/withdraw", post(routes::offers::withdraw))
        .route("/v1/offers/{id}/accept", post(routes::offers::accept))
        .route("/health/live", get(routes::health::live))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
