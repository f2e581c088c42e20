//! # Caller Identity Extraction
//!
//! Authentication and session handling live in an upstream gateway;
//! this layer only consumes its result. The gateway forwards the
//! resolved identity as two headers:
//!
//! - `x-actor-role`: `provider`, `consumer`, or `guest`
//! - `x-actor-id`: the actor's UUID (absent for guests)
//!
//! Missing or malformed headers reject with 401 before any handler
//! runs, so handlers always receive a well-typed caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use aqua_core::{CallerIdentity, ConsumerId, ProviderId};

use crate::error::AppError;

const ROLE_HEADER: &str = "x-actor-role";
const ID_HEADER: &str = "x-actor-id";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name)?.to_str().ok()
}

fn actor_uuid(parts: &Parts) -> Result<Uuid, AppError> {
    let raw = header(parts, ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("missing {ID_HEADER} header")))?;
    raw.parse()
        .map_err(|_| AppError::Unauthorized(format!("malformed {ID_HEADER} header")))
}

/// The calling provider, for provider-side operations.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCaller(pub ProviderId);

impl<S: Send + Sync> FromRequestParts<S> for ProviderCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header(parts, ROLE_HEADER) {
            Some("provider") => Ok(Self(ProviderId(actor_uuid(parts)?))),
            Some(_) => Err(AppError::Unauthorized(
                "provider role required".to_string(),
            )),
            None => Err(AppError::Unauthorized(format!(
                "missing {ROLE_HEADER} header"
            ))),
        }
    }
}

/// The calling consumer or guest, for the acceptance operation.
#[derive(Debug, Clone, Copy)]
pub struct AcceptCaller(pub CallerIdentity);

impl<S: Send + Sync> FromRequestParts<S> for AcceptCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header(parts, ROLE_HEADER) {
            Some("consumer") => Ok(Self(CallerIdentity::Consumer(ConsumerId(actor_uuid(
                parts,
            )?)))),
            // Guests are admitted here; their capability token was
            // already validated by the gateway.
            Some("guest") => Ok(Self(CallerIdentity::Guest)),
            Some(_) => Err(AppError::Unauthorized(
                "consumer or guest role required".to_string(),
            )),
            None => Err(AppError::Unauthorized(format!(
                "missing {ROLE_HEADER} header"
            ))),
        }
    }
}
