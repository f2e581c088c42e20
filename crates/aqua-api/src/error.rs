//! # Application Error
//!
//! Maps engine errors to structured HTTP responses with proper status
//! codes and error bodies. The `kind` field lets UI layers branch on
//! the failure without parsing messages — in particular `duplicate_offer`
//! stays distinct from generic conflicts so the caller can render
//! "you already offered" verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use aqua_core::MatchError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Insufficient permissions or ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// State precondition no longer holds.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The (request, provider) pair already has an active offer.
    #[error("duplicate offer: {0}")]
    Duplicate(String),

    /// Request validation failed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Caller identity missing or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) | AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Duplicate(_) => "duplicate_offer",
            AppError::Validation(_) => "invalid_input",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::NotFound(what) => AppError::NotFound(what),
            MatchError::Forbidden(why) => AppError::Forbidden(why),
            MatchError::Conflict(reason) => AppError::Conflict(reason.to_string()),
            MatchError::Duplicate => AppError::Duplicate(err.to_string()),
            MatchError::InvalidInput(why) => AppError::Validation(why),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_core::ConflictReason;

    #[test]
    fn test_match_error_mapping() {
        assert_eq!(
            AppError::from(MatchError::not_found("offer x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(MatchError::forbidden("nope")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(MatchError::Conflict(ConflictReason::OfferExpired)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(MatchError::invalid("bad window")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_duplicate_keeps_distinct_kind() {
        let err = AppError::from(MatchError::Duplicate);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "duplicate_offer");
    }
}
