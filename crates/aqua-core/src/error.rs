//! # Error Taxonomy
//!
//! The discriminated failure kinds returned by every matching operation.
//! Callers receive a `MatchError` rather than exceptions or strings, so
//! UI layers can render kind-specific messaging ("ya fue aceptada" vs.
//! "ya no está disponible").
//!
//! ## Design
//!
//! - State-precondition failures are structured: `Conflict` carries a
//!   `ConflictReason` so a race loser is distinguishable from a genuinely
//!   expired offer.
//! - `Duplicate` is a sub-kind of conflict kept as its own variant: the
//!   unique-active-offer constraint deserves a verbatim "you already
//!   offered" message, not a generic error.
//! - Notification failures never appear here — they are logged and
//!   swallowed at the dispatch boundary, by contract.

use thiserror::Error;

/// Why a state precondition no longer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The offer was already accepted (possibly by a racing call).
    OfferAlreadyAccepted,
    /// The offer's validity window has passed.
    OfferExpired,
    /// The offer is cancelled, superseded, or otherwise not active.
    OfferUnavailable,
    /// The parent request is no longer pending.
    RequestNotPending,
    /// Another acceptance won the request between the offer and request
    /// updates; the offer update was compensated.
    AcceptanceRaceLost,
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OfferAlreadyAccepted => "offer was already accepted",
            Self::OfferExpired => "offer has expired",
            Self::OfferUnavailable => "offer is no longer available",
            Self::RequestNotPending => "request is no longer pending",
            Self::AcceptanceRaceLost => "request was filled by a competing acceptance",
        };
        f.write_str(s)
    }
}

/// Failure kinds for matching operations.
///
/// All validation and state-precondition failures are detected and
/// returned synchronously; none are silently swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Referenced offer or request does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller lacks the required role or ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// State no longer matches the operation's precondition.
    #[error("conflict: {0}")]
    Conflict(ConflictReason),

    /// The (request, provider) pair already has an active offer.
    #[error("an active offer for this request already exists")]
    Duplicate,

    /// Malformed input: invalid delivery window or oversized message.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MatchError {
    /// Convenience constructor for missing entities.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Convenience constructor for role/ownership failures.
    pub fn forbidden(why: impl Into<String>) -> Self {
        Self::Forbidden(why.into())
    }

    /// Convenience constructor for malformed input.
    pub fn invalid(why: impl Into<String>) -> Self {
        Self::InvalidInput(why.into())
    }
}
