//! # aqua-core — Foundational Types for AquaMatch
//!
//! This crate is the bedrock of the AquaMatch workspace. It defines the
//! domain types shared by every other crate: identifier newtypes, the
//! request/offer records and their status enums, the typed platform
//! settings snapshot, and the matching error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `RequestId`, `OfferId`,
//!    `ProviderId`, `ConsumerId`, `ServiceAreaId` — all UUID newtypes.
//!    No bare strings or raw UUIDs for identifiers, so an offer id can
//!    never be passed where a request id is expected.
//!
//! 2. **Explicit typed records.** `WaterRequest` and `Offer` are fully
//!    typed structs validated at the boundary — no duck-typed row shapes.
//!
//! 3. **Single `PlatformSettings` snapshot.** Pricing and validity read
//!    one typed configuration object fetched at the moment of use, never
//!    ad hoc key/value lookups.
//!
//! 4. **Structured errors.** All operations surface a discriminated
//!    `MatchError`; callers never see panics or stringly-typed failures
//!    crossing the crate boundary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `aqua-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a boundary.

pub mod error;
pub mod identity;
pub mod offer;
pub mod provider;
pub mod request;
pub mod settings;

// Re-export primary types for ergonomic imports.
pub use error::{ConflictReason, MatchError};
pub use identity::{ConsumerId, OfferId, ProviderId, RequestId, ServiceAreaId};
pub use offer::{Offer, OfferStatus};
pub use provider::{ProviderProfile, ProviderStatus, VerificationStatus};
pub use request::{AmountTier, CallerIdentity, PaymentMethod, RequestStatus, WaterRequest};
pub use settings::PlatformSettings;
