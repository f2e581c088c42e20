//! # Provider Profile and Derived Status
//!
//! Providers must be verified, currently available, and have at least
//! one configured service area before they can see pending requests or
//! submit offers. `ProviderStatus` is the derived (never persisted)
//! composition of those three gates, returned alongside catalog results
//! so callers can render the correct ineligibility reason.

use serde::{Deserialize, Serialize};

use crate::identity::{ProviderId, ServiceAreaId};

/// Verification state of a provider account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Documents submitted, awaiting review.
    Pending,
    /// Verified and allowed to operate.
    Approved,
    /// Verification rejected.
    Rejected,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Persisted provider record, as the matching core sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Unique provider identifier.
    pub id: ProviderId,
    /// Display name for notifications and request detail views.
    pub name: String,
    /// Verification state; only `Approved` providers may offer.
    pub verification: VerificationStatus,
    /// Whether the provider is currently taking deliveries.
    pub available: bool,
    /// Service areas the provider covers.
    pub service_areas: Vec<ServiceAreaId>,
}

impl ProviderProfile {
    /// Derive the gating status used by the catalog and offer creation.
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            verified: self.verification == VerificationStatus::Approved,
            available: self.available,
            has_service_areas: !self.service_areas.is_empty(),
        }
    }

    /// Whether the provider covers the given service area.
    pub fn covers(&self, area: &ServiceAreaId) -> bool {
        self.service_areas.contains(area)
    }
}

/// Derived gating status — composition of verification, availability,
/// and service-area configuration. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Verification state is `Approved`.
    pub verified: bool,
    /// Availability flag is set.
    pub available: bool,
    /// At least one service area is configured.
    pub has_service_areas: bool,
}

impl ProviderStatus {
    /// Whether all gates pass: the provider may list and offer.
    pub fn eligible(&self) -> bool {
        self.verified && self.available && self.has_service_areas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(verification: VerificationStatus, available: bool, areas: usize) -> ProviderProfile {
        ProviderProfile {
            id: ProviderId::new(),
            name: "Aguatero Sur".to_string(),
            verification,
            available,
            service_areas: (0..areas).map(|_| ServiceAreaId::new()).collect(),
        }
    }

    #[test]
    fn test_fully_gated_provider_is_eligible() {
        let status = profile(VerificationStatus::Approved, true, 2).status();
        assert!(status.verified);
        assert!(status.available);
        assert!(status.has_service_areas);
        assert!(status.eligible());
    }

    #[test]
    fn test_each_failed_gate_blocks_eligibility() {
        assert!(!profile(VerificationStatus::Pending, true, 1).status().eligible());
        assert!(!profile(VerificationStatus::Rejected, true, 1).status().eligible());
        assert!(!profile(VerificationStatus::Approved, false, 1).status().eligible());
        assert!(!profile(VerificationStatus::Approved, true, 0).status().eligible());
    }

    #[test]
    fn test_covers_checks_membership() {
        let p = profile(VerificationStatus::Approved, true, 1);
        let area = p.service_areas[0];
        assert!(p.covers(&area));
        assert!(!p.covers(&ServiceAreaId::new()));
    }
}
