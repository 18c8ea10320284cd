//! Validation verdict and resolved caller identity

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

/// Outcome of validating a raw API key. Produced fresh per call and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The key is valid; carries the resolved identity
    Valid(AuthIdentity),
    /// The key was rejected
    Invalid(RejectReason),
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The rejection reason, if any
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }

    /// The resolved identity, if the verdict is valid
    pub fn identity(&self) -> Option<&AuthIdentity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::Invalid(_) => None,
        }
    }
}

/// Identity resolved from a validated API key, attached to the request for
/// downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// The client owning the key
    pub client_id: Uuid,
    /// The key that authenticated the call
    pub key_id: Uuid,
    /// Permission scopes granted to the key
    pub permissions: HashSet<String>,
}

impl AuthIdentity {
    /// Exact-match scope check against the key that authenticated the call
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Coarse reason taxonomy surfaced to callers on rejection. Internal failure
/// detail (e.g. which storage call broke) never reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No credential present in header or query
    MissingKey,
    /// No record matches the presented key
    InvalidKey,
    /// The key exists but has been revoked
    Revoked,
    /// The key exists but its expiry has passed
    Expired,
    /// Validation could not complete; fail closed
    ValidationError,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => write!(f, "missing key"),
            Self::InvalidKey => write!(f, "invalid key"),
            Self::Revoked => write!(f, "revoked"),
            Self::Expired => write!(f, "expired"),
            Self::ValidationError => write!(f, "validation error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity() -> AuthIdentity {
        AuthIdentity {
            client_id: Uuid::new_v4(),
            key_id: Uuid::new_v4(),
            permissions: ["email:extract".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_valid_verdict() {
        let identity = test_identity();
        let verdict = ValidationVerdict::Valid(identity.clone());

        assert!(verdict.is_valid());
        assert_eq!(verdict.reason(), None);
        assert_eq!(verdict.identity(), Some(&identity));
    }

    #[test]
    fn test_invalid_verdict() {
        let verdict = ValidationVerdict::Invalid(RejectReason::Revoked);

        assert!(!verdict.is_valid());
        assert_eq!(verdict.reason(), Some(RejectReason::Revoked));
        assert!(verdict.identity().is_none());
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::MissingKey.to_string(), "missing key");
        assert_eq!(RejectReason::InvalidKey.to_string(), "invalid key");
        assert_eq!(RejectReason::Revoked.to_string(), "revoked");
        assert_eq!(RejectReason::Expired.to_string(), "expired");
        assert_eq!(RejectReason::ValidationError.to_string(), "validation error");
    }

    #[test]
    fn test_identity_permission_check() {
        let identity = test_identity();

        assert!(identity.has_permission("email:extract"));
        assert!(!identity.has_permission("invoice:parse"));
        // Case-sensitive exact match
        assert!(!identity.has_permission("EMAIL:EXTRACT"));
    }
}
