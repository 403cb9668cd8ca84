// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for the credential and access-control core.
//!
//! Every failure is surfaced as a distinct, stable code; nothing collapses
//! into a generic error. Integration faults (caller or provisioning defects)
//! are additionally logged server-side at the point they are detected.
//! Retry policy belongs to the transport layer, nothing here retries.

use thiserror::Error;
use uuid::Uuid;

use crate::gateways::{CacheError, StoreError};

/// Taxonomy class an [`AuthError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identity or session absent from the authoritative store.
    NotFound,
    /// Bad credential, or a tampered/malformed token.
    Invalid,
    /// Session exists but is revoked or expired.
    StateConflict,
    /// Caller/integration defect or provisioning inconsistency.
    IntegrationFault,
    /// Backing store failure surfaced by a collaborator.
    Store,
}

/// Error type for every operation exposed by this crate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity matches the presented login or ident.
    #[error("identity not found")]
    IdentityNotFound,

    /// Password does not match the stored credential digest.
    #[error("invalid password")]
    BadCredential,

    /// Token failed signature verification, is malformed, or was signed
    /// with the wrong algorithm. No claim extracted from it may be trusted.
    #[error("invalid token")]
    InvalidToken,

    /// Refresh session ident is not resolvable in the session store.
    #[error("refresh session not found")]
    SessionNotFound,

    /// Refresh session exists but has been revoked. Presenting it triggers
    /// the defensive revocation cascade before this error is reported.
    #[error("refresh session revoked")]
    SessionRevoked,

    /// Refresh session exists, is not revoked, but is past its expiry.
    /// Also triggers the defensive cascade.
    #[error("refresh session expired")]
    SessionExpired,

    /// No capability set is provisioned for an otherwise-valid identity.
    /// A provisioning inconsistency, not a user error.
    #[error("no capability set provisioned for identity {identity_ident}")]
    CapabilitySetMissing { identity_ident: Uuid },

    /// The caller did not forward the verb or resource path the permission
    /// resolver needs. A caller defect, never a deny.
    #[error("request is missing verb/resource-path routing metadata")]
    MissingRoutingMetadata,

    /// Failure inside a backing store collaborator.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::IdentityNotFound => "identity_not_found",
            AuthError::BadCredential => "bad_credential",
            AuthError::InvalidToken => "invalid_token",
            AuthError::SessionNotFound => "session_not_found",
            AuthError::SessionRevoked => "session_revoked",
            AuthError::SessionExpired => "session_expired",
            AuthError::CapabilitySetMissing { .. } => "capability_set_missing",
            AuthError::MissingRoutingMetadata => "missing_routing_metadata",
            AuthError::Store(_) => "store_failure",
        }
    }

    /// Taxonomy class for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::IdentityNotFound | AuthError::SessionNotFound => ErrorKind::NotFound,
            AuthError::BadCredential | AuthError::InvalidToken => ErrorKind::Invalid,
            AuthError::SessionRevoked | AuthError::SessionExpired => ErrorKind::StateConflict,
            AuthError::CapabilitySetMissing { .. } | AuthError::MissingRoutingMetadata => {
                ErrorKind::IntegrationFault
            }
            AuthError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<CacheError> for AuthError {
    /// Cache failures must never fail a request on their own; the
    /// conversion exists for callers outside this crate that treat the
    /// cache as a hard dependency (none inside this crate does).
    fn from(err: CacheError) -> Self {
        AuthError::Store(StoreError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_stable() {
        let errors = [
            AuthError::IdentityNotFound,
            AuthError::BadCredential,
            AuthError::InvalidToken,
            AuthError::SessionNotFound,
            AuthError::SessionRevoked,
            AuthError::SessionExpired,
            AuthError::CapabilitySetMissing {
                identity_ident: Uuid::nil(),
            },
            AuthError::MissingRoutingMetadata,
            AuthError::Store(StoreError::Unavailable("down".to_string())),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.error_code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn taxonomy_classes_match_the_design() {
        assert_eq!(AuthError::IdentityNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AuthError::InvalidToken.kind(), ErrorKind::Invalid);
        assert_eq!(AuthError::SessionRevoked.kind(), ErrorKind::StateConflict);
        assert_eq!(AuthError::SessionExpired.kind(), ErrorKind::StateConflict);
        assert_eq!(
            AuthError::MissingRoutingMetadata.kind(),
            ErrorKind::IntegrationFault
        );
        assert_eq!(
            AuthError::CapabilitySetMissing {
                identity_ident: Uuid::nil()
            }
            .kind(),
            ErrorKind::IntegrationFault
        );
    }
}
