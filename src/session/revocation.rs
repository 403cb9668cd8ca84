// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Revocation coordinator.
//!
//! One entry point for every cascade: logout, successful login, successful
//! refresh, and the defensive path when a dead session is replayed. The
//! store-side `revoke_all` is idempotent, so firing the cascade against an
//! already-fully-revoked set is a no-op.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::gateways::{RefreshSessionStore, StoreError};

/// Why a cascade fired; carried into the log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationCause {
    /// Explicit logout.
    Logout,
    /// New login replaces any existing session.
    Login,
    /// Successful rotation replaces the current session.
    Rotation,
    /// A revoked session was presented again.
    RevokedReuse,
    /// An expired session was presented again.
    ExpiredReuse,
}

impl RevocationCause {
    fn as_str(&self) -> &'static str {
        match self {
            RevocationCause::Logout => "logout",
            RevocationCause::Login => "login",
            RevocationCause::Rotation => "rotation",
            RevocationCause::RevokedReuse => "revoked_reuse",
            RevocationCause::ExpiredReuse => "expired_reuse",
        }
    }

    /// Replay of a dead token is the strongest available compromise signal.
    fn is_defensive(&self) -> bool {
        matches!(
            self,
            RevocationCause::RevokedReuse | RevocationCause::ExpiredReuse
        )
    }
}

/// Cascades session invalidation for an identity.
#[derive(Clone)]
pub struct RevocationCoordinator {
    sessions: Arc<dyn RefreshSessionStore>,
}

impl RevocationCoordinator {
    pub fn new(sessions: Arc<dyn RefreshSessionStore>) -> Self {
        Self { sessions }
    }

    /// Mark every session of `identity_ident` revoked.
    ///
    /// Returns how many sessions changed state; zero means the set was
    /// already fully revoked.
    pub async fn revoke_all(
        &self,
        identity_ident: Uuid,
        cause: RevocationCause,
    ) -> Result<usize, StoreError> {
        let revoked = self.sessions.revoke_all(identity_ident).await?;

        if cause.is_defensive() {
            info!(
                identity = %identity_ident,
                cause = cause.as_str(),
                revoked,
                "defensive revocation cascade"
            );
        } else {
            debug!(
                identity = %identity_ident,
                cause = cause.as_str(),
                revoked,
                "revocation cascade"
            );
        }

        Ok(revoked)
    }
}
