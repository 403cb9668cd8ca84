// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication state machine over a presented refresh session.
//!
//! Fixed transition priority: existence before revocation before expiry.
//! A revoked session that is also expired still classifies as `Revoked`, so
//! the defensive cascade fires on the strongest signal. All states are
//! terminal.

use chrono::{DateTime, Utc};

use crate::models::RefreshSession;

/// Terminal classification of a presented refresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session ident not resolvable in the store.
    NotFound,
    /// Session resolvable and flagged revoked.
    Revoked,
    /// Session resolvable, not revoked, past its expiry.
    Expired,
    /// Session resolvable, live, within its lifetime.
    Valid,
}

/// Classify a store lookup result at instant `now`.
pub fn classify(session: Option<&RefreshSession>, now: DateTime<Utc>) -> SessionState {
    match session {
        None => SessionState::NotFound,
        Some(session) if session.revoked => SessionState::Revoked,
        Some(session) if session.expired(now) => SessionState::Expired,
        Some(_) => SessionState::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn session(revoked: bool, expires_in: Duration) -> RefreshSession {
        let now = Utc::now();
        RefreshSession {
            ident: Uuid::new_v4(),
            identity_ident: Uuid::new_v4(),
            token: "t".to_string(),
            revoked,
            issued_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn missing_session_is_not_found() {
        assert_eq!(classify(None, Utc::now()), SessionState::NotFound);
    }

    #[test]
    fn live_session_is_valid() {
        let s = session(false, Duration::hours(1));
        assert_eq!(classify(Some(&s), Utc::now()), SessionState::Valid);
    }

    #[test]
    fn revoked_session_is_revoked() {
        let s = session(true, Duration::hours(1));
        assert_eq!(classify(Some(&s), Utc::now()), SessionState::Revoked);
    }

    #[test]
    fn expired_session_is_expired() {
        let s = session(false, Duration::seconds(-1));
        assert_eq!(classify(Some(&s), Utc::now()), SessionState::Expired);
    }

    #[test]
    fn revocation_outranks_expiry() {
        // A token that is both revoked and expired reports revoked, so the
        // reuse cascade always fires for it.
        let s = session(true, Duration::seconds(-1));
        assert_eq!(classify(Some(&s), Utc::now()), SessionState::Revoked);
    }
}
