// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuer: mints paired refresh and access credentials.
//!
//! Issue order is fixed inside one unit of work: revoke everything live for
//! the identity, then mint and persist the replacement session, then mint
//! the access credential. Revoke-before-insert closes the window in which
//! two sessions could be simultaneously valid. If the insert fails nothing
//! is returned and the caller rolls the unit back.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::gateways::RefreshSessionStore;
use crate::models::{AccessCredential, Identity, RefreshSession};
use crate::session::revocation::{RevocationCause, RevocationCoordinator};
use crate::token::{truncate_to_micros, AccessClaims, RefreshClaims, TokenCodec};

/// Mints refresh sessions and access credentials for verified identities.
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn RefreshSessionStore>,
    revocation: RevocationCoordinator,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl SessionIssuer {
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn RefreshSessionStore>,
        revocation: RevocationCoordinator,
    ) -> Self {
        Self {
            codec,
            sessions,
            revocation,
            access_lifetime: config.access_lifetime,
            refresh_lifetime: config.refresh_lifetime,
        }
    }

    /// Issue a fresh session pair for `identity`, replacing any live session.
    ///
    /// Runs inside the caller's unit of work; all-or-nothing. `cause`
    /// distinguishes a first login from a rotation in the cascade log.
    pub async fn issue_for(
        &self,
        identity: &Identity,
        cause: RevocationCause,
    ) -> Result<(RefreshSession, AccessCredential), AuthError> {
        self.revocation.revoke_all(identity.ident, cause).await?;

        let session = self.mint_refresh(identity)?;
        self.sessions.insert(&session).await?;

        let access = self.mint_access(identity)?;
        Ok((session, access))
    }

    /// Mint an access credential without touching any store.
    pub fn mint_access(&self, identity: &Identity) -> Result<AccessCredential, AuthError> {
        let issued_at = truncate_to_micros(Utc::now());
        let claims = AccessClaims {
            identity_ident: identity.ident,
            issued_at,
            expires_at: issued_at + self.access_lifetime,
        };
        let token = self.codec.issue_access(&claims)?;

        Ok(AccessCredential {
            token,
            identity_ident: claims.identity_ident,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }

    fn mint_refresh(&self, identity: &Identity) -> Result<RefreshSession, AuthError> {
        let issued_at = truncate_to_micros(Utc::now());
        let claims = RefreshClaims {
            session_ident: Uuid::new_v4(),
            identity_ident: identity.ident,
            issued_at,
            expires_at: issued_at + self.refresh_lifetime,
        };
        let token = self.codec.issue_refresh(&claims)?;

        Ok(RefreshSession {
            ident: claims.session_ident,
            identity_ident: claims.identity_ident,
            token,
            revoked: false,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAuthStore;

    fn identity() -> Identity {
        let now = Utc::now();
        Identity {
            ident: Uuid::new_v4(),
            login: "alice".to_string(),
            credential_digest: "digest".to_string(),
            superuser: false,
            registered_at: now,
            updated_at: now,
            last_login_at: now,
        }
    }

    fn issuer(store: Arc<InMemoryAuthStore>) -> SessionIssuer {
        let config = AuthConfig::new("issuer-test-secret");
        let codec = Arc::new(TokenCodec::new(&config.secret));
        let revocation = RevocationCoordinator::new(store.clone());
        SessionIssuer::new(&config, codec, store, revocation)
    }

    #[tokio::test]
    async fn issue_persists_exactly_one_live_session() {
        let store = Arc::new(InMemoryAuthStore::new());
        let issuer = issuer(store.clone());
        let identity = identity();

        let (session, access) = issuer
            .issue_for(&identity, RevocationCause::Login)
            .await
            .unwrap();

        assert_eq!(session.identity_ident, identity.ident);
        assert!(!session.revoked);
        assert_eq!(access.identity_ident, identity.ident);
        assert_eq!(store.active_session_count(identity.ident).await, 1);

        let stored = store.get_by_ident(session.ident).await.unwrap().unwrap();
        assert_eq!(stored, session);
    }

    #[tokio::test]
    async fn reissue_revokes_the_previous_session_first() {
        let store = Arc::new(InMemoryAuthStore::new());
        let issuer = issuer(store.clone());
        let identity = identity();

        let (first, _) = issuer
            .issue_for(&identity, RevocationCause::Login)
            .await
            .unwrap();
        let (second, _) = issuer
            .issue_for(&identity, RevocationCause::Login)
            .await
            .unwrap();

        assert_ne!(first.ident, second.ident);
        assert_eq!(store.active_session_count(identity.ident).await, 1);
        assert!(store.get_by_ident(first.ident).await.unwrap().unwrap().revoked);
        assert!(!store.get_by_ident(second.ident).await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn session_token_round_trips_to_the_stored_values() {
        let store = Arc::new(InMemoryAuthStore::new());
        let config = AuthConfig::new("issuer-test-secret");
        let codec = Arc::new(TokenCodec::new(&config.secret));
        let issuer = SessionIssuer::new(
            &config,
            codec.clone(),
            store.clone(),
            RevocationCoordinator::new(store.clone()),
        );

        let (session, _) = issuer
            .issue_for(&identity(), RevocationCause::Login)
            .await
            .unwrap();

        let claims = codec.verify_refresh(&session.token).unwrap();
        assert_eq!(claims.session_ident, session.ident);
        assert_eq!(claims.identity_ident, session.identity_ident);
        assert_eq!(claims.issued_at, session.issued_at);
        assert_eq!(claims.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn insert_failure_yields_no_tokens() {
        let store = Arc::new(InMemoryAuthStore::new());
        store.fail_next_insert().await;
        let issuer = issuer(store.clone());
        let identity = identity();

        let result = issuer.issue_for(&identity, RevocationCause::Login).await;
        assert!(matches!(result, Err(AuthError::Store(_))));
        assert_eq!(store.active_session_count(identity.ident).await, 0);
    }
}
