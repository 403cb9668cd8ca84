// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service facade over the token lifecycle and the permission engine.
//!
//! One [`AuthService`] per deployment; every inbound call is handled by an
//! independent worker borrowing it. The only shared state is the immutable
//! signing secret and the stateless routing tables, so no locking happens
//! on any call path. Durable mutations run inside the per-call
//! [`UnitOfWork`]: full commit or full rollback, never a partial sequence,
//! even if the caller cancels mid-flow.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::authz::{self, Decision};
use crate::cache::{capabilities_key, identity_key, CacheAside, InMemoryCache};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::gateways::{
    CacheGateway, CapabilityGateway, CredentialHasher, IdentityGateway, RefreshSessionStore,
    UnitOfWork,
};
use crate::hasher::Sha256CredentialHasher;
use crate::models::{AccessCredential, CapabilitySet, Identity, RefreshSession};
use crate::session::revocation::RevocationCause;
use crate::session::{classify, RevocationCoordinator, SessionIssuer, SessionState};
use crate::store::InMemoryAuthStore;
use crate::token::TokenCodec;

/// External collaborators the service is wired with.
pub struct Collaborators {
    pub identities: Arc<dyn IdentityGateway>,
    pub sessions: Arc<dyn RefreshSessionStore>,
    pub capabilities: Arc<dyn CapabilityGateway>,
    pub cache: Arc<dyn CacheGateway>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub uow: Arc<dyn UnitOfWork>,
}

/// Credential issuance, session revocation and authorization decisions.
pub struct AuthService {
    identities: Arc<dyn IdentityGateway>,
    sessions: Arc<dyn RefreshSessionStore>,
    capabilities: Arc<dyn CapabilityGateway>,
    hasher: Arc<dyn CredentialHasher>,
    uow: Arc<dyn UnitOfWork>,
    codec: Arc<TokenCodec>,
    issuer: SessionIssuer,
    revocation: RevocationCoordinator,
    cache: CacheAside,
}

impl AuthService {
    pub fn new(config: &AuthConfig, collaborators: Collaborators) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.secret));
        let revocation = RevocationCoordinator::new(collaborators.sessions.clone());
        let issuer = SessionIssuer::new(
            config,
            codec.clone(),
            collaborators.sessions.clone(),
            revocation.clone(),
        );

        Self {
            identities: collaborators.identities,
            sessions: collaborators.sessions,
            capabilities: collaborators.capabilities,
            hasher: collaborators.hasher,
            uow: collaborators.uow,
            codec,
            issuer,
            revocation,
            cache: CacheAside::new(collaborators.cache),
        }
    }

    /// Service backed entirely by in-memory collaborators.
    ///
    /// The returned store handle is the fixture side: register identities
    /// and capability sets through it.
    pub fn in_memory(config: &AuthConfig) -> (Self, Arc<InMemoryAuthStore>) {
        let store = Arc::new(InMemoryAuthStore::new());
        let service = Self::new(
            config,
            Collaborators {
                identities: store.clone(),
                sessions: store.clone(),
                capabilities: store.clone(),
                cache: Arc::new(InMemoryCache::new(config.cache_capacity, config.cache_ttl)),
                hasher: Arc::new(Sha256CredentialHasher),
                uow: store.clone(),
            },
        );
        (service, store)
    }

    // =========================================================================
    // Token Lifecycle
    // =========================================================================

    /// Verify a password and issue a fresh session pair.
    ///
    /// Any live session for the identity is revoked before the new one is
    /// inserted (single-active-session), all inside one unit of work.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(RefreshSession, AccessCredential), AuthError> {
        let identity = self
            .identities
            .get_by_login(login)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        if !self.hasher.verify(password, &identity.credential_digest) {
            return Err(AuthError::BadCredential);
        }

        match self.issuer.issue_for(&identity, RevocationCause::Login).await {
            Ok(pair) => {
                self.uow.commit().await?;
                info!(identity = %identity.ident, session = %pair.0.ident, "session issued");
                Ok(pair)
            }
            Err(err) => Err(self.abort(err).await),
        }
    }

    /// Validate a presented refresh session and mint a new access
    /// credential for its owner.
    ///
    /// Replay of a revoked or expired session triggers the defensive
    /// cascade for the identity before the error is reported.
    pub async fn authenticate(
        &self,
        session: &RefreshSession,
    ) -> Result<AccessCredential, AuthError> {
        let identity = self
            .identities
            .get(session.identity_ident)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        let stored = self.sessions.get_by_ident(session.ident).await?;
        match classify(stored.as_ref(), Utc::now()) {
            SessionState::NotFound => Err(AuthError::SessionNotFound),
            SessionState::Revoked => {
                self.defensive_cascade(identity.ident, RevocationCause::RevokedReuse)
                    .await;
                Err(AuthError::SessionRevoked)
            }
            SessionState::Expired => {
                self.defensive_cascade(identity.ident, RevocationCause::ExpiredReuse)
                    .await;
                Err(AuthError::SessionExpired)
            }
            SessionState::Valid => {
                let access = self.issuer.mint_access(&identity)?;
                self.uow.commit().await?;
                Ok(access)
            }
        }
    }

    /// Rotate a validated refresh session into a fresh pair.
    ///
    /// Same validation as [`authenticate`](Self::authenticate); on success
    /// the presented session is revoked and replaced within one unit of
    /// work.
    pub async fn refresh(
        &self,
        session: &RefreshSession,
    ) -> Result<(RefreshSession, AccessCredential), AuthError> {
        let identity = self
            .identities
            .get(session.identity_ident)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        let stored = self.sessions.get_by_ident(session.ident).await?;
        match classify(stored.as_ref(), Utc::now()) {
            SessionState::NotFound => Err(AuthError::SessionNotFound),
            SessionState::Revoked => {
                self.defensive_cascade(identity.ident, RevocationCause::RevokedReuse)
                    .await;
                Err(AuthError::SessionRevoked)
            }
            SessionState::Expired => {
                self.defensive_cascade(identity.ident, RevocationCause::ExpiredReuse)
                    .await;
                Err(AuthError::SessionExpired)
            }
            SessionState::Valid => {
                match self
                    .issuer
                    .issue_for(&identity, RevocationCause::Rotation)
                    .await
                {
                    Ok(pair) => {
                        self.uow.commit().await?;
                        info!(identity = %identity.ident, session = %pair.0.ident, "session rotated");
                        Ok(pair)
                    }
                    Err(err) => Err(self.abort(err).await),
                }
            }
        }
    }

    /// Revoke every session of the presented session's owner.
    pub async fn logout(&self, session: &RefreshSession) -> Result<(), AuthError> {
        match self
            .revocation
            .revoke_all(session.identity_ident, RevocationCause::Logout)
            .await
        {
            Ok(_) => {
                self.uow.commit().await?;
                Ok(())
            }
            Err(err) => Err(self.abort(err.into()).await),
        }
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Decide whether `credential` authorizes `verb` on `resource_path`.
    ///
    /// The capability set is read through the cache-aside layer; cache
    /// trouble falls back to the authoritative gateway and never turns into
    /// a deny.
    pub async fn authorize(
        &self,
        credential: &AccessCredential,
        verb: Option<&str>,
        resource_path: Option<&str>,
    ) -> Result<Decision, AuthError> {
        let capability_set = self
            .capability_set(credential.identity_ident)
            .await?
            .ok_or_else(|| {
                warn!(
                    identity = %credential.identity_ident,
                    "no capability set provisioned for identity"
                );
                AuthError::CapabilitySetMissing {
                    identity_ident: credential.identity_ident,
                }
            })?;

        authz::authorize(&capability_set, credential, verb, resource_path, Utc::now())
    }

    /// Capability set for an identity, via the cache-aside layer.
    pub async fn capability_set(
        &self,
        identity_ident: Uuid,
    ) -> Result<Option<CapabilitySet>, AuthError> {
        let key = capabilities_key(identity_ident);
        let loaded = self
            .cache
            .get_or_load(&key, || async {
                self.capabilities.get_by_identity(identity_ident).await
            })
            .await?;
        Ok(loaded)
    }

    /// Identity record, via the cache-aside layer.
    pub async fn get_identity(&self, ident: Uuid) -> Result<Option<Identity>, AuthError> {
        let key = identity_key(ident);
        let loaded = self
            .cache
            .get_or_load(&key, || async { self.identities.get(ident).await })
            .await?;
        Ok(loaded)
    }

    /// Force the next capability read for an identity to hit the
    /// authoritative gateway. Used after a permission edit to tighten the
    /// staleness window below one TTL.
    pub async fn invalidate_capability_cache(&self, identity_ident: Uuid) {
        self.cache.invalidate(&capabilities_key(identity_ident)).await;
    }

    // =========================================================================
    // Token Resolution
    // =========================================================================

    /// Resolve a raw refresh token to its authoritative session row.
    ///
    /// The claims only name the session; the store row decides revocation
    /// and expiry state.
    pub async fn resolve_refresh_session(
        &self,
        token: &str,
    ) -> Result<RefreshSession, AuthError> {
        let claims = self.codec.verify_refresh(token)?;
        self.sessions
            .get_by_ident(claims.session_ident)
            .await?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Resolve a raw access token to a credential.
    ///
    /// Pure signature verification; expiry is judged later, at the point of
    /// use.
    pub fn resolve_access_credential(&self, token: &str) -> Result<AccessCredential, AuthError> {
        let claims = self.codec.verify_access(token)?;
        Ok(AccessCredential {
            token: token.to_string(),
            identity_ident: claims.identity_ident,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Roll the unit of work back after a failed mutation sequence.
    async fn abort(&self, err: AuthError) -> AuthError {
        if let Err(rollback_err) = self.uow.rollback().await {
            warn!(error = %rollback_err, "rollback failed after aborted unit of work");
        }
        err
    }

    /// Run the defensive cascade for a replayed dead session.
    ///
    /// The failure report and the cascade are independent outcomes: the
    /// cascade commits even though the overall call fails, and a cascade
    /// failure is logged rather than masking the original error.
    async fn defensive_cascade(&self, identity_ident: Uuid, cause: RevocationCause) {
        match self.revocation.revoke_all(identity_ident, cause).await {
            Ok(_) => {
                if let Err(err) = self.uow.commit().await {
                    warn!(identity = %identity_ident, error = %err, "defensive cascade commit failed");
                }
            }
            Err(err) => {
                warn!(identity = %identity_ident, error = %err, "defensive cascade failed");
            }
        }
    }
}
