// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory gateway implementations.
//!
//! One store backs all three entity gateways plus a no-op unit of work.
//! Used by the test suite and by embedded deployments that do not need a
//! durable store. Failure injection hooks exist so tests can exercise the
//! all-or-nothing paths without a real database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::gateways::{
    CapabilityGateway, IdentityGateway, RefreshSessionStore, StoreError, UnitOfWork,
};
use crate::models::{CapabilitySet, Identity, RefreshSession};

/// In-memory identity, session and capability store.
#[derive(Default)]
pub struct InMemoryAuthStore {
    identities: RwLock<HashMap<Uuid, Identity>>,
    sessions: RwLock<HashMap<Uuid, RefreshSession>>,
    capabilities: RwLock<HashMap<Uuid, CapabilitySet>>,
    fail_next_insert: AtomicBool,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity.
    pub async fn insert_identity(&self, identity: Identity) {
        self.identities
            .write()
            .await
            .insert(identity.ident, identity);
    }

    /// Provision or replace a capability set.
    pub async fn upsert_capabilities(&self, capabilities: CapabilitySet) {
        self.capabilities
            .write()
            .await
            .insert(capabilities.identity_ident, capabilities);
    }

    /// Drop the capability set for an identity.
    pub async fn remove_capabilities(&self, identity_ident: Uuid) {
        self.capabilities.write().await.remove(&identity_ident);
    }

    /// Number of non-revoked sessions currently held for an identity.
    pub async fn active_session_count(&self, identity_ident: Uuid) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|session| session.identity_ident == identity_ident && !session.revoked)
            .count()
    }

    /// Make the next `insert` fail with a conflict.
    pub async fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Overwrite a stored session in place, for fixtures that need to age
    /// or revoke a session directly.
    pub async fn put_session_raw(&self, session: RefreshSession) {
        self.sessions.write().await.insert(session.ident, session);
    }
}

#[async_trait]
impl IdentityGateway for InMemoryAuthStore {
    async fn get(&self, ident: Uuid) -> Result<Option<Identity>, StoreError> {
        Ok(self.identities.read().await.get(&ident).cloned())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.login == login)
            .cloned())
    }
}

#[async_trait]
impl RefreshSessionStore for InMemoryAuthStore {
    async fn insert(&self, session: &RefreshSession) -> Result<(), StoreError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected insert failure".to_string()));
        }

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.ident) {
            return Err(StoreError::Conflict(format!(
                "session {} already exists",
                session.ident
            )));
        }
        sessions.insert(session.ident, session.clone());
        Ok(())
    }

    async fn get_by_ident(&self, ident: Uuid) -> Result<Option<RefreshSession>, StoreError> {
        Ok(self.sessions.read().await.get(&ident).cloned())
    }

    async fn revoke_all(&self, identity_ident: Uuid) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write().await;
        let mut revoked = 0;
        for session in sessions.values_mut() {
            if session.identity_ident == identity_ident && !session.revoked {
                session.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

#[async_trait]
impl CapabilityGateway for InMemoryAuthStore {
    async fn get_by_identity(
        &self,
        identity_ident: Uuid,
    ) -> Result<Option<CapabilitySet>, StoreError> {
        Ok(self.capabilities.read().await.get(&identity_ident).cloned())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryAuthStore {
    // In-memory mutations are immediately visible; commit and rollback are
    // transaction hooks for durable stores.
    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(identity_ident: Uuid) -> RefreshSession {
        let now = Utc::now();
        RefreshSession {
            ident: Uuid::new_v4(),
            identity_ident,
            token: "t".to_string(),
            revoked: false,
            issued_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn duplicate_session_ident_conflicts() {
        let store = InMemoryAuthStore::new();
        let s = session(Uuid::new_v4());
        store.insert(&s).await.unwrap();
        assert!(matches!(
            store.insert(&s).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn revoke_all_touches_only_live_sessions() {
        let store = InMemoryAuthStore::new();
        let identity = Uuid::new_v4();
        store.insert(&session(identity)).await.unwrap();

        let mut dead = session(identity);
        dead.revoked = true;
        store.put_session_raw(dead).await;

        assert_eq!(store.revoke_all(identity).await.unwrap(), 1);
        assert_eq!(store.revoke_all(identity).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_by_login_finds_the_identity() {
        let store = InMemoryAuthStore::new();
        let now = Utc::now();
        let identity = Identity {
            ident: Uuid::new_v4(),
            login: "alice".to_string(),
            credential_digest: "d".to_string(),
            superuser: false,
            registered_at: now,
            updated_at: now,
            last_login_at: now,
        };
        store.insert_identity(identity.clone()).await;

        let found = store.get_by_login("alice").await.unwrap().unwrap();
        assert_eq!(found, identity);
        assert!(store.get_by_login("bob").await.unwrap().is_none());
    }
}
