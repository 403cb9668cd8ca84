// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Trait seams to the external collaborators.
//!
//! The core never owns durable state: identities, refresh sessions and
//! capability sets live behind the gateways defined here, and every durable
//! mutation executes inside the per-call [`UnitOfWork`]. In-memory
//! implementations for tests and embedded deployments live in
//! [`crate::store`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CapabilitySet, Identity, RefreshSession};

// =============================================================================
// Collaborator Errors
// =============================================================================

/// Failure raised by a backing store collaborator.
///
/// Timeouts on store calls are the collaborator's concern and must surface
/// here as explicit failures rather than hanging the call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Uniqueness or integrity constraint violated.
    #[error("store constraint violated: {0}")]
    Conflict(String),
    /// Row exists but cannot be decoded into the canonical schema.
    #[error("stored row malformed: {0}")]
    Malformed(String),
}

/// Failure raised by the cache gateway.
///
/// Advisory by definition: callers log and fall back to the authoritative
/// store, they never fail a request because of one of these.
#[derive(Debug, Error)]
#[error("cache failure: {0}")]
pub struct CacheError(pub String);

// =============================================================================
// Gateways
// =============================================================================

/// Read-only access to identities, owned by the identity service.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn get(&self, ident: Uuid) -> Result<Option<Identity>, StoreError>;

    async fn get_by_login(&self, login: &str) -> Result<Option<Identity>, StoreError>;
}

/// Durable store for refresh sessions.
///
/// Sessions are inserted and flipped to revoked, never deleted, by this
/// crate. `revoke_all` must be idempotent on an already-fully-revoked set.
#[async_trait]
pub trait RefreshSessionStore: Send + Sync {
    async fn insert(&self, session: &RefreshSession) -> Result<(), StoreError>;

    async fn get_by_ident(&self, ident: Uuid) -> Result<Option<RefreshSession>, StoreError>;

    /// Mark every session of `identity_ident` revoked, returning how many
    /// rows actually changed state.
    async fn revoke_all(&self, identity_ident: Uuid) -> Result<usize, StoreError>;
}

/// Read-only access to per-identity capability sets.
#[async_trait]
pub trait CapabilityGateway: Send + Sync {
    async fn get_by_identity(
        &self,
        identity_ident: Uuid,
    ) -> Result<Option<CapabilitySet>, StoreError>;
}

/// Keyed, TTL-bounded cache. Advisory only, never authoritative.
///
/// The TTL is fixed per gateway instance rather than per call, matching the
/// deployment model where one cache serves one core.
#[async_trait]
pub trait CacheGateway: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Password hashing seam. The algorithm is a collaborator choice; a SHA-256
/// reference implementation lives in [`crate::hasher`].
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> String;

    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Per-call transaction binding for durable mutations.
///
/// Every mutation sequence (revoke, insert) inside one call either commits
/// as a whole or rolls back as a whole, even if the caller cancels mid-flow.
/// A defensive revocation cascade commits independently of the failing call
/// that triggered it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn commit(&self) -> Result<(), StoreError>;

    async fn rollback(&self) -> Result<(), StoreError>;
}
