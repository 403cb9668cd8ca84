// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Core Data Model
//!
//! Entities shared by the token lifecycle and the permission engine.
//!
//! ## Model Categories
//!
//! - **Identity**: a registered principal, owned by the identity gateway and
//!   read-only inside this crate
//! - **AccessCredential**: short-lived bearer token, never persisted
//! - **RefreshSession**: store-tracked session record used to mint new
//!   access credentials without re-entering a password
//! - **CapabilitySet**: per-identity table of allow/deny flags keyed by
//!   (resource domain, verb)
//!
//! The capability flags form a closed set: four resource domains times four
//! verbs, each an individually addressable boolean. There is no wildcard and
//! no inherited permission; superuser is the only bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Identity
// =============================================================================

/// A registered principal capable of authenticating.
///
/// Owned by the identity gateway; this crate only ever reads it. The
/// `credential_digest` is produced by the collaborator-chosen hasher and is
/// opaque here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Unique identity identifier.
    pub ident: Uuid,
    /// Login name, unique across identities.
    pub login: String,
    /// Hashed password digest (algorithm chosen by the hasher collaborator).
    pub credential_digest: String,
    /// Superuser flag, mirrored into the capability set.
    pub superuser: bool,
    /// When the identity was registered.
    pub registered_at: DateTime<Utc>,
    /// When the identity record was last modified.
    pub updated_at: DateTime<Utc>,
    /// When the identity last logged in.
    pub last_login_at: DateTime<Utc>,
}

// =============================================================================
// Access Credential
// =============================================================================

/// Short-lived bearer credential proving a verified identity.
///
/// Never persisted: it is reconstructed purely by verifying the token
/// signature and comparing expiry, never looked up by key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessCredential {
    /// Signed bearer token.
    pub token: String,
    /// Identity this credential was issued to.
    pub identity_ident: Uuid,
    /// When the credential was issued (microsecond precision).
    pub issued_at: DateTime<Utc>,
    /// When the credential stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AccessCredential {
    /// Whether the credential is past its expiry at `now`.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// Refresh Session
// =============================================================================

/// Store-tracked session record behind the refresh token.
///
/// Invariant: at most one non-revoked session exists per identity at any
/// time (single-active-session policy). Sessions are revoked, never deleted,
/// by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshSession {
    /// Unique session identifier, embedded in the refresh token claims.
    pub ident: Uuid,
    /// Identity that owns this session.
    pub identity_ident: Uuid,
    /// Signed refresh token.
    pub token: String,
    /// Set on logout, re-authentication or defensive cascade.
    pub revoked: bool,
    /// When the session was created (microsecond precision).
    pub issued_at: DateTime<Utc>,
    /// When the session stops being refreshable.
    pub expires_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Whether the session is past its expiry at `now`.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// =============================================================================
// Resource Domains & Verbs
// =============================================================================

/// Coarse resource domain a request path resolves to.
///
/// The set is closed: unknown paths resolve to no domain and are denied by
/// default in the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Personnel certification records (`/v1/personnel-certification`).
    PersonnelCertification,
    /// Personnel records (`/v1/personnel`).
    Personnel,
    /// Inspection reports (`/v1/inspection`).
    Inspection,
    /// Equipment registry (`/v1/equipment`).
    Equipment,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::PersonnelCertification => write!(f, "personnel-certification"),
            Domain::Personnel => write!(f, "personnel"),
            Domain::Inspection => write!(f, "inspection"),
            Domain::Equipment => write!(f, "equipment"),
        }
    }
}

/// Action verb a capability flag is keyed on.
///
/// Each verb corresponds to exactly one HTTP method in the routing table;
/// methods outside the table map to no verb and are denied by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "get"),
            Verb::Create => write!(f, "create"),
            Verb::Update => write!(f, "update"),
            Verb::Delete => write!(f, "delete"),
        }
    }
}

// =============================================================================
// Capability Set
// =============================================================================

/// Per-identity table of fine-grained allow/deny flags.
///
/// One boolean per (domain, verb) pair, matching the persisted column layout
/// one to one. Divergent gateway shapes (missing or extra fields) are a
/// provisioning fault surfaced by the caller, not handled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilitySet {
    /// Identity this capability set belongs to (keyed back-reference).
    pub identity_ident: Uuid,
    /// Bypasses every flag check when set.
    pub is_superuser: bool,

    pub personnel_certification_get: bool,
    pub personnel_certification_create: bool,
    pub personnel_certification_update: bool,
    pub personnel_certification_delete: bool,

    pub personnel_get: bool,
    pub personnel_create: bool,
    pub personnel_update: bool,
    pub personnel_delete: bool,

    pub inspection_get: bool,
    pub inspection_create: bool,
    pub inspection_update: bool,
    pub inspection_delete: bool,

    pub equipment_get: bool,
    pub equipment_create: bool,
    pub equipment_update: bool,
    pub equipment_delete: bool,
}

impl CapabilitySet {
    /// Look up the flag for a (domain, verb) pair.
    ///
    /// The match is exhaustive over the closed flag set, so an unknown
    /// combination cannot silently appear at runtime. Superuser bypass is the
    /// resolver's concern, not this lookup's.
    pub fn allows(&self, domain: Domain, verb: Verb) -> bool {
        match (domain, verb) {
            (Domain::PersonnelCertification, Verb::Get) => self.personnel_certification_get,
            (Domain::PersonnelCertification, Verb::Create) => self.personnel_certification_create,
            (Domain::PersonnelCertification, Verb::Update) => self.personnel_certification_update,
            (Domain::PersonnelCertification, Verb::Delete) => self.personnel_certification_delete,
            (Domain::Personnel, Verb::Get) => self.personnel_get,
            (Domain::Personnel, Verb::Create) => self.personnel_create,
            (Domain::Personnel, Verb::Update) => self.personnel_update,
            (Domain::Personnel, Verb::Delete) => self.personnel_delete,
            (Domain::Inspection, Verb::Get) => self.inspection_get,
            (Domain::Inspection, Verb::Create) => self.inspection_create,
            (Domain::Inspection, Verb::Update) => self.inspection_update,
            (Domain::Inspection, Verb::Delete) => self.inspection_delete,
            (Domain::Equipment, Verb::Get) => self.equipment_get,
            (Domain::Equipment, Verb::Create) => self.equipment_create,
            (Domain::Equipment, Verb::Update) => self.equipment_update,
            (Domain::Equipment, Verb::Delete) => self.equipment_delete,
        }
    }

    /// Capability set for an identity with every flag cleared.
    pub fn none_for(identity_ident: Uuid) -> Self {
        Self {
            identity_ident,
            ..Self::default()
        }
    }

    /// Set a single (domain, verb) flag, returning the modified set.
    ///
    /// Mainly useful for provisioning fixtures and tests.
    pub fn with_flag(mut self, domain: Domain, verb: Verb, value: bool) -> Self {
        let slot = match (domain, verb) {
            (Domain::PersonnelCertification, Verb::Get) => &mut self.personnel_certification_get,
            (Domain::PersonnelCertification, Verb::Create) => {
                &mut self.personnel_certification_create
            }
            (Domain::PersonnelCertification, Verb::Update) => {
                &mut self.personnel_certification_update
            }
            (Domain::PersonnelCertification, Verb::Delete) => {
                &mut self.personnel_certification_delete
            }
            (Domain::Personnel, Verb::Get) => &mut self.personnel_get,
            (Domain::Personnel, Verb::Create) => &mut self.personnel_create,
            (Domain::Personnel, Verb::Update) => &mut self.personnel_update,
            (Domain::Personnel, Verb::Delete) => &mut self.personnel_delete,
            (Domain::Inspection, Verb::Get) => &mut self.inspection_get,
            (Domain::Inspection, Verb::Create) => &mut self.inspection_create,
            (Domain::Inspection, Verb::Update) => &mut self.inspection_update,
            (Domain::Inspection, Verb::Delete) => &mut self.inspection_delete,
            (Domain::Equipment, Verb::Get) => &mut self.equipment_get,
            (Domain::Equipment, Verb::Create) => &mut self.equipment_create,
            (Domain::Equipment, Verb::Update) => &mut self.equipment_update,
            (Domain::Equipment, Verb::Delete) => &mut self.equipment_delete,
        };
        *slot = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_reads_the_matching_flag() {
        let ident = Uuid::new_v4();
        let caps = CapabilitySet::none_for(ident)
            .with_flag(Domain::Inspection, Verb::Get, true)
            .with_flag(Domain::Equipment, Verb::Delete, true);

        assert!(caps.allows(Domain::Inspection, Verb::Get));
        assert!(caps.allows(Domain::Equipment, Verb::Delete));
        assert!(!caps.allows(Domain::Inspection, Verb::Create));
        assert!(!caps.allows(Domain::Personnel, Verb::Get));
    }

    #[test]
    fn none_for_clears_every_flag() {
        let caps = CapabilitySet::none_for(Uuid::new_v4());
        for domain in [
            Domain::PersonnelCertification,
            Domain::Personnel,
            Domain::Inspection,
            Domain::Equipment,
        ] {
            for verb in [Verb::Get, Verb::Create, Verb::Update, Verb::Delete] {
                assert!(!caps.allows(domain, verb));
            }
        }
        assert!(!caps.is_superuser);
    }

    #[test]
    fn credential_expiry_is_a_strict_comparison() {
        let now = Utc::now();
        let cred = AccessCredential {
            token: "t".to_string(),
            identity_ident: Uuid::new_v4(),
            issued_at: now,
            expires_at: now,
        };
        // Exactly at the boundary the credential is still accepted.
        assert!(!cred.expired(now));
        assert!(cred.expired(now + chrono::Duration::microseconds(1)));
    }
}
