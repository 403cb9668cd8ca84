// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission resolver.
//!
//! Check order is fixed and pinned by tests:
//!
//! 1. routing metadata present (verb and resource path): a missing value
//!    is an integration fault, not a deny
//! 2. credential expiry, checked before the superuser bypass, so an
//!    expired superuser credential reports `CredentialExpired`
//! 3. superuser bypass, skipping every flag check
//! 4. path to domain, method to verb: anything outside the closed tables
//!    is a default deny
//! 5. flag lookup on the capability set

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::authz::routing::resolve_domain;
use crate::error::AuthError;
use crate::models::{AccessCredential, CapabilitySet, Verb};

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action is permitted.
    Allow,
    /// The action is not permitted; the reason is reportable.
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The presented access credential is past its expiry.
    CredentialExpired,
    /// The capability flag for (domain, verb) is false, or the pair is
    /// outside the routing table.
    Forbidden,
}

impl DenyReason {
    /// Stable machine-readable code for this denial.
    pub fn reason_code(&self) -> &'static str {
        match self {
            DenyReason::CredentialExpired => "credential_expired",
            DenyReason::Forbidden => "forbidden",
        }
    }
}

/// Decide whether `credential` authorizes `verb` on `resource_path`.
///
/// `verb` and `resource_path` arrive as forwarded request metadata and may
/// be absent when the edge integration is misconfigured; that case is
/// [`AuthError::MissingRoutingMetadata`], logged server-side, distinct from
/// any deny.
pub fn authorize(
    capability_set: &CapabilitySet,
    credential: &AccessCredential,
    verb: Option<&str>,
    resource_path: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Decision, AuthError> {
    let (Some(method), Some(path)) = (verb, resource_path) else {
        warn!(
            identity = %credential.identity_ident,
            verb_present = verb.is_some(),
            path_present = resource_path.is_some(),
            "authorization call without routing metadata"
        );
        return Err(AuthError::MissingRoutingMetadata);
    };

    if credential.expired(now) {
        return Ok(Decision::Deny(DenyReason::CredentialExpired));
    }

    if capability_set.is_superuser {
        return Ok(Decision::Allow);
    }

    let Some(verb) = Verb::from_method(method) else {
        return Ok(Decision::Deny(DenyReason::Forbidden));
    };
    let Some(domain) = resolve_domain(path) else {
        return Ok(Decision::Deny(DenyReason::Forbidden));
    };

    if capability_set.allows(domain, verb) {
        Ok(Decision::Allow)
    } else {
        Ok(Decision::Deny(DenyReason::Forbidden))
    }
}
