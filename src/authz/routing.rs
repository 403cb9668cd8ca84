// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative routing tables.
//!
//! Two closed tables drive the resolver: path prefix to resource domain,
//! and HTTP method to verb. Prefix matching is most-specific-first, so
//! `/v1/personnel-certification` shadows `/v1/personnel`. Every mapping is
//! independently testable; there is no runtime dispatch.

use crate::models::{Domain, Verb};

/// Path prefix table, ordered most specific first.
///
/// Matching is substring containment on the request path, mirroring how the
/// edge proxy forwards the original URI (it may carry a gateway prefix in
/// front of `/v1/...`).
const DOMAIN_PREFIXES: &[(&str, Domain)] = &[
    ("v1/personnel-certification", Domain::PersonnelCertification),
    ("v1/personnel", Domain::Personnel),
    ("v1/inspection", Domain::Inspection),
    ("v1/equipment", Domain::Equipment),
];

/// Resolve a resource path to its domain tag.
///
/// Returns `None` for any path outside the closed table; the resolver turns
/// that into a default deny, never an allow.
pub fn resolve_domain(resource_path: &str) -> Option<Domain> {
    DOMAIN_PREFIXES
        .iter()
        .find(|(prefix, _)| resource_path.contains(prefix))
        .map(|(_, domain)| *domain)
}

impl Verb {
    /// Map an HTTP method to its verb tag.
    ///
    /// Methods outside the table (`PUT`, `HEAD`, ...) map to `None` and are
    /// denied by default.
    pub fn from_method(method: &str) -> Option<Verb> {
        match method {
            "GET" => Some(Verb::Get),
            "POST" => Some(Verb::Create),
            "PATCH" => Some(Verb::Update),
            "DELETE" => Some(Verb::Delete),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_prefix_resolves_to_its_domain() {
        assert_eq!(
            resolve_domain("/v1/personnel-certification/42"),
            Some(Domain::PersonnelCertification)
        );
        assert_eq!(resolve_domain("/v1/personnel/42"), Some(Domain::Personnel));
        assert_eq!(resolve_domain("/v1/inspection"), Some(Domain::Inspection));
        assert_eq!(resolve_domain("/v1/equipment/7/meta"), Some(Domain::Equipment));
    }

    #[test]
    fn most_specific_prefix_wins() {
        // "v1/personnel" is a prefix of "v1/personnel-certification"; the
        // longer tag must win.
        assert_eq!(
            resolve_domain("/api/v1/personnel-certification"),
            Some(Domain::PersonnelCertification)
        );
    }

    #[test]
    fn gateway_prefixes_are_tolerated() {
        assert_eq!(
            resolve_domain("/gateway/v1/equipment/3"),
            Some(Domain::Equipment)
        );
    }

    #[test]
    fn unknown_paths_resolve_to_nothing() {
        assert_eq!(resolve_domain("/v1/unknown"), None);
        assert_eq!(resolve_domain("/v2/personnel"), None);
        assert_eq!(resolve_domain(""), None);
    }

    #[test]
    fn methods_map_to_verbs() {
        assert_eq!(Verb::from_method("GET"), Some(Verb::Get));
        assert_eq!(Verb::from_method("POST"), Some(Verb::Create));
        assert_eq!(Verb::from_method("PATCH"), Some(Verb::Update));
        assert_eq!(Verb::from_method("DELETE"), Some(Verb::Delete));
    }

    #[test]
    fn unknown_methods_map_to_nothing() {
        assert_eq!(Verb::from_method("PUT"), None);
        assert_eq!(Verb::from_method("HEAD"), None);
        assert_eq!(Verb::from_method("get"), None);
        assert_eq!(Verb::from_method(""), None);
    }
}
