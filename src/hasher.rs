// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reference credential hasher.
//!
//! SHA-256 over the plaintext, hex encoded, matching the digests already in
//! the identity store. Deployments wanting a memory-hard algorithm swap in
//! their own [`CredentialHasher`] behind the same trait; digests are opaque
//! to the rest of the crate either way.

use sha2::{Digest, Sha256};

use crate::gateways::CredentialHasher;

/// SHA-256 hex credential hasher.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256CredentialHasher;

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, plaintext: &str) -> String {
        format!("{:x}", Sha256::digest(plaintext.as_bytes()))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        self.hash(plaintext) == digest
    }
}
