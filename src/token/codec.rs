// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 signing and verification over the claim payloads.
//!
//! Every decode failure collapses to [`AuthError::InvalidToken`]: signature
//! mismatch, malformed envelope, wrong algorithm, undecodable claims. The
//! caller must not trust any claim extracted on that path. Registered-claim
//! validation (`exp`/`iat`) is disabled; expiry lives in the claims at fixed
//! textual precision and is compared by this core.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};

use super::claims::{AccessClaims, RefreshClaims};
use crate::error::AuthError;

/// Signs and verifies claim-bearing tokens with a shared secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec over the given signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claims carry their own textual timestamps; nothing registered is
        // present or validated.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = Default::default();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
            validation,
        }
    }

    /// Sign access claims into a compact token.
    pub fn issue_access(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        self.issue(claims)
    }

    /// Sign refresh claims into a compact token.
    pub fn issue_refresh(&self, claims: &RefreshClaims) -> Result<String, AuthError> {
        self.issue(claims)
    }

    /// Verify an access token and recover its claims.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.verify(token)
    }

    /// Verify a refresh token and recover its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        self.verify(token)
    }

    fn issue<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&self.header, claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, AuthError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::claims::truncate_to_micros;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret")
    }

    fn access_claims() -> AccessClaims {
        let issued_at = truncate_to_micros(Utc::now());
        AccessClaims {
            identity_ident: Uuid::new_v4(),
            issued_at,
            expires_at: issued_at + Duration::minutes(10),
        }
    }

    #[test]
    fn access_claims_round_trip() {
        let codec = codec();
        let claims = access_claims();
        let token = codec.issue_access(&claims).unwrap();
        let decoded = codec.verify_access(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn refresh_claims_round_trip() {
        let codec = codec();
        let issued_at = truncate_to_micros(Utc::now());
        let claims = RefreshClaims {
            session_ident: Uuid::new_v4(),
            identity_ident: Uuid::new_v4(),
            issued_at,
            expires_at: issued_at + Duration::hours(24),
        };
        let token = codec.issue_refresh(&claims).unwrap();
        let decoded = codec.verify_refresh(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = codec().issue_access(&access_claims()).unwrap();
        let other = TokenCodec::new("a-different-secret");
        assert!(matches!(
            other.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let codec = codec();
        let token = codec.issue_access(&access_claims()).unwrap();

        // Swap the payload segment for a different token's payload.
        let donor = codec.issue_access(&access_claims()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let donor_parts: Vec<&str> = donor.split('.').collect();
        parts[1] = donor_parts[1];
        let tampered = parts.join(".");

        assert!(matches!(
            codec.verify_access(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_envelope_is_invalid() {
        let codec = codec();
        for garbage in ["", "not-a-token", "a.b", "a.b.c.d"] {
            assert!(matches!(
                codec.verify_access(garbage),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn refresh_token_does_not_verify_as_access_token() {
        // An access claim set lacks session_ident, so a refresh decode of an
        // access token must fail rather than fabricate a session.
        let codec = codec();
        let token = codec.issue_access(&access_claims()).unwrap();
        assert!(matches!(
            codec.verify_refresh(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
