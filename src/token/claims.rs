// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claim payloads and their wire representation.
//!
//! Timestamps travel as text at fixed microsecond precision. Issue and
//! verify share the one format below, so a decoded claim reproduces the
//! exact issued value; downstream equality and expiry comparisons depend on
//! that round-trip being lossless. Anything minted into a claim must be
//! truncated with [`truncate_to_micros`] first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire format for claim timestamps: day-first date, microsecond fraction.
pub(crate) const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S%.6f";

/// Drop sub-microsecond precision so a timestamp survives the claim wire
/// format unchanged.
pub fn truncate_to_micros(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(value.timestamp_micros()).unwrap_or(value)
}

/// Serde adapter pinning claim timestamps to [`TIMESTAMP_FORMAT`].
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Identity the credential was issued to.
    pub identity_ident: Uuid,
    /// Issue instant, microsecond precision.
    #[serde(with = "timestamp")]
    pub issued_at: DateTime<Utc>,
    /// Expiry instant, microsecond precision. Compared by this core, not by
    /// the JWT library.
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
}

/// Claims carried by a refresh token.
///
/// The session ident is the lookup key into the refresh session store; the
/// store row stays authoritative over anything decoded from the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Refresh session this token belongs to.
    pub session_ident: Uuid,
    /// Identity that owns the session.
    pub identity_ident: Uuid,
    /// Issue instant, microsecond precision.
    #[serde(with = "timestamp")]
    pub issued_at: DateTime<Utc>,
    /// Expiry instant, microsecond precision.
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_round_trip_through_the_wire_format() {
        let issued = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(589_793))
            .unwrap();
        let claims = AccessClaims {
            identity_ident: Uuid::new_v4(),
            issued_at: issued,
            expires_at: issued + chrono::Duration::minutes(10),
        };

        let json = serde_json::to_string(&claims).unwrap();
        let decoded: AccessClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn truncation_drops_only_sub_microsecond_precision() {
        let nanos = Utc
            .timestamp_opt(1_750_000_000, 123_456_789)
            .unwrap();
        let truncated = truncate_to_micros(nanos);
        assert_eq!(truncated.timestamp(), nanos.timestamp());
        assert_eq!(truncated.timestamp_subsec_micros(), 123_456);
        assert_eq!(truncated.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn truncated_timestamp_is_a_fixed_point_of_the_wire_format() {
        let value = truncate_to_micros(Utc::now());
        let printed = value.format(TIMESTAMP_FORMAT).to_string();
        let reparsed = chrono::NaiveDateTime::parse_from_str(&printed, TIMESTAMP_FORMAT)
            .unwrap()
            .and_utc();
        assert_eq!(reparsed, value);
    }
}
