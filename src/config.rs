// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. Everything has a
//! default except the signing secret.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH_SECRET_KEY` | HMAC secret for token signing | Required |
//! | `ACCESS_TOKEN_LIFETIME_MINUTES` | Access credential lifetime | `10` |
//! | `REFRESH_TOKEN_LIFETIME_HOURS` | Refresh session lifetime | `24` |
//! | `CACHE_TTL_SECONDS` | TTL for identity/capability cache entries | `300` |
//! | `CACHE_CAPACITY` | Max entries in the in-process cache | `1024` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;

use chrono::Duration;

/// Environment variable name for the token signing secret.
pub const SECRET_KEY_ENV: &str = "AUTH_SECRET_KEY";
/// Environment variable name for the access credential lifetime (minutes).
pub const ACCESS_LIFETIME_ENV: &str = "ACCESS_TOKEN_LIFETIME_MINUTES";
/// Environment variable name for the refresh session lifetime (hours).
pub const REFRESH_LIFETIME_ENV: &str = "REFRESH_TOKEN_LIFETIME_HOURS";
/// Environment variable name for the cache entry TTL (seconds).
pub const CACHE_TTL_ENV: &str = "CACHE_TTL_SECONDS";
/// Environment variable name for the in-process cache capacity.
pub const CACHE_CAPACITY_ENV: &str = "CACHE_CAPACITY";

const DEFAULT_ACCESS_LIFETIME_MINUTES: i64 = 10;
const DEFAULT_REFRESH_LIFETIME_HOURS: i64 = 24;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Immutable configuration shared by every worker.
///
/// The secret and the lifetimes are read-only after startup, so no locking
/// is needed anywhere in the call paths.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret the token codec signs and verifies with.
    pub secret: String,
    /// Lifetime of minted access credentials.
    pub access_lifetime: Duration,
    /// Lifetime of minted refresh sessions.
    pub refresh_lifetime: Duration,
    /// TTL for identity/capability cache entries.
    pub cache_ttl: std::time::Duration,
    /// Max entries held by the in-process cache.
    pub cache_capacity: usize,
}

impl AuthConfig {
    /// Configuration with defaults for everything but the secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_lifetime: Duration::minutes(DEFAULT_ACCESS_LIFETIME_MINUTES),
            refresh_lifetime: Duration::hours(DEFAULT_REFRESH_LIFETIME_HOURS),
            cache_ttl: std::time::Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Load configuration from the environment.
    ///
    /// Returns `None` when `AUTH_SECRET_KEY` is unset; unparseable numeric
    /// variables fall back to their defaults.
    pub fn from_env() -> Option<Self> {
        let secret = env::var(SECRET_KEY_ENV).ok()?;
        let mut config = Self::new(secret);

        if let Some(minutes) = read_env_number::<i64>(ACCESS_LIFETIME_ENV) {
            config.access_lifetime = Duration::minutes(minutes);
        }
        if let Some(hours) = read_env_number::<i64>(REFRESH_LIFETIME_ENV) {
            config.refresh_lifetime = Duration::hours(hours);
        }
        if let Some(seconds) = read_env_number::<u64>(CACHE_TTL_ENV) {
            config.cache_ttl = std::time::Duration::from_secs(seconds);
        }
        if let Some(capacity) = read_env_number::<usize>(CACHE_CAPACITY_ENV) {
            config.cache_capacity = capacity;
        }

        Some(config)
    }
}

fn read_env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.parse().ok())
}
