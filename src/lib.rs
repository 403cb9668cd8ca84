// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authgate - Credential & Session Issuance Core
//!
//! This crate is the token lifecycle state machine (issue/rotate/revoke)
//! and permission resolution engine of the authentication service. HTTP
//! transport, DI wiring and storage engines are collaborators behind the
//! trait seams in [`gateways`].
//!
//! ## Modules
//!
//! - `token` - signing and verification of claim-bearing tokens
//! - `session` - issuance, rotation, revocation and session validation
//! - `authz` - routing tables and the permission resolver
//! - `cache` - cache-aside layer for identity/capability lookups
//! - `service` - the facade exposing login/authenticate/refresh/logout/authorize
//! - `store` - in-memory gateway implementations for tests and embedding

pub mod authz;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateways;
pub mod hasher;
pub mod logging;
pub mod models;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

pub use authz::{Decision, DenyReason};
pub use config::AuthConfig;
pub use error::{AuthError, ErrorKind};
pub use models::{AccessCredential, CapabilitySet, Domain, Identity, RefreshSession, Verb};
pub use service::{AuthService, Collaborators};
