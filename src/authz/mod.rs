// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission resolution: (verb, resource path) to a capability flag.
//!
//! The routing table is closed and declarative; evaluation is one generic
//! function over tagged (domain, verb) pairs. Anything outside the table is
//! a default deny.

pub mod resolver;
pub mod routing;

pub use resolver::{authorize, Decision, DenyReason};
pub use routing::resolve_domain;
