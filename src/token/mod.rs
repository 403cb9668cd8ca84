// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: signing and verification of claim-bearing tokens.
//!
//! A pure function of the shared secret and the claims, with no side
//! effects. Access credentials are never persisted; they exist only as a
//! verifiable signature over their claims.

pub mod claims;
pub mod codec;

pub use claims::{truncate_to_micros, AccessClaims, RefreshClaims};
pub use codec::TokenCodec;
