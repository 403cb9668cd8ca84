// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session lifecycle: issuance, rotation, revocation and validation.
//!
//! The single-active-session policy lives here: issuing always revokes
//! before it inserts, and replay of a dead session is answered with a full
//! revocation cascade for the owning identity.

pub mod issuer;
pub mod revocation;
pub mod state;

pub use issuer::SessionIssuer;
pub use revocation::RevocationCoordinator;
pub use state::{classify, SessionState};
