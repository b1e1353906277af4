// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session-token lifecycle for the service.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `POST /v1/tokens`
//! 2. A [`CredentialVerifier`] resolves them to a principal
//! 3. [`TokenManager::issue`] signs an HS256 JWT and opens a session entry
//!    in the [`SessionCache`](crate::session::SessionCache)
//! 4. Client sends `Authorization: Bearer <token>` on every request
//! 5. The [`authenticate`](middleware::authenticate) filter validates the
//!    token and binds a [`Principal`] to the request
//! 6. `DELETE /v1/tokens` revokes the session
//!
//! ## Security
//!
//! - A token is live only while its session entry exists; logout and
//!   expiry both remove it
//! - Sessions are never extended on use
//! - No clock skew tolerance
//! - Token strings are never logged

pub mod access;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod credentials;
pub mod entry_point;
pub mod error;
pub mod extractor;
pub mod manager;
pub mod middleware;

pub use access::AccessPolicy;
pub use claims::{Claims, Principal};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CodecError, TokenCodec};
pub use credentials::{CredentialVerifier, StaticCredentials};
pub use entry_point::{JsonEntryPoint, UnauthorizedEntryPoint};
pub use error::AuthError;
pub use extractor::Auth;
pub use manager::{TokenError, TokenManager, TokenState};
