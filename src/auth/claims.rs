// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the per-request principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried inside a session token.
///
/// Wire names follow the registered JWT claims so third-party libraries can
/// read the token without special casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token id, set to the principal identifier
    pub jti: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// The principal this token was issued to.
    pub fn subject(&self) -> &str {
        &self.jti
    }
}

/// Authenticated principal bound to one in-flight request.
///
/// Inserted into the request extensions by the authentication filter and
/// read back by the [`Auth`](super::Auth) extractor. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Principal identifier (the token subject)
    pub subject: String,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_serialize_with_registered_names() {
        let claims = Claims {
            jti: "alice".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["jti"], "alice");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_003_600);
        assert_eq!(claims.subject(), "alice");
    }
}
