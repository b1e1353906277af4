// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed-token codec.
//!
//! Tokens are compact HS256 JWTs: `{"typ":"JWT","alg":"HS256"}` header,
//! [`Claims`] payload, HMAC-SHA256 signature.
//!
//! ## Failure precedence
//!
//! Structure and signature are checked first; expiry is evaluated only after
//! the signature verifies. A token that is both tampered with and expired is
//! therefore reported as [`CodecError::SignatureInvalid`].
//!
//! Expiry is checked here against the caller-supplied instant rather than by
//! `jsonwebtoken`, so the whole token core runs on one injectable clock.

use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;

/// Codec-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("token subject must not be empty")]
    EmptySubject,

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("token is malformed")]
    Malformed,
}

/// HS256 encoder/decoder bound to one secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode a signed token. Output is deterministic for identical inputs.
    pub fn encode(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, CodecError> {
        if subject.is_empty() {
            return Err(CodecError::EmptySubject);
        }

        let claims = Claims {
            jti: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }

    /// Verify and decode a token as of `now`.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CodecError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => CodecError::SignatureInvalid,
                ErrorKind::ExpiredSignature => CodecError::TokenExpired,
                _ => CodecError::Malformed,
            })?;

        let claims = data.claims;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(CodecError::Malformed)?;
        if now > expires_at {
            return Err(CodecError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration;

    const SECRET: &[u8] = b"codec-test-secret";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn encode_decode_round_trip() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("alice", at(1_000), at(1_060)).unwrap();

        let claims = codec.decode(&token, at(1_030)).unwrap();
        assert_eq!(claims.subject(), "alice");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 1_060);
    }

    #[test]
    fn encoding_is_deterministic() {
        let codec = TokenCodec::new(SECRET);
        let a = codec.encode("alice", at(1_000), at(1_060)).unwrap();
        let b = codec.encode("alice", at(1_000), at(1_060)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn header_declares_jwt_hs256() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("alice", at(1_000), at(1_060)).unwrap();
        let header_b64 = token.split('.').next().unwrap();
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_b64).unwrap()).unwrap();
        assert_eq!(header["typ"], "JWT");
        assert_eq!(header["alg"], "HS256");
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn empty_subject_is_rejected() {
        let codec = TokenCodec::new(SECRET);
        assert_eq!(
            codec.encode("", at(1_000), at(1_060)),
            Err(CodecError::EmptySubject)
        );
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let token = TokenCodec::new(SECRET)
            .encode("alice", at(1_000), at(1_060))
            .unwrap();
        let other = TokenCodec::new(b"another-secret");
        assert_eq!(
            other.decode(&token, at(1_001)),
            Err(CodecError::SignatureInvalid)
        );
    }

    #[test]
    fn expiry_is_strictly_after_exp() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("alice", at(1_000), at(1_060)).unwrap();

        assert!(codec.decode(&token, at(1_060)).is_ok());
        assert_eq!(
            codec.decode(&token, at(1_060) + Duration::milliseconds(1)),
            Err(CodecError::TokenExpired)
        );
    }

    #[test]
    fn tampered_expired_token_reports_signature_first() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("alice", at(1_000), at(1_060)).unwrap();

        // Swap the payload for one naming a different subject
        let forged_claims = URL_SAFE_NO_PAD.encode(br#"{"jti":"mallory","iat":1000,"exp":1060}"#);
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged_claims.as_str();
        let forged = parts.join(".");

        assert_eq!(
            codec.decode(&forged, at(5_000)),
            Err(CodecError::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = TokenCodec::new(SECRET);
        assert_eq!(codec.decode("", at(0)), Err(CodecError::Malformed));
        assert_eq!(codec.decode("not-a-token", at(0)), Err(CodecError::Malformed));
        assert_eq!(codec.decode("a.b.c", at(0)), Err(CodecError::Malformed));
    }

    #[test]
    fn unsigned_algorithm_is_rejected() {
        let codec = TokenCodec::new(SECRET);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(br#"{"jti":"alice","iat":1000,"exp":1060}"#);
        let token = format!("{header}.{claims}.");
        assert!(codec.decode(&token, at(1_001)).is_err());
    }
}
