//! Token issuance and verification
//!
//! HS256 JWTs carrying the user's e-mail as subject. The workflows only
//! depend on the [`TokenVerifier`] seam; every invalid, malformed or
//! expired token is treated identically as "no subject".

use crate::domain::result::Result;
use crate::domain::LaudoError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user's e-mail
    sub: String,
    /// Expiry, epoch seconds
    exp: i64,
}

/// Verification seam consumed by the workflows
pub trait TokenVerifier: Send + Sync {
    /// Returns the token's subject, or `None` for any invalid token
    fn verify(&self, token: &str) -> Option<String>;
}

/// HS256 token service
pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issues a token for `subject` expiring `ttl` from `now`
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| LaudoError::Internal(format!("token encoding failed: {e}")))
    }
}

impl TokenVerifier for JwtTokens {
    fn verify(&self, token: &str) -> Option<String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .ok()
            .map(|data| data.claims.sub)
    }
}
