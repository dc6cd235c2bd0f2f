/// Session token claims
///
/// The decoded payload of a session token: the user id plus the standard
/// registered claims (RFC 7519).

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Id of the authenticated user (`users.user_id`)
    pub user_id: i64,
    /// Issuer
    pub iss: String,
    /// Subject
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: i64,
        issued_at: i64,
        ttl_seconds: i64,
        issuer: String,
        subject: String,
        audience: String,
    ) -> Self {
        Self {
            user_id,
            iss: issuer,
            sub: subject,
            aud: audience,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
        }
    }

    /// A token is no longer valid from the second its TTL elapses.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}
