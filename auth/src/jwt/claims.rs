use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by access and refresh tokens.
///
/// Every field is required on decode, so a token missing `email` or `exp`
/// fails deserialization instead of reaching a handler half-populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject email address
    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Unique token identifier
    pub jti: String,

    /// When the subject last presented a primary credential (Unix timestamp).
    /// Carried unchanged across refreshes.
    pub auth_time: i64,
}

impl SessionClaims {
    /// Build claims for `email` issued at `now`, valid for `ttl`.
    ///
    /// # Arguments
    /// * `email` - Subject email address
    /// * `auth_time` - Unix timestamp of the original credential check
    /// * `now` - Issuance instant
    /// * `ttl` - Lifetime of the token
    pub fn new(email: impl Into<String>, auth_time: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email: email.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            auth_time,
        }
    }
}
