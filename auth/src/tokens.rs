use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// Lifetimes and secrets for session tokens.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Upper bound on how long a chain of refreshes may keep a session alive,
    /// measured from `auth_time`.
    pub max_session_lifetime: Duration,
}

impl TokenSettings {
    /// Settings with the standard lifetimes: 15 minute access tokens,
    /// 7 day refresh tokens, 30 day sessions.
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            max_session_lifetime: Duration::days(30),
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("max_session_lifetime", &self.max_session_lifetime)
            .finish_non_exhaustive()
    }
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies session tokens.
///
/// Access and refresh tokens are signed with different secrets, so neither
/// class can stand in for the other. Nothing is persisted: a token stays
/// valid until it expires.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
    max_session_lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer from validated settings.
    ///
    /// # Errors
    /// * `WeakSecret` - A secret is shorter than 32 bytes, or both secrets are equal
    pub fn new(settings: TokenSettings) -> Result<Self, JwtError> {
        if settings.access_secret == settings.refresh_secret {
            return Err(JwtError::WeakSecret(
                "access and refresh secrets must differ".to_string(),
            ));
        }

        Ok(Self {
            access: JwtHandler::new(&settings.access_secret)?,
            refresh: JwtHandler::new(&settings.refresh_secret)?,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            max_session_lifetime: settings.max_session_lifetime,
        })
    }

    /// Issue a short-lived access token for `email`.
    pub fn issue_access_token(&self, email: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        self.issue_access_token_at(email, now.timestamp(), now)
    }

    /// Issue a long-lived refresh token for `email`.
    pub fn issue_refresh_token(&self, email: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        self.issue_refresh_token_at(email, now.timestamp(), now)
    }

    /// Issue an access token with an explicit clock.
    pub fn issue_access_token_at(
        &self,
        email: &str,
        auth_time: i64,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.access
            .encode(&SessionClaims::new(email, auth_time, now, self.access_ttl))
    }

    /// Issue a refresh token with an explicit clock.
    pub fn issue_refresh_token_at(
        &self,
        email: &str,
        auth_time: i64,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.refresh
            .encode(&SessionClaims::new(email, auth_time, now, self.refresh_ttl))
    }

    /// Issue a fresh pair for a subject who just presented a credential.
    pub fn issue_pair(&self, email: &str) -> Result<TokenPair, JwtError> {
        let now = Utc::now();
        self.issue_pair_at(email, now.timestamp(), now)
    }

    /// Issue a pair with an explicit clock.
    pub fn issue_pair_at(
        &self,
        email: &str,
        auth_time: i64,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue_access_token_at(email, auth_time, now)?,
            refresh_token: self.issue_refresh_token_at(email, auth_time, now)?,
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.access.decode(token)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// Besides signature and expiry, the session the token belongs to must be
    /// younger than the configured maximum lifetime.
    pub fn verify_refresh(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let claims = self.refresh.decode(token)?;

        let session_deadline = claims.auth_time + self.max_session_lifetime.num_seconds();
        if Utc::now().timestamp() > session_deadline {
            return Err(JwtError::SessionExpired);
        }

        Ok(claims)
    }
}
