//! Firebase Authentication ID token verification.
//!
//! Tokens are RS256 JWTs signed by Google. Public keys are published as a
//! JWKS document and rotate every few days, so decoded keys are cached for a
//! bounded time and refetched on demand.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use moka::future::Cache;
use serde::Deserialize;

use super::errors::FederatedError;

/// Google's published keys for Firebase ID tokens.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const KNOWN_KIDS_KEY: &str = "jwks";

/// Verifier settings.
#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    /// Firebase project the tokens must be minted for (`aud`)
    pub project_id: String,
    pub jwks_url: String,
    pub jwks_cache_duration: Duration,
}

impl FirebaseSettings {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: DEFAULT_JWKS_URL.to_string(),
            jwks_cache_duration: Duration::from_secs(60 * 60),
        }
    }

    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    pub fn with_jwks_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    /// Expected `iss` claim for this project.
    pub fn issuer(&self) -> String {
        format!("{}{}", ISSUER_PREFIX, self.project_id)
    }

    /// Read the project id from a Firebase service-account credentials file.
    ///
    /// # Errors
    /// * `Configuration` - File is unreadable, not JSON, or lacks `project_id`
    pub fn project_id_from_credentials(path: impl AsRef<Path>) -> Result<String, FederatedError> {
        #[derive(Deserialize)]
        struct ServiceAccount {
            project_id: String,
        }

        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FederatedError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let account: ServiceAccount = serde_json::from_str(&raw).map_err(|e| {
            FederatedError::Configuration(format!("invalid credentials file: {}", e))
        })?;

        if account.project_id.trim().is_empty() {
            return Err(FederatedError::Configuration(
                "credentials file has an empty project_id".to_string(),
            ));
        }

        Ok(account.project_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

/// Payload fields read from a Firebase ID token.
#[derive(Debug, Clone, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

/// Identity asserted by a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedClaims {
    /// Provider-side user id
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Verifies Firebase ID tokens against Google's JWKS.
///
/// Unknown key ids are rejected without a refetch while the known-kid list
/// is cached, so a flood of forged `kid`s cannot drive requests to Google.
#[derive(Clone)]
pub struct FirebaseVerifier {
    settings: FirebaseSettings,
    http_client: reqwest::Client,
    key_cache: Cache<String, Arc<DecodingKey>>,
    known_kids: Cache<String, Arc<Vec<String>>>,
}

impl FirebaseVerifier {
    /// Create a verifier with a key-fetching client bounded by connect and
    /// request timeouts.
    ///
    /// # Errors
    /// * `Configuration` - HTTP client could not be built
    pub fn new(settings: FirebaseSettings) -> Result<Self, FederatedError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| FederatedError::Configuration(format!("http client: {}", e)))?;

        Ok(Self::with_client(settings, http_client))
    }

    pub fn with_client(settings: FirebaseSettings, http_client: reqwest::Client) -> Self {
        let ttl = settings.jwks_cache_duration;
        Self {
            settings,
            http_client,
            key_cache: Cache::builder().time_to_live(ttl).max_capacity(32).build(),
            known_kids: Cache::builder().time_to_live(ttl).max_capacity(1).build(),
        }
    }

    /// Verify an ID token and extract the asserted identity.
    ///
    /// # Errors
    /// * `InvalidAssertion` - Malformed token, bad signature, wrong algorithm,
    ///   audience or issuer, expired, or unknown key id
    /// * `MissingEmailClaim` - Token carries no usable email
    /// * `UnverifiedEmail` - Provider reports the email as unverified
    /// * `ProviderUnavailable` - Key set could not be fetched
    pub async fn verify(&self, id_token: &str) -> Result<FederatedClaims, FederatedError> {
        let header = decode_header(id_token)
            .map_err(|e| FederatedError::InvalidAssertion(format!("bad header: {}", e)))?;

        if header.alg != Algorithm::RS256 {
            return Err(FederatedError::InvalidAssertion(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| FederatedError::InvalidAssertion("missing kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.settings.project_id]);
        validation.set_issuer(&[self.settings.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    FederatedError::InvalidAssertion("token expired".to_string())
                }
                _ => FederatedError::InvalidAssertion(e.to_string()),
            })?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(FederatedError::InvalidAssertion("empty subject".to_string()));
        }

        let email = claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(FederatedError::MissingEmailClaim)?;

        if claims.email_verified == Some(false) {
            return Err(FederatedError::UnverifiedEmail);
        }

        Ok(FederatedClaims {
            subject: claims.sub,
            email,
            display_name: claims.name.filter(|name| !name.trim().is_empty()),
        })
    }

    async fn decoding_key(&self, kid: &str) -> Result<Arc<DecodingKey>, FederatedError> {
        if let Some(key) = self.key_cache.get(kid).await {
            return Ok(key);
        }

        if let Some(known) = self.known_kids.get(KNOWN_KIDS_KEY).await {
            if !known.iter().any(|k| k == kid) {
                tracing::debug!(kid, "Unknown key id rejected from cached key set");
                return Err(FederatedError::InvalidAssertion("unknown kid".to_string()));
            }
        }

        let jwks = self.fetch_jwks().await?;

        let kids: Vec<String> = jwks.keys.iter().map(|k| k.kid.clone()).collect();
        self.known_kids
            .insert(KNOWN_KIDS_KEY.to_string(), Arc::new(kids))
            .await;

        let mut found = None;
        for jwk in &jwks.keys {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    let key = Arc::new(key);
                    if jwk.kid == kid {
                        found = Some(Arc::clone(&key));
                    }
                    self.key_cache.insert(jwk.kid.clone(), key).await;
                }
                Err(e) => tracing::warn!(kid = %jwk.kid, error = %e, "Skipping unusable JWK"),
            }
        }

        found.ok_or_else(|| FederatedError::InvalidAssertion("unknown kid".to_string()))
    }

    async fn fetch_jwks(&self) -> Result<Jwks, FederatedError> {
        tracing::debug!(url = %self.settings.jwks_url, "Fetching identity provider keys");

        let response = self
            .http_client
            .get(&self.settings.jwks_url)
            .send()
            .await
            .map_err(|e| FederatedError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FederatedError::ProviderUnavailable(format!(
                "key endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<Jwks>()
            .await
            .map_err(|e| FederatedError::ProviderUnavailable(format!("invalid key set: {}", e)))
    }
}

impl std::fmt::Debug for FirebaseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseVerifier")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
