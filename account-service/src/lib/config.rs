use std::env;
use std::fmt;
use std::time::Duration;

use auth::jwt::handler::MIN_SECRET_LEN;
use auth::FirebaseSettings;
use auth::TokenSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Upper bound for any configured token or session lifetime.
const MAX_LIFETIME_DAYS: i64 = 3650;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub firebase: FirebaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. Accounts are kept in memory when unset.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
    #[serde(default = "default_max_session_days")]
    pub max_session_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseConfig {
    pub project_id: Option<String>,
    /// Service-account JSON; its `project_id` is used when `project_id` is unset.
    pub credentials_path: Option<String>,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_access_ttl_minutes() -> i64 {
    15
}

fn default_refresh_ttl_days() -> i64 {
    7
}

fn default_max_session_days() -> i64 {
    30
}

fn default_jwks_url() -> String {
    auth::federated::firebase::DEFAULT_JWKS_URL.to_string()
}

fn default_jwks_cache_secs() -> u64 {
    3600
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("max_session_days", &self.max_session_days)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__ACCESS_SECRET, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// The result is validated before it is returned.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check the invariants the rest of the service relies on.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Missing or weak signing secrets, non-positive
    ///   or out-of-range lifetimes, or no way to determine the Firebase project
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.firebase.project_id()?;
        Ok(())
    }
}

impl JwtConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, secret) in [
            ("jwt.access_secret", &self.access_secret),
            ("jwt.refresh_secret", &self.refresh_secret),
        ] {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::Message(format!(
                    "{} must be at least {} bytes",
                    name, MIN_SECRET_LEN
                )));
            }
        }

        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must differ".to_string(),
            ));
        }

        self.token_settings().map(|_| ())
    }

    /// Build issuer settings from the configured secrets and lifetimes.
    ///
    /// # Errors
    /// * `ConfigError::Message` - A lifetime is not positive or exceeds ten years
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        Ok(TokenSettings {
            access_secret: self.access_secret.as_bytes().to_vec(),
            refresh_secret: self.refresh_secret.as_bytes().to_vec(),
            access_ttl: lifetime(
                "jwt.access_ttl_minutes",
                self.access_ttl_minutes,
                chrono::Duration::try_minutes,
            )?,
            refresh_ttl: lifetime(
                "jwt.refresh_ttl_days",
                self.refresh_ttl_days,
                chrono::Duration::try_days,
            )?,
            max_session_lifetime: lifetime(
                "jwt.max_session_days",
                self.max_session_days,
                chrono::Duration::try_days,
            )?,
        })
    }
}

fn lifetime(
    name: &str,
    value: i64,
    to_duration: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration, ConfigError> {
    let max = chrono::Duration::days(MAX_LIFETIME_DAYS);

    match to_duration(value) {
        Some(duration) if value > 0 && duration <= max => Ok(duration),
        _ => Err(ConfigError::Message(format!(
            "{} must be positive and at most {} days",
            name, MAX_LIFETIME_DAYS
        ))),
    }
}

impl FirebaseConfig {
    /// Resolve the Firebase project id, reading the credentials file if needed.
    pub fn project_id(&self) -> Result<String, ConfigError> {
        if let Some(project_id) = self.project_id.as_deref().filter(|p| !p.trim().is_empty()) {
            return Ok(project_id.to_string());
        }

        match self.credentials_path.as_deref() {
            Some(path) => FirebaseSettings::project_id_from_credentials(path)
                .map_err(|e| ConfigError::Message(e.to_string())),
            None => Err(ConfigError::Message(
                "firebase.project_id or firebase.credentials_path is required".to_string(),
            )),
        }
    }

    pub fn settings(&self) -> Result<FirebaseSettings, ConfigError> {
        Ok(FirebaseSettings::new(self.project_id()?)
            .with_jwks_url(self.jwks_url.clone())
            .with_jwks_cache_duration(Duration::from_secs(self.jwks_cache_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                http_port: 8080,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                access_secret: "a".repeat(32),
                refresh_secret: "r".repeat(32),
                access_ttl_minutes: 15,
                refresh_ttl_days: 7,
                max_session_days: 30,
            },
            firebase: FirebaseConfig {
                project_id: Some("fast-todo".to_string()),
                credentials_path: None,
                jwks_url: default_jwks_url(),
                jwks_cache_secs: 3600,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let mut config = config();
        config.jwt.access_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_secret_is_fatal() {
        let mut config = config();
        config.jwt.refresh_secret = config.jwt.access_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_firebase_project_is_fatal() {
        let mut config = config();
        config.firebase.project_id = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", config().jwt);
        assert!(!rendered.contains(&"a".repeat(32)));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_token_settings_lifetimes() {
        let settings = config().jwt.token_settings().unwrap();
        assert_eq!(settings.access_ttl, chrono::Duration::minutes(15));
        assert_eq!(settings.refresh_ttl, chrono::Duration::days(7));
    }

    #[test]
    fn test_out_of_range_lifetimes_are_fatal() {
        let mut config = config();
        config.jwt.refresh_ttl_days = i64::MAX;
        assert!(config.validate().is_err());
        assert!(config.jwt.token_settings().is_err());

        let mut config = self::config();
        config.jwt.max_session_days = 100_000;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.jwt.access_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }
}
