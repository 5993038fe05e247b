//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - Session token issuance and verification (HS256 JWT, separate access and refresh secrets)
//! - Federated identity verification (Firebase ID tokens checked against Google's JWKS)
//!
//! Each service defines its own authentication ports and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{TokenIssuer, TokenSettings};
//!
//! let issuer = TokenIssuer::new(TokenSettings::new(
//!     "access_secret_key_at_least_32_bytes!",
//!     "refresh_secret_key_at_least_32_bytes",
//! ))
//! .unwrap();
//!
//! let pair = issuer.issue_pair("a@x.com").unwrap();
//! let claims = issuer.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.email, "a@x.com");
//! assert!(issuer.verify_access(&pair.refresh_token).is_err());
//! ```

pub mod federated;
pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use federated::FederatedClaims;
pub use federated::FederatedError;
pub use federated::FirebaseSettings;
pub use federated::FirebaseVerifier;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenIssuer;
pub use tokens::TokenPair;
pub use tokens::TokenSettings;
