use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Error as HashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Length in bytes of the random secret behind an unusable digest.
const PLACEHOLDER_SECRET_LEN: usize = 32;

/// Credential hasher.
///
/// Argon2id with the crate's default cost parameters and a fresh random salt
/// per digest. Digests are PHC strings, so the parameters travel with them and
/// can be raised later without invalidating stored credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.hash_bytes(password.as_bytes())
    }

    /// Produce a digest that no sign-in attempt can match.
    ///
    /// The digest is computed over 32 bytes from the OS random source which
    /// are discarded immediately, so the plaintext behind it is unknowable.
    /// Accounts created through a federated identity provider store one of
    /// these in place of a real credential.
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash_unusable(&self) -> Result<String, PasswordError> {
        let mut secret = [0u8; PLACEHOLDER_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        self.hash_bytes(&secret)
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison inside argon2 is constant-time with respect to the
    /// computed output.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed or uses unsupported parameters
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    fn hash_bytes(&self, secret: &[u8]) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}
