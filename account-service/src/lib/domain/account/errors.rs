use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is empty")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for client-supplied password validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password is empty")]
    Empty,
}

/// Top-level error for account and session operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid name: {0}")]
    InvalidDisplayName(#[from] DisplayNameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] CredentialError),

    // Domain-level errors
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid identity token: {0}")]
    InvalidIdentityToken(String),

    #[error("Identity token has no email claim")]
    MissingEmailClaim,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    // Infrastructure errors
    #[error("Identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for AccountError {
    fn from(err: auth::PasswordError) -> Self {
        AccountError::Hashing(err.to_string())
    }
}

impl From<auth::JwtError> for AccountError {
    fn from(err: auth::JwtError) -> Self {
        AccountError::TokenIssuance(err.to_string())
    }
}

impl From<auth::FederatedError> for AccountError {
    fn from(err: auth::FederatedError) -> Self {
        match err {
            auth::FederatedError::InvalidAssertion(reason) => {
                AccountError::InvalidIdentityToken(reason)
            }
            auth::FederatedError::UnverifiedEmail => {
                AccountError::InvalidIdentityToken("email is not verified".to_string())
            }
            auth::FederatedError::MissingEmailClaim => AccountError::MissingEmailClaim,
            auth::FederatedError::ProviderUnavailable(reason)
            | auth::FederatedError::Configuration(reason) => {
                AccountError::IdentityProviderUnavailable(reason)
            }
        }
    }
}
