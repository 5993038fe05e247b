use thiserror::Error;

/// Error type for federated identity assertions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FederatedError {
    #[error("Invalid identity assertion: {0}")]
    InvalidAssertion(String),

    #[error("Identity assertion has no email claim")]
    MissingEmailClaim,

    #[error("Identity assertion email is not verified")]
    UnverifiedEmail,

    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Identity provider configuration error: {0}")]
    Configuration(String),
}
