use async_trait::async_trait;
use auth::TokenPair;

use crate::account::errors::AccountError;
use crate::account::models::FederatedIdentity;
use crate::account::models::SignInCommand;
use crate::account::models::SignUpCommand;
use crate::session::models::SessionOutcome;

/// Port for session orchestration: turning a proven credential into tokens.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Register with password credentials and open a session.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - An account with this email is already present
    /// * `TokenIssuance` - Tokens could not be signed
    async fn sign_up(&self, command: SignUpCommand) -> Result<SessionOutcome, AccountError>;

    /// Authenticate with password credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    async fn sign_in(&self, command: SignInCommand) -> Result<SessionOutcome, AccountError>;

    /// Open a session from a federated identity assertion, creating the
    /// account on first use. Serves both sign-up and sign-in.
    ///
    /// # Arguments
    /// * `id_token` - Provider-signed assertion exactly as received
    ///
    /// # Errors
    /// * `InvalidIdentityToken` - Assertion rejected by the provider verifier
    /// * `MissingEmailClaim` - Assertion carries no email
    /// * `IdentityProviderUnavailable` - Provider keys could not be fetched
    async fn sign_in_federated(&self, id_token: &str) -> Result<SessionOutcome, AccountError>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token is invalid or expired, the session is
    ///   past its maximum age, or the account no longer exists
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError>;
}

/// Outbound port for verifying federated identity assertions.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Verify an assertion and return the identity it proves.
    ///
    /// # Errors
    /// * `InvalidIdentityToken` - Signature, audience, issuer or expiry check failed
    /// * `MissingEmailClaim` - Assertion carries no usable email
    /// * `IdentityProviderUnavailable` - Provider could not be reached
    async fn verify(&self, id_token: &str) -> Result<FederatedIdentity, AccountError>;
}
