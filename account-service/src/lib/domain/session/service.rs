use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenIssuer;
use auth::TokenPair;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::SignInCommand;
use crate::account::models::SignUpCommand;
use crate::account::ports::AccountServicePort;
use crate::session::models::SessionOutcome;
use crate::session::ports::IdentityProvider;
use crate::session::ports::SessionServicePort;

/// Session orchestrator.
///
/// Every flow ends the same way: once an account is resolved, a new pair of
/// tokens is minted for its email.
pub struct SessionService {
    accounts: Arc<dyn AccountServicePort>,
    identity_provider: Arc<dyn IdentityProvider>,
    tokens: Arc<TokenIssuer>,
}

impl SessionService {
    /// Create a new session service.
    ///
    /// # Arguments
    /// * `accounts` - Identity resolver
    /// * `identity_provider` - Federated assertion verifier
    /// * `tokens` - Session token issuer
    pub fn new(
        accounts: Arc<dyn AccountServicePort>,
        identity_provider: Arc<dyn IdentityProvider>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            identity_provider,
            tokens,
        }
    }

    fn open_session(&self, account: Account) -> Result<SessionOutcome, AccountError> {
        let tokens = self.tokens.issue_pair(account.email.as_str())?;
        tracing::info!(account_id = %account.id, "Session opened");

        Ok(SessionOutcome::new(account, tokens))
    }
}

#[async_trait]
impl SessionServicePort for SessionService {
    async fn sign_up(&self, command: SignUpCommand) -> Result<SessionOutcome, AccountError> {
        let account = self.accounts.sign_up_local(command).await?;
        self.open_session(account)
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<SessionOutcome, AccountError> {
        let account = self.accounts.sign_in_local(command).await?;
        self.open_session(account)
    }

    async fn sign_in_federated(&self, id_token: &str) -> Result<SessionOutcome, AccountError> {
        let id_token = id_token.trim();
        if id_token.is_empty() {
            return Err(AccountError::InvalidIdentityToken(
                "identity token is empty".to_string(),
            ));
        }

        let identity = self.identity_provider.verify(id_token).await?;
        let account = self.accounts.resolve_federated(identity).await?;
        self.open_session(account)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            AccountError::InvalidRefreshToken
        })?;

        let email =
            EmailAddress::new(claims.email).map_err(|_| AccountError::InvalidRefreshToken)?;

        let account = match self.accounts.get_account_by_email(&email).await {
            Ok(account) => account,
            Err(AccountError::NotFound(_)) => {
                tracing::debug!("Refresh token subject no longer exists");
                return Err(AccountError::InvalidRefreshToken);
            }
            Err(e) => return Err(e),
        };

        let tokens = self
            .tokens
            .issue_pair_at(account.email.as_str(), claims.auth_time, Utc::now())?;
        tracing::debug!(account_id = %account.id, "Session refreshed");

        Ok(tokens)
    }
}
