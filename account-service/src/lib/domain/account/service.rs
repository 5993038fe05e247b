use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::FederatedIdentity;
use crate::account::models::SignInCommand;
use crate::account::models::SignUpCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Argon2 work is CPU bound, so hashing and verification run on the blocking
/// pool instead of the request's worker thread.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
    dummy_hash: OnceCell<String>,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
            dummy_hash: OnceCell::new(),
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn hash_unusable(&self) -> Result<String, AccountError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash_unusable())
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    /// A malformed stored digest counts as a mismatch.
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AccountError> {
        let hasher = self.password_hasher;
        let outcome = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AccountError::Unknown(format!("Verification task failed: {}", e)))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::error!(error = %e, "Stored password digest could not be verified");
                Ok(false)
            }
        }
    }

    async fn dummy_hash(&self) -> Result<&String, AccountError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash_unusable())
            .await
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: AccountRepository,
{
    async fn sign_up_local(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AccountError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            display_name: command.display_name,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(account).await?;
        tracing::info!(account_id = %created.id, "Account created with password credentials");

        Ok(created)
    }

    async fn sign_in_local(&self, command: SignInCommand) -> Result<Account, AccountError> {
        let password = command.password.expose().to_string();

        let Some(account) = self.repository.find_by_email(&command.email).await? else {
            let dummy = self.dummy_hash().await?.clone();
            self.verify_password(password, dummy).await?;
            tracing::debug!("Sign-in rejected: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self
            .verify_password(password, account.password_hash.clone())
            .await?
        {
            tracing::debug!(account_id = %account.id, "Sign-in rejected: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        self.repository
            .record_sign_in(&account.id, None, Utc::now())
            .await
    }

    async fn resolve_federated(
        &self,
        identity: FederatedIdentity,
    ) -> Result<Account, AccountError> {
        if let Some(existing) = self.repository.find_by_email(&identity.email).await? {
            return self
                .repository
                .record_sign_in(&existing.id, identity.display_name, Utc::now())
                .await;
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: identity.email.clone(),
            password_hash: self.hash_unusable().await?,
            display_name: identity.display_name.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.repository.create(account).await {
            Ok(created) => {
                tracing::info!(account_id = %created.id, "Account created from federated identity");
                Ok(created)
            }
            Err(AccountError::EmailAlreadyExists(_)) => {
                tracing::debug!("Concurrent federated sign-up, resolving existing account");
                let existing = self
                    .repository
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| AccountError::NotFound(identity.email.to_string()))?;

                self.repository
                    .record_sign_in(&existing.id, identity.display_name, Utc::now())
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn get_account_by_email(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound(email.to_string()))
    }

    async fn update_display_name(
        &self,
        id: &AccountId,
        name: DisplayName,
    ) -> Result<Account, AccountError> {
        let updated = self
            .repository
            .update_display_name(id, name, Utc::now())
            .await?;
        tracing::info!(account_id = %updated.id, "Display name updated");

        Ok(updated)
    }
}
