use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

/// Account store held in process memory.
///
/// Used when no database is configured and by the HTTP tests. Email
/// uniqueness is checked and the insert performed under one write lock.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(account.email.to_string()));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn record_sign_in(
        &self,
        id: &AccountId,
        display_name: Option<DisplayName>,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        if account.display_name.is_none() {
            account.display_name = display_name;
        }
        account.updated_at = at;

        Ok(account.clone())
    }

    async fn update_display_name(
        &self,
        id: &AccountId,
        display_name: DisplayName,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        account.display_name = Some(display_name);
        account.updated_at = at;

        Ok(account.clone())
    }
}
