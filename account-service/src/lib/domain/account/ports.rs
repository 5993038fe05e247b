use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::FederatedIdentity;
use crate::account::models::SignInCommand;
use crate::account::models::SignUpCommand;

/// Port for identity resolution: establishing which account a request speaks for.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Create an account from password credentials.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and optional display name
    ///
    /// # Returns
    /// Created account
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - An account with this email is already present
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up_local(&self, command: SignUpCommand) -> Result<Account, AccountError>;

    /// Authenticate with password credentials and record the sign-in.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such account, or the password does not match
    /// * `DatabaseError` - Database operation failed
    async fn sign_in_local(&self, command: SignInCommand) -> Result<Account, AccountError>;

    /// Find or create the account for a verified federated identity.
    ///
    /// Absence is the creation trigger, not an error. An existing account
    /// keeps its password; its display name is only filled in when empty.
    ///
    /// # Errors
    /// * `Hashing` - Placeholder digest could not be produced
    /// * `DatabaseError` - Database operation failed
    async fn resolve_federated(&self, identity: FederatedIdentity)
        -> Result<Account, AccountError>;

    /// Retrieve account by email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn get_account_by_email(&self, email: &EmailAddress) -> Result<Account, AccountError>;

    /// Replace the display name of an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_display_name(
        &self,
        id: &AccountId,
        name: DisplayName,
    ) -> Result<Account, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations must enforce email uniqueness themselves (unique index or
/// equivalent); the service never relies on check-then-insert.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by exact email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Mark a successful sign-in.
    ///
    /// Sets `updated_at` to `at`. When `display_name` is given and the stored
    /// name is empty, stores it; a non-empty stored name is never replaced.
    ///
    /// # Returns
    /// The account after the update
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn record_sign_in(
        &self,
        id: &AccountId,
        display_name: Option<DisplayName>,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError>;

    /// Overwrite the display name.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_display_name(
        &self,
        id: &AccountId,
        display_name: DisplayName,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError>;
}
