use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            display_name: DisplayName::optional(row.display_name)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, display_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.display_name.as_ref().map(|name| name.as_str()))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return AccountError::EmailAlreadyExists(account.email.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, display_name, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Account::try_from)
        .transpose()
    }

    async fn record_sign_in(
        &self,
        id: &AccountId,
        display_name: Option<DisplayName>,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError> {
        // Stored non-empty names are kept.
        sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET display_name = CASE
                    WHEN COALESCE(display_name, '') = '' THEN COALESCE($2, display_name)
                    ELSE display_name
                END,
                updated_at = $3
            WHERE id = $1
            RETURNING id, email, password_hash, display_name, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(display_name.as_ref().map(|name| name.as_str()))
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| AccountError::NotFound(id.to_string()))
        .and_then(Account::try_from)
    }

    async fn update_display_name(
        &self,
        id: &AccountId,
        display_name: DisplayName,
        at: DateTime<Utc>,
    ) -> Result<Account, AccountError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET display_name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, email, password_hash, display_name, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(display_name.as_str())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| AccountError::NotFound(id.to_string()))
        .and_then(Account::try_from)
    }
}
