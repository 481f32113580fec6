//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::PasswordHash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::repository::{AccountRepository, CredentialRepository, RoleRegistry};
use crate::domain::value_object::{
    account_id::AccountId, role_name::RoleName, user_name::UserName,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-violation on the canonical user name index into the
/// same conflict the pre-check would have produced
fn map_insert_error(err: sqlx::Error) -> AccountError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AccountError::UserNameTaken;
        }
    }
    AccountError::Database(err)
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountStore {
    async fn insert(
        &self,
        account: &Account,
        credential: &Credential,
        role: &RoleName,
    ) -> AccountResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                user_name,
                user_name_canonical,
                display_name,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.user_name.original())
        .bind(account.user_name.canonical())
        .bind(&account.display_name)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        sqlx::query(
            r#"
            INSERT INTO account_credentials (
                account_id,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credential.account_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_name)
            VALUES ($1, $2)
            ON CONFLICT (account_id, role_name) DO NOTHING
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(role.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                user_name,
                user_name_canonical,
                display_name,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                user_name,
                user_name_canonical,
                display_name,
                created_at,
                updated_at
            FROM accounts
            WHERE user_name_canonical = $1
            "#,
        )
        .bind(user_name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self) -> AccountResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                user_name,
                user_name_canonical,
                display_name,
                created_at,
                updated_at
            FROM accounts
            ORDER BY user_name_canonical
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_account()).collect()
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAccountStore {
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> AccountResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                account_id,
                password_hash,
                created_at,
                updated_at
            FROM account_credentials
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }
}

// ============================================================================
// Role Registry Implementation
// ============================================================================

impl RoleRegistry for PgAccountStore {
    async fn ensure_role(&self, role: &RoleName) -> AccountResult<()> {
        // Idempotent insert-or-ignore: concurrent first-use of the same
        // role cannot error or duplicate it
        sqlx::query(
            r#"
            INSERT INTO roles (role_name)
            VALUES ($1)
            ON CONFLICT (role_name) DO NOTHING
            "#,
        )
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn assign_role(&self, account_id: &AccountId, role: &RoleName) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_name)
            VALUES ($1, $2)
            ON CONFLICT (account_id, role_name) DO NOTHING
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn roles_for_account(&self, account_id: &AccountId) -> AccountResult<Vec<RoleName>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role_name
            FROM account_roles
            WHERE account_id = $1
            ORDER BY assigned_at
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        names
            .into_iter()
            .map(|n| {
                RoleName::new(&n)
                    .map_err(|e| AccountError::Internal(format!("invalid stored role: {e}")))
            })
            .collect()
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    user_name: String,
    #[allow(dead_code)]
    user_name_canonical: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountResult<Account> {
        let user_name = UserName::from_db(&self.user_name)
            .map_err(|e| AccountError::Internal(format!("invalid stored user_name: {e}")))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            user_name,
            display_name: self.display_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    account_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AccountResult<Credential> {
        let password_hash = PasswordHash::from_phc_string(self.password_hash)
            .map_err(|e| AccountError::Internal(format!("invalid stored hash: {e}")))?;

        Ok(Credential {
            account_id: AccountId::from_uuid(self.account_id),
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
