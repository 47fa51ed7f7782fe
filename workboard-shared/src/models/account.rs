/// External identity linkage
///
/// An account ties a user to one identity provider. Email/password sign-up
/// is modelled as the `EMAIL` provider with the email as provider id, so a
/// user who later signs in with Google simply gains a second account row.
///
/// ```sql
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     provider account_provider NOT NULL,
///     provider_id VARCHAR(255) NOT NULL,
///     refresh_token TEXT,
///     token_expiry TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (provider, provider_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_provider", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountProvider {
    Google,
    Github,
    Facebook,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: AccountProvider,
    pub provider_id: String,
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Links a provider identity to a user
    ///
    /// # Errors
    ///
    /// Unique violation on `accounts_provider_provider_id_key` if the
    /// identity is already linked.
    pub async fn create<'e, E>(
        executor: E,
        user_id: Uuid,
        provider: AccountProvider,
        provider_id: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, provider, provider_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, provider, provider_id, refresh_token, token_expiry, created_at
            "#,
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_id)
        .fetch_one(executor)
        .await
    }

    /// True if the user already has an account with this provider
    pub async fn user_has_provider<'e, E>(
        executor: E,
        user_id: Uuid,
        provider: AccountProvider,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE user_id = $1 AND provider = $2)",
        )
        .bind(user_id)
        .bind(provider)
        .fetch_one(executor)
        .await
    }
}
