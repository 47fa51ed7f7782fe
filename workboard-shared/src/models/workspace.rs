/// Workspace model: the tenant boundary
///
/// A workspace owns its members, projects and tasks; deleting it cascades to
/// all three. Each workspace has a unique invite code that lets users join
/// it as `MEMBER`.
///
/// ```sql
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     invite_code VARCHAR(32) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Length of generated invite codes
pub const INVITE_CODE_LEN: usize = 8;

/// Generates an invite code: 8 uppercase characters from a random UUID
///
/// # Example
///
/// ```
/// use workboard_shared::models::workspace::generate_invite_code;
///
/// let code = generate_invite_code();
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, code.to_uppercase());
/// ```
pub fn generate_invite_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(INVITE_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl Workspace {
    /// Inserts a workspace with a freshly generated invite code
    pub async fn create<'e, E>(executor: E, data: CreateWorkspace) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name, description, owner_id, invite_code)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, owner_id, invite_code, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .bind(generate_invite_code())
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, description, owner_id, invite_code, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_invite_code<'e, E>(
        executor: E,
        invite_code: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, description, owner_id, invite_code, created_at, updated_at
            FROM workspaces
            WHERE invite_code = $1
            "#,
        )
        .bind(invite_code)
        .fetch_optional(executor)
        .await
    }

    /// Workspaces the user belongs to, oldest membership first
    pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT w.id, w.name, w.description, w.owner_id, w.invite_code, w.created_at, w.updated_at
            FROM workspaces w
            JOIN members m ON m.workspace_id = w.id
            WHERE m.user_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Updates name and, when given, description
    ///
    /// `None` keeps the current description.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspaces
            SET name = $2, description = COALESCE($3, description), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, invite_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(executor)
        .await
    }

    /// Replaces the invite code; the old code stops working immediately
    pub async fn reset_invite_code<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspaces
            SET invite_code = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, invite_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(generate_invite_code())
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_format() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_invite_codes_vary() {
        assert_ne!(generate_invite_code(), generate_invite_code());
    }
}
