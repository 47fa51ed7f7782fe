/// Role rows
///
/// One row per [`RoleName`], written by the start-up seeder. The stored
/// `permissions` array mirrors the static table at seed time; authorization
/// always consults the static table, never this column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::auth::permissions::RoleName;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Role id and name, as listed next to workspace members
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleSummary {
    pub id: Uuid,
    pub name: RoleName,
}

impl Role {
    pub async fn find_by_name<'e, E>(executor: E, name: RoleName) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, permissions, created_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<RoleSummary>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, RoleSummary>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(executor)
            .await
    }

    /// Inserts the role unless a row with that name already exists
    ///
    /// Returns `true` if a row was inserted. Existing rows are left untouched.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        name: RoleName,
        permissions: &[String],
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO roles (name, permissions)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(permissions)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
