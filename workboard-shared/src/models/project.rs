/// Project model
///
/// Projects group tasks inside one workspace. Every lookup is scoped by
/// workspace id, so a project id taken from another workspace behaves as if
/// it does not exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::pagination::Page;

/// Emoji used when the client does not pick one
pub const DEFAULT_EMOJI: &str = "📊";

const PROJECT_COLUMNS: &str =
    "id, name, description, emoji, workspace_id, created_by_id, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub emoji: String,
    pub workspace_id: Uuid,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub workspace_id: Uuid,
    pub created_by_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

/// Project id/name/emoji, embedded in task listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
}

impl Project {
    pub async fn create<'e, E>(executor: E, data: CreateProject) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (name, description, emoji, workspace_id, created_by_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string()))
        .bind(data.workspace_id)
        .bind(data.created_by_id)
        .fetch_one(executor)
        .await
    }

    /// Finds a project only if it belongs to the workspace
    pub async fn find_in_workspace<'e, E>(
        executor: E,
        id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND workspace_id = $2"
        ))
        .bind(id)
        .bind(workspace_id)
        .fetch_optional(executor)
        .await
    }

    /// One page of a workspace's projects, newest first
    pub async fn list_page<'e, E>(
        executor: E,
        workspace_id: Uuid,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(workspace_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await
    }

    pub async fn count_in_workspace<'e, E>(executor: E, workspace_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE workspace_id = $1")
            .bind(workspace_id)
            .fetch_one(executor)
            .await
    }

    /// Updates name, and emoji/description when given
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        workspace_id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $3,
                description = COALESCE($4, description),
                emoji = COALESCE($5, emoji),
                updated_at = NOW()
            WHERE id = $1 AND workspace_id = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(workspace_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.emoji)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a project; its tasks go with it
    pub async fn delete<'e, E>(executor: E, id: Uuid, workspace_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND workspace_id = $2")
            .bind(id)
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all_in_workspace<'e, E>(executor: E, workspace_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
