/// Member model: one user, one workspace, one role
///
/// `(user_id, workspace_id)` is unique, so a user holds at most one role per
/// workspace. This row is the only fact authorization relies on.
///
/// ```sql
/// CREATE TABLE members (
///     id UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id),
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, workspace_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::member::{CreateMember, Member};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, workspace_id: Uuid, role_id: Uuid) -> Result<(), sqlx::Error> {
/// Member::create(&pool, CreateMember { user_id, workspace_id, role_id }).await?;
///
/// // A second row for the same pair is a unique violation, never an upsert
/// assert!(Member::create(&pool, CreateMember { user_id, workspace_id, role_id }).await.is_err());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::role::RoleSummary;
use super::user::UserSummary;
use crate::auth::permissions::RoleName;

/// Name of the uniqueness constraint on `(user_id, workspace_id)`
pub const MEMBER_UNIQUE_CONSTRAINT: &str = "members_user_id_workspace_id_key";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateMember {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
}

/// Member with its user and role, as shown in workspace listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetail {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub user: UserSummary,
    pub role: RoleSummary,
}

#[derive(sqlx::FromRow)]
struct MemberDetailRow {
    id: Uuid,
    workspace_id: Uuid,
    joined_at: DateTime<Utc>,
    user_id: Uuid,
    user_name: String,
    user_email: String,
    user_profile_picture: Option<String>,
    role_id: Uuid,
    role_name: RoleName,
}

impl From<MemberDetailRow> for MemberDetail {
    fn from(row: MemberDetailRow) -> Self {
        Self {
            id: row.id,
            workspace_id: row.workspace_id,
            joined_at: row.joined_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                profile_picture: row.user_profile_picture,
            },
            role: RoleSummary {
                id: row.role_id,
                name: row.role_name,
            },
        }
    }
}

const DETAIL_SELECT: &str = r#"
    SELECT m.id, m.workspace_id, m.joined_at,
           u.id AS user_id, u.name AS user_name, u.email AS user_email,
           u.profile_picture AS user_profile_picture,
           r.id AS role_id, r.name AS role_name
    FROM members m
    JOIN users u ON u.id = m.user_id
    JOIN roles r ON r.id = m.role_id
"#;

impl Member {
    /// Adds a user to a workspace
    ///
    /// # Errors
    ///
    /// Unique violation on [`MEMBER_UNIQUE_CONSTRAINT`] if the user is
    /// already a member.
    pub async fn create<'e, E>(executor: E, data: CreateMember) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (user_id, workspace_id, role_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, workspace_id, role_id, joined_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.workspace_id)
        .bind(data.role_id)
        .fetch_one(executor)
        .await
    }

    pub async fn exists<'e, E>(executor: E, workspace_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM members WHERE workspace_id = $1 AND user_id = $2)",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// Members of a workspace with user and role, earliest joiner first
    pub async fn list_details<'e, E>(executor: E, workspace_id: Uuid) -> Result<Vec<MemberDetail>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MemberDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE m.workspace_id = $1 ORDER BY m.joined_at ASC"
        ))
        .bind(workspace_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(MemberDetail::from).collect())
    }

    /// One member (looked up by user id) with user and role
    pub async fn find_detail<'e, E>(
        executor: E,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberDetail>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, MemberDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE m.workspace_id = $1 AND m.user_id = $2"
        ))
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(MemberDetail::from))
    }

    /// Changes a member's role; returns false if there is no such member
    pub async fn update_role<'e, E>(
        executor: E,
        workspace_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE members SET role_id = $3 WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .bind(role_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete<'e, E>(executor: E, workspace_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM members WHERE workspace_id = $1 AND user_id = $2")
            .bind(workspace_id)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all_in_workspace<'e, E>(executor: E, workspace_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM members WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// User ids of everyone in the workspace
    pub async fn user_ids<'e, E>(executor: E, workspace_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT user_id FROM members WHERE workspace_id = $1")
            .bind(workspace_id)
            .fetch_all(executor)
            .await
    }

    /// Oldest workspace the user belongs to other than `excluding`
    pub async fn fallback_workspace<'e, E>(
        executor: E,
        user_id: Uuid,
        excluding: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT workspace_id
            FROM members
            WHERE user_id = $1 AND workspace_id <> $2
            ORDER BY joined_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(excluding)
        .fetch_optional(executor)
        .await
    }
}
