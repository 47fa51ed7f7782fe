/// Task model and filtered listing
///
/// A task belongs to a project and, redundantly, to that project's workspace
/// so that workspace-wide listings and counts need no join.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('BACKLOG', 'TODO', 'IN_PROGRESS', 'IN_REVIEW', 'DONE');
/// CREATE TYPE task_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     task_code VARCHAR(32) NOT NULL UNIQUE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     status task_status NOT NULL DEFAULT 'TODO',
///     priority task_priority NOT NULL DEFAULT 'MEDIUM',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by_id UUID NOT NULL REFERENCES users(id),
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

use super::pagination::Page;
use super::project::ProjectSummary;
use super::user::UserSummary;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BACKLOG" => Ok(TaskStatus::Backlog),
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "IN_REVIEW" => Ok(TaskStatus::InReview),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            other => Err(format!("Unknown task priority: {}", other)),
        }
    }
}

/// Generates a human-readable task code such as `TASK-3F9A01BC`
pub fn generate_task_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("TASK-{}", id[..8].to_uppercase())
}

const TASK_COLUMNS: &str = "id, task_code, title, description, project_id, workspace_id, status, \
    priority, assigned_to, created_by_id, due_date, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub task_code: String,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub created_by_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub created_by_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
}

/// Changes to a task; omitted optional fields are left untouched
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Listing filters; empty vectors mean "no constraint"
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub project_id: Option<Uuid>,
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<TaskPriority>,
    pub assignees: Vec<Uuid>,
    /// Case-insensitive substring of the title
    pub keyword: Option<String>,
    /// Same calendar day (UTC) as the due date
    pub due_date: Option<NaiveDate>,
}

/// Task row with assignee and project summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListing {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<UserSummary>,
    pub project: ProjectSummary,
}

#[derive(sqlx::FromRow)]
struct TaskListingRow {
    #[sqlx(flatten)]
    task: Task,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
    assignee_profile_picture: Option<String>,
    project_name: String,
    project_emoji: String,
}

impl From<TaskListingRow> for TaskListing {
    fn from(row: TaskListingRow) -> Self {
        let assignee = match (row.task.assigned_to, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary {
                id,
                name,
                email,
                profile_picture: row.assignee_profile_picture,
            }),
            _ => None,
        };
        let project = ProjectSummary {
            id: row.task.project_id,
            name: row.project_name,
            emoji: row.project_emoji,
        };

        Self {
            task: row.task,
            assignee,
            project,
        }
    }
}

/// Task counts for a workspace or project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAnalytics {
    pub total_tasks: i64,
    /// Past due and not DONE
    pub overdue_tasks: i64,
    pub completed_tasks: i64,
}

const ANALYTICS_SELECT: &str = r#"
    SELECT COUNT(*) AS total_tasks,
           COUNT(*) FILTER (WHERE due_date < NOW() AND status <> 'DONE') AS overdue_tasks,
           COUNT(*) FILTER (WHERE status = 'DONE') AS completed_tasks
    FROM tasks
"#;

/// Appends the WHERE clause shared by the listing and its count
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, workspace_id: Uuid, filters: &TaskFilters) {
    builder.push(" WHERE t.workspace_id = ").push_bind(workspace_id);

    if let Some(project_id) = filters.project_id {
        builder.push(" AND t.project_id = ").push_bind(project_id);
    }

    if !filters.statuses.is_empty() {
        let names: Vec<String> = filters.statuses.iter().map(|s| s.as_str().to_string()).collect();
        builder.push(" AND t.status::text = ANY(").push_bind(names).push(")");
    }

    if !filters.priorities.is_empty() {
        let names: Vec<String> = filters.priorities.iter().map(|p| p.as_str().to_string()).collect();
        builder.push(" AND t.priority::text = ANY(").push_bind(names).push(")");
    }

    if !filters.assignees.is_empty() {
        builder
            .push(" AND t.assigned_to = ANY(")
            .push_bind(filters.assignees.clone())
            .push(")");
    }

    if let Some(keyword) = filters.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        builder
            .push(" AND t.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(keyword)));
    }

    if let Some(due_date) = filters.due_date {
        builder
            .push(" AND (t.due_date AT TIME ZONE 'UTC')::date = ")
            .push_bind(due_date);
    }
}

/// Escapes LIKE wildcards so the keyword matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Task {
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (task_code, title, description, project_id, workspace_id,
                               status, priority, assigned_to, created_by_id, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(generate_task_code())
        .bind(data.title)
        .bind(data.description)
        .bind(data.project_id)
        .bind(data.workspace_id)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.created_by_id)
        .bind(data.due_date)
        .fetch_one(executor)
        .await
    }

    /// Finds a task only if it belongs to both the project and the workspace
    pub async fn find_scoped<'e, E>(
        executor: E,
        id: Uuid,
        project_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1 AND project_id = $2 AND workspace_id = $3
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(workspace_id)
        .fetch_optional(executor)
        .await
    }

    /// Title, status and priority are replaced; `None` optional fields keep
    /// their stored value
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        project_id: Uuid,
        workspace_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $4, description = COALESCE($5, description), status = $6,
                priority = $7, assigned_to = COALESCE($8, assigned_to),
                due_date = COALESCE($9, due_date), updated_at = NOW()
            WHERE id = $1 AND project_id = $2 AND workspace_id = $3
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(workspace_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.due_date)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid, workspace_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND workspace_id = $2")
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
        let result = sqlx::query("DELETE FROM tasks WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// One page of matching tasks, newest first
    pub async fn list_page<'e, E>(
        executor: E,
        workspace_id: Uuid,
        filters: &TaskFilters,
        page: Page,
    ) -> Result<Vec<TaskListing>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT t.id, t.task_code, t.title, t.description, t.project_id, t.workspace_id,
                   t.status, t.priority, t.assigned_to, t.created_by_id, t.due_date,
                   t.created_at, t.updated_at,
                   u.name AS assignee_name, u.email AS assignee_email,
                   u.profile_picture AS assignee_profile_picture,
                   p.name AS project_name, p.emoji AS project_emoji
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            LEFT JOIN users u ON u.id = t.assigned_to
            "#,
        );
        push_filters(&mut builder, workspace_id, filters);
        builder
            .push(" ORDER BY t.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = builder
            .build_query_as::<TaskListingRow>()
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(TaskListing::from).collect())
    }

    /// Number of tasks matching the filters
    pub async fn count_matching<'e, E>(
        executor: E,
        workspace_id: Uuid,
        filters: &TaskFilters,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t");
        push_filters(&mut builder, workspace_id, filters);

        builder.build_query_scalar::<i64>().fetch_one(executor).await
    }

    pub async fn analytics_for_workspace<'e, E>(
        executor: E,
        workspace_id: Uuid,
    ) -> Result<TaskAnalytics, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskAnalytics>(&format!("{ANALYTICS_SELECT} WHERE workspace_id = $1"))
            .bind(workspace_id)
            .fetch_one(executor)
            .await
    }

    pub async fn analytics_for_project<'e, E>(
        executor: E,
        workspace_id: Uuid,
        project_id: Uuid,
    ) -> Result<TaskAnalytics, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskAnalytics>(&format!(
            "{ANALYTICS_SELECT} WHERE workspace_id = $1 AND project_id = $2"
        ))
        .bind(workspace_id)
        .bind(project_id)
        .fetch_one(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_code_format() {
        let code = generate_task_code();
        assert!(code.starts_with("TASK-"));
        assert_eq!(code.len(), 13);
        assert!(code[5..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_status_names() {
        for status in [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::InReview,
            TaskStatus::Done,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status.as_str())
            );
        }
        assert!("URGENT".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_filters_render_sql() {
        let filters = TaskFilters {
            project_id: Some(Uuid::new_v4()),
            statuses: vec![TaskStatus::Todo, TaskStatus::Done],
            priorities: vec![TaskPriority::High],
            assignees: vec![Uuid::new_v4()],
            keyword: Some("login".to_string()),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t");
        push_filters(&mut builder, Uuid::new_v4(), &filters);
        let sql = builder.sql();

        assert!(sql.contains("t.workspace_id = $1"));
        assert!(sql.contains("t.project_id = $2"));
        assert!(sql.contains("t.status::text = ANY($3)"));
        assert!(sql.contains("t.priority::text = ANY($4)"));
        assert!(sql.contains("t.assigned_to = ANY($5)"));
        assert!(sql.contains("t.title ILIKE $6"));
        assert!(sql.contains("::date = $7"));
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        let filters = TaskFilters {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t");
        push_filters(&mut builder, Uuid::new_v4(), &filters);

        assert!(!builder.sql().contains("ILIKE"));
    }
}
