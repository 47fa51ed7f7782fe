/// Tasks
///
/// A task is addressed by workspace, project and task id together. An
/// assignee must be a member of the task's workspace.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::{
    member::Member,
    pagination::{Page, Paginated, Pagination},
    project::Project,
    task::{CreateTask, Task, TaskFilters, TaskListing, TaskPriority, TaskStatus, UpdateTask},
};

/// Fields of a new task; status and priority default to TODO and MEDIUM
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

pub async fn create(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    creator_id: Uuid,
    input: NewTask,
) -> ServiceResult<Task> {
    ensure_project(pool, workspace_id, project_id).await?;
    ensure_assignee(pool, workspace_id, input.assigned_to).await?;

    let task = Task::create(
        pool,
        CreateTask {
            title: input.title,
            description: input.description,
            project_id,
            workspace_id,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            assigned_to: input.assigned_to,
            created_by_id: creator_id,
            due_date: input.due_date,
        },
    )
    .await?;

    info!(task_id = %task.id, task_code = %task.task_code, project_id = %project_id, "Task created");
    Ok(task)
}

pub async fn update(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    task_id: Uuid,
    changes: UpdateTask,
) -> ServiceResult<Task> {
    ensure_project(pool, workspace_id, project_id).await?;
    ensure_assignee(pool, workspace_id, changes.assigned_to).await?;

    Task::update(pool, task_id, project_id, workspace_id, changes)
        .await?
        .ok_or(ServiceError::NotFound("Task"))
}

/// One page of the workspace's tasks matching `filters`, newest first
pub async fn list(
    pool: &PgPool,
    workspace_id: Uuid,
    filters: &TaskFilters,
    page: Page,
) -> ServiceResult<Paginated<TaskListing>> {
    let total = Task::count_matching(pool, workspace_id, filters).await?;
    let items = Task::list_page(pool, workspace_id, filters, page).await?;

    Ok(Paginated {
        items,
        pagination: Pagination::new(page, total),
    })
}

pub async fn get(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    task_id: Uuid,
) -> ServiceResult<Task> {
    Task::find_scoped(pool, task_id, project_id, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Task"))
}

pub async fn delete(pool: &PgPool, workspace_id: Uuid, task_id: Uuid) -> ServiceResult<()> {
    if !Task::delete(pool, task_id, workspace_id).await? {
        return Err(ServiceError::NotFound("Task"));
    }

    info!(task_id = %task_id, workspace_id = %workspace_id, "Task deleted");
    Ok(())
}

async fn ensure_project(pool: &PgPool, workspace_id: Uuid, project_id: Uuid) -> ServiceResult<()> {
    Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .map(|_| ())
        .ok_or(ServiceError::NotFound("Project"))
}

async fn ensure_assignee(pool: &PgPool, workspace_id: Uuid, assignee: Option<Uuid>) -> ServiceResult<()> {
    if let Some(user_id) = assignee {
        if !Member::exists(pool, workspace_id, user_id).await? {
            return Err(ServiceError::BadRequest(
                "Assigned user is not a member of this workspace".to_string(),
            ));
        }
    }

    Ok(())
}
