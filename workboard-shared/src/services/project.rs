/// Projects
///
/// Every lookup is scoped to the workspace from the URL: a project id that
/// exists in another workspace is reported as not found.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::{
    pagination::{Page, Paginated, Pagination},
    project::{CreateProject, Project, UpdateProject},
    task::{Task, TaskAnalytics},
};

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

pub async fn create(
    pool: &PgPool,
    workspace_id: Uuid,
    creator_id: Uuid,
    input: NewProject,
) -> ServiceResult<Project> {
    let project = Project::create(
        pool,
        CreateProject {
            name: input.name,
            description: input.description,
            emoji: input.emoji,
            workspace_id,
            created_by_id: creator_id,
        },
    )
    .await?;

    info!(project_id = %project.id, workspace_id = %workspace_id, "Project created");
    Ok(project)
}

/// One page of the workspace's projects, newest first
pub async fn list(pool: &PgPool, workspace_id: Uuid, page: Page) -> ServiceResult<Paginated<Project>> {
    let total = Project::count_in_workspace(pool, workspace_id).await?;
    let items = Project::list_page(pool, workspace_id, page).await?;

    Ok(Paginated {
        items,
        pagination: Pagination::new(page, total),
    })
}

pub async fn get(pool: &PgPool, workspace_id: Uuid, project_id: Uuid) -> ServiceResult<Project> {
    Project::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Project"))
}

pub async fn update(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
    changes: UpdateProject,
) -> ServiceResult<Project> {
    Project::update(pool, project_id, workspace_id, changes)
        .await?
        .ok_or(ServiceError::NotFound("Project"))
}

/// Deletes the project and, through the foreign key, its tasks
pub async fn delete(pool: &PgPool, workspace_id: Uuid, project_id: Uuid) -> ServiceResult<()> {
    if !Project::delete(pool, project_id, workspace_id).await? {
        return Err(ServiceError::NotFound("Project"));
    }

    info!(project_id = %project_id, workspace_id = %workspace_id, "Project deleted");
    Ok(())
}

pub async fn analytics(
    pool: &PgPool,
    workspace_id: Uuid,
    project_id: Uuid,
) -> ServiceResult<TaskAnalytics> {
    get(pool, workspace_id, project_id).await?;
    Ok(Task::analytics_for_project(pool, workspace_id, project_id).await?)
}
