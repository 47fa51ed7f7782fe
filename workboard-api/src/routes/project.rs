/// Project endpoints
///
/// - `POST /project/workspace/:workspace_id/create`
/// - `GET /project/workspace/:workspace_id/all?page_size=&page_number=`
/// - `GET /project/:project_id/workspace/:workspace_id`
/// - `GET /project/:project_id/workspace/:workspace_id/analytics`
/// - `PUT /project/:project_id/workspace/:workspace_id/update`
/// - `DELETE /project/:project_id/workspace/:workspace_id/delete`

use super::path_id;
use crate::{
    app::AppState,
    error::{validation_failed, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;
use workboard_shared::{
    auth::{authorization::ResolvedRole, middleware::AuthContext},
    models::{
        pagination::{PageQuery, Pagination},
        project::{Project, UpdateProject},
        task::TaskAnalytics,
    },
    services::project::{self, NewProject},
};

/// Create / update request
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    pub description: Option<String>,

    /// Defaults to 📊 on create
    #[validate(length(min = 1, max = 16, message = "Emoji must be 1 to 16 characters"))]
    pub emoji: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub message: &'static str,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub message: &'static str,
    pub projects: Vec<Project>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ProjectAnalyticsResponse {
    pub message: &'static str,
    pub analytics: TaskAnalytics,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Extension(role): Extension<ResolvedRole>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    req.validate().map_err(validation_failed)?;

    let project = project::create(
        &state.db,
        role.workspace_id(),
        auth.user_id,
        NewProject {
            name: req.name,
            description: req.description,
            emoji: req.emoji,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: "Project created successfully",
            project,
        }),
    ))
}

/// Newest first, paginated
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ProjectListResponse>> {
    let page = project::list(&state.db, role.workspace_id(), page.normalize()).await?;

    Ok(Json(ProjectListResponse {
        message: "Projects fetched successfully",
        projects: page.items,
        pagination: page.pagination,
    }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<ProjectResponse>> {
    let project_id = path_id(&params, "project_id")?;
    let project = project::get(&state.db, role.workspace_id(), project_id).await?;

    Ok(Json(ProjectResponse {
        message: "Project fetched successfully",
        project,
    }))
}

pub async fn project_analytics(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<ProjectAnalyticsResponse>> {
    let project_id = path_id(&params, "project_id")?;
    let analytics = project::analytics(&state.db, role.workspace_id(), project_id).await?;

    Ok(Json(ProjectAnalyticsResponse {
        message: "Project analytics retrieved successfully",
        analytics,
    }))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let project_id = path_id(&params, "project_id")?;
    req.validate().map_err(validation_failed)?;

    let project = project::update(
        &state.db,
        role.workspace_id(),
        project_id,
        UpdateProject {
            name: req.name,
            description: req.description,
            emoji: req.emoji,
        },
    )
    .await?;

    Ok(Json(ProjectResponse {
        message: "Project updated successfully",
        project,
    }))
}

/// Deletes the project and its tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    let project_id = path_id(&params, "project_id")?;
    project::delete(&state.db, role.workspace_id(), project_id).await?;

    Ok(Json(MessageResponse {
        message: "Project deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_emoji_bounds() {
        let with_emoji = |emoji: Option<String>| ProjectRequest {
            name: "Launch".to_string(),
            description: None,
            emoji,
        };

        assert!(with_emoji(None).validate().is_ok());
        assert!(with_emoji(Some("🚀".to_string())).validate().is_ok());
        assert!(with_emoji(Some("🚀".repeat(16))).validate().is_ok());
        assert!(with_emoji(Some(String::new())).validate().is_err());

        let errors = with_emoji(Some("🚀".repeat(17))).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("emoji"));
    }
}
