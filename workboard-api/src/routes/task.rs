/// Task endpoints
///
/// - `POST /task/project/:project_id/workspace/:workspace_id/create`
/// - `PUT /task/:task_id/project/:project_id/workspace/:workspace_id/update`
/// - `GET /task/workspace/:workspace_id/all`
/// - `GET /task/:task_id/project/:project_id/workspace/:workspace_id`
/// - `DELETE /task/:task_id/workspace/:workspace_id/delete`
///
/// # Listing filters
///
/// ```text
/// GET /task/workspace/{id}/all?status=TODO,IN_PROGRESS&priority=HIGH
///     &assigned_to={uuid},{uuid}&project_id={uuid}&keyword=login
///     &due_date=2025-03-01&page_size=20&page_number=2
/// ```
///
/// List values are comma separated. `due_date` matches the calendar day and
/// accepts `YYYY-MM-DD` or an RFC 3339 timestamp.

use super::path_id;
use crate::{
    app::AppState,
    error::{validation_failed, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr};
use uuid::Uuid;
use validator::Validate;
use workboard_shared::{
    auth::{authorization::ResolvedRole, middleware::AuthContext},
    models::{
        pagination::{Page, PageQuery, Pagination},
        task::{Task, TaskFilters, TaskListing, TaskPriority, TaskStatus, UpdateTask},
    },
    services::task::{self, NewTask},
};

/// Create task request; status and priority default to TODO / MEDIUM
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,

    /// Must be a member of the workspace
    pub assigned_to: Option<Uuid>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Raw listing query
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub project_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub keyword: Option<String>,
    pub due_date: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl TaskListQuery {
    pub fn filters(&self) -> ApiResult<TaskFilters> {
        let project_id = match non_empty(self.project_id.as_deref()) {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| invalid("project_id"))?),
            None => None,
        };

        Ok(TaskFilters {
            project_id,
            statuses: parse_list(self.status.as_deref(), "status")?,
            priorities: parse_list(self.priority.as_deref(), "priority")?,
            assignees: parse_list(self.assigned_to.as_deref(), "assigned_to")?,
            keyword: non_empty(self.keyword.as_deref()).map(str::to_string),
            due_date: non_empty(self.due_date.as_deref())
                .map(parse_due_date)
                .transpose()?,
        })
    }

    pub fn page(&self) -> Page {
        PageQuery {
            page_size: self.page_size,
            page_number: self.page_number,
        }
        .normalize()
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub message: &'static str,
    pub tasks: Vec<TaskListing>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let project_id = path_id(&params, "project_id")?;
    req.validate().map_err(validation_failed)?;

    let task = task::create(
        &state.db,
        role.workspace_id(),
        project_id,
        auth.user_id,
        NewTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            assigned_to: req.assigned_to,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = path_id(&params, "task_id")?;
    let project_id = path_id(&params, "project_id")?;
    req.validate().map_err(validation_failed)?;

    let task = task::update(
        &state.db,
        role.workspace_id(),
        project_id,
        task_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            assigned_to: req.assigned_to,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully",
        task,
    }))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let filters = query.filters()?;
    let page = task::list(&state.db, role.workspace_id(), &filters, query.page()).await?;

    Ok(Json(TaskListResponse {
        message: "All tasks fetched successfully",
        tasks: page.items,
        pagination: page.pagination,
    }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = path_id(&params, "task_id")?;
    let project_id = path_id(&params, "project_id")?;

    let task = task::get(&state.db, role.workspace_id(), project_id, task_id).await?;

    Ok(Json(TaskResponse {
        message: "Task fetched successfully",
        task,
    }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_id(&params, "task_id")?;
    task::delete(&state.db, role.workspace_id(), task_id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(field: &str) -> ApiError {
    ApiError::ValidationError(vec![ValidationErrorDetail {
        field: field.to_string(),
        message: format!("Invalid {}", field),
    }])
}

/// Splits a comma separated query value, skipping blanks
fn parse_list<T: FromStr>(raw: Option<&str>, field: &str) -> ApiResult<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| invalid(field)))
        .collect()
}

fn parse_due_date(raw: &str) -> ApiResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| invalid("due_date"))
}
