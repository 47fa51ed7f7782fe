/// Workspace endpoints
///
/// # Endpoints
///
/// - `POST /workspace/create/new` - Create a workspace owned by the caller
/// - `GET /workspace/all` - Workspaces the caller belongs to
/// - `GET /workspace/:workspace_id` - Workspace with its members
/// - `GET /workspace/members/:workspace_id` - Members and the available roles
/// - `GET /workspace/analytics/:workspace_id` - Task counts
/// - `PUT /workspace/change/member/role/:workspace_id` - Change a member's role
/// - `PUT /workspace/update/:workspace_id` - Rename / describe
/// - `DELETE /workspace/delete/:workspace_id` - Delete with everything in it
/// - `PUT /workspace/invite-code/reset/:workspace_id` - Fresh invite code
/// - `DELETE /workspace/:workspace_id/members/:member_id` - Remove a member
///
/// The required permission of each route is listed in
/// [`Endpoint::required_permissions`](crate::access::Endpoint::required_permissions).

use super::path_id;
use crate::{
    app::AppState,
    error::{validation_failed, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;
use workboard_shared::{
    auth::{authorization::ResolvedRole, middleware::AuthContext},
    models::{member::MemberDetail, role::RoleSummary, task::TaskAnalytics, workspace::Workspace},
    services::workspace::{self, NewWorkspace, WorkspaceWithMembers},
};

/// Create / update request
#[derive(Debug, Deserialize, Validate)]
pub struct WorkspaceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    pub description: Option<String>,
}

/// Change role request; `member_id` is the member's user id
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role_id: Uuid,
    pub member_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub message: &'static str,
    pub workspace: Workspace,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceListResponse {
    pub message: &'static str,
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceDetailResponse {
    pub message: &'static str,
    pub workspace: WorkspaceWithMembers,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub message: &'static str,
    pub members: Vec<MemberDetail>,
    pub roles: Vec<RoleSummary>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub message: &'static str,
    pub analytics: TaskAnalytics,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub message: &'static str,
    pub member: MemberDetail,
}

#[derive(Debug, Serialize)]
pub struct DeleteWorkspaceResponse {
    pub message: &'static str,
    /// Caller's current workspace after the deletion
    pub current_workspace: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Creates a workspace and makes it the caller's current one
pub async fn create_workspace(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<WorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<WorkspaceResponse>)> {
    req.validate().map_err(validation_failed)?;

    let mut conn = state.db.acquire().await?;
    let workspace = workspace::create(
        &mut *conn,
        auth.user_id,
        NewWorkspace {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkspaceResponse {
            message: "Workspace created successfully",
            workspace,
        }),
    ))
}

pub async fn list_workspaces(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<WorkspaceListResponse>> {
    let workspaces = workspace::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(WorkspaceListResponse {
        message: "User workspaces fetched successfully",
        workspaces,
    }))
}

pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<WorkspaceDetailResponse>> {
    let workspace = workspace::get(&state.db, role.workspace_id()).await?;

    Ok(Json(WorkspaceDetailResponse {
        message: "Workspace fetched successfully",
        workspace,
    }))
}

pub async fn workspace_members(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<MembersResponse>> {
    let members = workspace::members(&state.db, role.workspace_id()).await?;

    Ok(Json(MembersResponse {
        message: "Workspace members retrieved successfully",
        members: members.members,
        roles: members.roles,
    }))
}

pub async fn workspace_analytics(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let analytics = workspace::analytics(&state.db, role.workspace_id()).await?;

    Ok(Json(AnalyticsResponse {
        message: "Workspace analytics retrieved successfully",
        analytics,
    }))
}

/// Gives a member another role
///
/// # Errors
///
/// - `400 Bad Request`: Target is the workspace owner
/// - `404 Not Found`: Unknown role or member
pub async fn change_member_role(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let member = workspace::change_member_role(
        &state.db,
        role.workspace_id(),
        req.member_id,
        req.role_id,
    )
    .await?;

    Ok(Json(MemberResponse {
        message: "Member role changed successfully",
        member,
    }))
}

pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Json(req): Json<WorkspaceRequest>,
) -> ApiResult<Json<WorkspaceResponse>> {
    req.validate().map_err(validation_failed)?;

    let workspace = workspace::update(
        &state.db,
        role.workspace_id(),
        &req.name,
        req.description.as_deref(),
    )
    .await?;

    Ok(Json(WorkspaceResponse {
        message: "Workspace updated successfully",
        workspace,
    }))
}

/// Deletes the workspace with its projects, tasks and memberships
///
/// Only the owner may do this, even though admins hold `DELETE_WORKSPACE`.
pub async fn delete_workspace(
    State(state): State<AppState>,
    auth: AuthContext,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<DeleteWorkspaceResponse>> {
    let mut conn = state.db.acquire().await?;
    let current_workspace = workspace::delete(&mut *conn, role.workspace_id(), auth.user_id).await?;

    info!(workspace_id = %role.workspace_id(), user_id = %auth.user_id, "Workspace deleted");

    Ok(Json(DeleteWorkspaceResponse {
        message: "Workspace deleted successfully",
        current_workspace,
    }))
}

pub async fn reset_invite_code(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<WorkspaceResponse>> {
    let workspace = workspace::reset_invite_code(&state.db, role.workspace_id()).await?;

    Ok(Json(WorkspaceResponse {
        message: "Invite code reset successfully",
        workspace,
    }))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(role): Extension<ResolvedRole>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    let member_id = path_id(&params, "member_id")?;

    let mut conn = state.db.acquire().await?;
    workspace::remove_member(&mut *conn, role.workspace_id(), member_id).await?;

    Ok(Json(MessageResponse {
        message: "Member removed successfully",
    }))
}
