/// Membership endpoints
///
/// - `POST /member/workspace/:invite_code/join`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use workboard_shared::{
    auth::{middleware::AuthContext, permissions::RoleName},
    services::invite,
};

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub message: &'static str,
    pub workspace_id: Uuid,
    pub role: RoleName,
}

/// Joins the workspace behind an invite code as a MEMBER
///
/// # Errors
///
/// - `404 Not Found`: Unknown invite code
/// - `409 Conflict`: Already a member
pub async fn join_workspace(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(invite_code): Path<String>,
) -> ApiResult<Json<JoinResponse>> {
    let joined = invite::join_by_code(&state.db, auth.user_id, &invite_code).await?;

    Ok(Json(JoinResponse {
        message: "Successfully joined the workspace",
        workspace_id: joined.workspace_id,
        role: joined.role,
    }))
}
