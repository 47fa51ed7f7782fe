/// Current user endpoints
///
/// - `GET /user/current`
/// - `PUT /user/current-workspace/:workspace_id` (caller must be a member)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use workboard_shared::{
    auth::{authorization::ResolvedRole, middleware::AuthContext},
    models::user::User,
    services::user,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: User,
}

pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<UserResponse>> {
    let user = user::current(&state.db, auth.user_id).await?;

    Ok(Json(UserResponse {
        message: "User fetched successfully",
        user,
    }))
}

/// Makes the gated workspace the caller's current one
pub async fn switch_current_workspace(
    State(state): State<AppState>,
    auth: AuthContext,
    Extension(role): Extension<ResolvedRole>,
) -> ApiResult<Json<UserResponse>> {
    let user = user::switch_current_workspace(&state.db, auth.user_id, role.workspace_id()).await?;

    Ok(Json(UserResponse {
        message: "Current workspace updated successfully",
        user,
    }))
}
