/// Current user
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::user::User;

pub async fn current(pool: &PgPool, user_id: Uuid) -> ServiceResult<User> {
    User::find_by_id(pool, user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))
}

/// Makes `workspace_id` the user's current workspace
///
/// Membership is checked by the workspace gate before this runs.
pub async fn switch_current_workspace(
    pool: &PgPool,
    user_id: Uuid,
    workspace_id: Uuid,
) -> ServiceResult<User> {
    if !User::set_current_workspace(pool, user_id, Some(workspace_id)).await? {
        return Err(ServiceError::NotFound("User"));
    }

    debug!(user_id = %user_id, workspace_id = %workspace_id, "Current workspace switched");
    current(pool, user_id).await
}
