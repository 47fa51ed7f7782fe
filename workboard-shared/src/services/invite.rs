/// Joining by invite code
///
/// Anyone holding a workspace's invite code can join it as a MEMBER.
/// Resetting the code (see `workspace::reset_invite_code`) invalidates it.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::permissions::RoleName;
use crate::models::{
    member::{CreateMember, Member},
    role::Role,
    workspace::Workspace,
};

/// Result of a successful join
#[derive(Debug, Clone, Serialize)]
pub struct JoinedWorkspace {
    pub workspace_id: Uuid,
    pub role: RoleName,
}

/// Adds the user to the workspace behind `invite_code`
///
/// # Errors
///
/// - `NotFound` for an unknown code
/// - `Conflict` if the user is already a member
pub async fn join_by_code(pool: &PgPool, user_id: Uuid, invite_code: &str) -> ServiceResult<JoinedWorkspace> {
    let workspace = Workspace::find_by_invite_code(pool, invite_code)
        .await?
        .ok_or(ServiceError::NotFound("Invite code"))?;

    if Member::exists(pool, workspace.id, user_id).await? {
        return Err(ServiceError::Conflict(
            "You are already a member of this workspace".to_string(),
        ));
    }

    let role = Role::find_by_name(pool, RoleName::Member)
        .await?
        .ok_or(ServiceError::NotFound("Member role"))?;

    // A concurrent join surfaces as a unique violation, reported as 409 upstream.
    Member::create(
        pool,
        CreateMember {
            user_id,
            workspace_id: workspace.id,
            role_id: role.id,
        },
    )
    .await?;

    info!(user_id = %user_id, workspace_id = %workspace.id, "User joined workspace");
    Ok(JoinedWorkspace {
        workspace_id: workspace.id,
        role: role.name,
    })
}
