/// Workspace lifecycle
///
/// Creation and deletion touch several tables and always run in one
/// transaction. Deleting a workspace also repoints every affected user's
/// current workspace to their oldest remaining membership, or clears it.

use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::permissions::RoleName;
use crate::models::{
    member::{CreateMember, Member, MemberDetail},
    project::Project,
    role::{Role, RoleSummary},
    task::{Task, TaskAnalytics},
    user::User,
    workspace::{CreateWorkspace, Workspace},
};

/// Name and description of a new workspace
#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub name: String,
    pub description: Option<String>,
}

impl NewWorkspace {
    /// The workspace every new user starts with
    pub fn personal(owner_name: &str) -> Self {
        Self {
            name: "My Workspace".to_string(),
            description: Some(format!("Workspace created for {}", owner_name)),
        }
    }
}

/// A workspace together with its members
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceWithMembers {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub members: Vec<MemberDetail>,
}

/// Member listing plus the roles a member can be given
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceMembers {
    pub members: Vec<MemberDetail>,
    pub roles: Vec<RoleSummary>,
}

/// Creates a workspace owned by `owner_id` and makes it their current one
///
/// # Errors
///
/// `NotFound("Owner role")` if roles were never seeded; nothing is written
/// in that case.
pub async fn create(
    conn: &mut PgConnection,
    owner_id: Uuid,
    input: NewWorkspace,
) -> ServiceResult<Workspace> {
    let mut tx = conn.begin().await?;

    let workspace = Workspace::create(
        &mut *tx,
        CreateWorkspace {
            name: input.name,
            description: input.description,
            owner_id,
        },
    )
    .await?;

    let owner_role = Role::find_by_name(&mut *tx, RoleName::Owner)
        .await?
        .ok_or(ServiceError::NotFound("Owner role"))?;

    Member::create(
        &mut *tx,
        CreateMember {
            user_id: owner_id,
            workspace_id: workspace.id,
            role_id: owner_role.id,
        },
    )
    .await?;

    User::set_current_workspace(&mut *tx, owner_id, Some(workspace.id)).await?;

    tx.commit().await?;

    info!(workspace_id = %workspace.id, owner_id = %owner_id, "Workspace created");
    Ok(workspace)
}

/// Every workspace the user is a member of
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> ServiceResult<Vec<Workspace>> {
    Ok(Workspace::list_for_user(pool, user_id).await?)
}

pub async fn get(pool: &PgPool, workspace_id: Uuid) -> ServiceResult<WorkspaceWithMembers> {
    let workspace = find(pool, workspace_id).await?;
    let members = Member::list_details(pool, workspace_id).await?;

    Ok(WorkspaceWithMembers { workspace, members })
}

pub async fn members(pool: &PgPool, workspace_id: Uuid) -> ServiceResult<WorkspaceMembers> {
    let members = Member::list_details(pool, workspace_id).await?;
    let roles = Role::list(pool).await?;

    Ok(WorkspaceMembers { members, roles })
}

pub async fn analytics(pool: &PgPool, workspace_id: Uuid) -> ServiceResult<TaskAnalytics> {
    Ok(Task::analytics_for_workspace(pool, workspace_id).await?)
}

/// Gives a member another role
///
/// `member_user_id` is the member's user id. The owner's role is fixed.
pub async fn change_member_role(
    pool: &PgPool,
    workspace_id: Uuid,
    member_user_id: Uuid,
    role_id: Uuid,
) -> ServiceResult<MemberDetail> {
    let workspace = find(pool, workspace_id).await?;

    let role = Role::find_by_id(pool, role_id)
        .await?
        .ok_or(ServiceError::NotFound("Role"))?;

    if workspace.owner_id == member_user_id {
        return Err(ServiceError::BadRequest(
            "The workspace owner's role cannot be changed".to_string(),
        ));
    }

    if !Member::update_role(pool, workspace_id, member_user_id, role.id).await? {
        return Err(ServiceError::NotFound("Member"));
    }

    info!(
        workspace_id = %workspace_id,
        member = %member_user_id,
        role = %role.name,
        "Member role changed"
    );

    Member::find_detail(pool, workspace_id, member_user_id)
        .await?
        .ok_or(ServiceError::NotFound("Member"))
}

/// Renames the workspace; a missing description keeps the current one
pub async fn update(
    pool: &PgPool,
    workspace_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> ServiceResult<Workspace> {
    Workspace::update(pool, workspace_id, name, description)
        .await?
        .ok_or(ServiceError::NotFound("Workspace"))
}

pub async fn reset_invite_code(pool: &PgPool, workspace_id: Uuid) -> ServiceResult<Workspace> {
    let workspace = Workspace::reset_invite_code(pool, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Workspace"))?;

    info!(workspace_id = %workspace_id, "Invite code reset");
    Ok(workspace)
}

/// Removes a member from the workspace
///
/// The owner cannot be removed. If the workspace was the removed user's
/// current one, it is repointed.
pub async fn remove_member(
    conn: &mut PgConnection,
    workspace_id: Uuid,
    member_user_id: Uuid,
) -> ServiceResult<()> {
    let mut tx = conn.begin().await?;

    let workspace = Workspace::find_by_id(&mut *tx, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Workspace"))?;

    if workspace.owner_id == member_user_id {
        return Err(ServiceError::BadRequest(
            "The workspace owner cannot be removed".to_string(),
        ));
    }

    if !Member::delete(&mut *tx, workspace_id, member_user_id).await? {
        return Err(ServiceError::NotFound("Member"));
    }

    repoint_current_workspace(&mut *tx, member_user_id, workspace_id).await?;

    tx.commit().await?;

    info!(workspace_id = %workspace_id, member = %member_user_id, "Member removed");
    Ok(())
}

/// Deletes the workspace with all its tasks, projects and members
///
/// Only the owner may delete. Returns the caller's current workspace
/// afterwards.
pub async fn delete(
    conn: &mut PgConnection,
    workspace_id: Uuid,
    caller_id: Uuid,
) -> ServiceResult<Option<Uuid>> {
    let mut tx = conn.begin().await?;

    let workspace = Workspace::find_by_id(&mut *tx, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Workspace"))?;

    if workspace.owner_id != caller_id {
        return Err(ServiceError::BadRequest(
            "You are not authorized to delete this workspace".to_string(),
        ));
    }

    let affected = Member::user_ids(&mut *tx, workspace_id).await?;

    let tasks = Task::delete_all_in_workspace(&mut *tx, workspace_id).await?;
    let projects = Project::delete_all_in_workspace(&mut *tx, workspace_id).await?;
    Member::delete_all_in_workspace(&mut *tx, workspace_id).await?;

    for user_id in &affected {
        repoint_current_workspace(&mut *tx, *user_id, workspace_id).await?;
    }

    Workspace::delete(&mut *tx, workspace_id).await?;

    let current = User::find_by_id(&mut *tx, caller_id)
        .await?
        .and_then(|user| user.current_workspace_id);

    tx.commit().await?;

    info!(
        workspace_id = %workspace_id,
        members = affected.len(),
        projects,
        tasks,
        "Workspace deleted"
    );
    Ok(current)
}

async fn find(pool: &PgPool, workspace_id: Uuid) -> ServiceResult<Workspace> {
    Workspace::find_by_id(pool, workspace_id)
        .await?
        .ok_or(ServiceError::NotFound("Workspace"))
}

/// Moves the user off `leaving` if it is their current workspace
async fn repoint_current_workspace(
    conn: &mut PgConnection,
    user_id: Uuid,
    leaving: Uuid,
) -> ServiceResult<()> {
    let Some(user) = User::find_by_id(&mut *conn, user_id).await? else {
        return Ok(());
    };

    if user.current_workspace_id != Some(leaving) {
        return Ok(());
    }

    let next = Member::fallback_workspace(&mut *conn, user_id, leaving).await?;
    User::set_current_workspace(&mut *conn, user_id, next).await?;

    debug!(user_id = %user_id, next = ?next, "Current workspace repointed");
    Ok(())
}
