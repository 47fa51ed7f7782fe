/// Workspace membership resolution and the authorization gate
///
/// Authorization is a two-stage pipeline that always runs in the same order:
///
/// 1. **Resolve**: look up the caller's role in the target workspace
///    ([`resolve_role`]). This is a single query on the `(user_id, workspace_id)`
///    key of `members`, joined to `roles` for the name.
/// 2. **Check**: admit iff the role's permission set shares at least one
///    permission with the endpoint's requirement ([`ResolvedRole::check`]).
///
/// [`ResolvedRole`] has no public constructor, so the check cannot run
/// without the resolve step having succeeded first.
///
/// Endpoints that declare no requirement, or that carry no workspace in their
/// path, are admitted without touching the database.
///
/// # Example
///
/// ```no_run
/// use workboard_shared::auth::authorization::{authorize, Admission};
/// use workboard_shared::auth::permissions::{Permission, PermissionSet};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, workspace_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let required = PermissionSet::only(Permission::DeleteTask);
///
/// match authorize(&pool, user_id, Some(workspace_id), required).await? {
///     Admission::Member(role) => println!("admitted as {}", role.role()),
///     Admission::Unrestricted => println!("no workspace check needed"),
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::permissions::{PermissionSet, RoleName};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Target workspace does not exist
    #[error("Workspace {0} not found")]
    WorkspaceNotFound(Uuid),

    /// Caller has no membership row in the workspace
    #[error("Not a member of workspace {0}")]
    NotAMember(Uuid),

    /// Caller's role shares no permission with the requirement
    #[error("Insufficient permissions: role {role} holds none of {required:?}")]
    InsufficientPermission {
        role: RoleName,
        required: PermissionSet,
    },

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Outcome of a membership lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipLookup {
    /// No workspace with that id
    WorkspaceMissing,

    /// Workspace exists, caller has no member row
    NotAMember,

    /// Caller holds this role in the workspace
    Member(RoleName),
}

/// Source of membership facts for the gate
///
/// `PgPool` is the production implementation; tests can provide an
/// in-memory directory.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Performs the single (user, workspace) lookup
    async fn lookup(&self, workspace_id: Uuid, user_id: Uuid)
        -> Result<MembershipLookup, sqlx::Error>;
}

#[async_trait]
impl MembershipDirectory for PgPool {
    async fn lookup(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<MembershipLookup, sqlx::Error> {
        let row: Option<(Option<RoleName>,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM workspaces w
            LEFT JOIN members m ON m.workspace_id = w.id AND m.user_id = $2
            LEFT JOIN roles r ON r.id = m.role_id
            WHERE w.id = $1
            "#,
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(self)
        .await?;

        Ok(match row {
            None => MembershipLookup::WorkspaceMissing,
            Some((None,)) => MembershipLookup::NotAMember,
            Some((Some(role),)) => MembershipLookup::Member(role),
        })
    }
}

/// A caller's role in one workspace, produced only by [`resolve_role`]
///
/// Lives for a single request; it is placed in the request extensions by the
/// API gate and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRole {
    workspace_id: Uuid,
    role: RoleName,
}

impl ResolvedRole {
    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    pub fn role(&self) -> RoleName {
        self.role
    }

    /// Permission check (stage two)
    ///
    /// An empty requirement is always satisfied. Otherwise the role must hold
    /// at least one of the required permissions.
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::InsufficientPermission` when the sets are disjoint.
    pub fn check(&self, required: PermissionSet) -> Result<(), AuthzError> {
        if required.is_empty() || self.role.permissions().intersects(required) {
            return Ok(());
        }

        Err(AuthzError::InsufficientPermission {
            role: self.role,
            required,
        })
    }
}

/// Gate decision for an admitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// No workspace-level check applied (no requirement or no workspace)
    Unrestricted,

    /// Caller is a member whose role satisfied the requirement
    Member(ResolvedRole),
}

impl Admission {
    /// Resolved role, when the request was workspace-scoped
    pub fn role(&self) -> Option<ResolvedRole> {
        match self {
            Admission::Unrestricted => None,
            Admission::Member(role) => Some(*role),
        }
    }
}

/// Resolves the caller's role in a workspace (stage one)
///
/// # Errors
///
/// - `AuthzError::WorkspaceNotFound` if the workspace does not exist
/// - `AuthzError::NotAMember` if there is no member row for the pair
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn resolve_role<D>(
    directory: &D,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<ResolvedRole, AuthzError>
where
    D: MembershipDirectory + ?Sized,
{
    match directory.lookup(workspace_id, user_id).await? {
        MembershipLookup::WorkspaceMissing => Err(AuthzError::WorkspaceNotFound(workspace_id)),
        MembershipLookup::NotAMember => Err(AuthzError::NotAMember(workspace_id)),
        MembershipLookup::Member(role) => Ok(ResolvedRole { workspace_id, role }),
    }
}

/// Runs the full resolve → check pipeline for one request
///
/// # Arguments
///
/// * `directory` - Membership source (normally the connection pool)
/// * `user_id` - Authenticated caller
/// * `workspace_id` - Workspace named in the route, if any
/// * `required` - Permissions the endpoint declares (ANY-of)
///
/// # Returns
///
/// `Admission::Unrestricted` when `required` is empty or the route has no
/// workspace. Neither case performs a lookup. Otherwise `Admission::Member`
/// with the resolved role.
///
/// # Errors
///
/// Propagates the resolver's errors, plus `AuthzError::InsufficientPermission`
/// when the role holds none of the required permissions.
pub async fn authorize<D>(
    directory: &D,
    user_id: Uuid,
    workspace_id: Option<Uuid>,
    required: PermissionSet,
) -> Result<Admission, AuthzError>
where
    D: MembershipDirectory + ?Sized,
{
    let workspace_id = match workspace_id {
        Some(id) if !required.is_empty() => id,
        _ => return Ok(Admission::Unrestricted),
    };

    let resolved = resolve_role(directory, user_id, workspace_id).await?;

    if let Err(err) = resolved.check(required) {
        warn!(
            user_id = %user_id,
            workspace_id = %workspace_id,
            role = %resolved.role,
            "Permission denied"
        );
        return Err(err);
    }

    debug!(
        user_id = %user_id,
        workspace_id = %workspace_id,
        role = %resolved.role,
        "Request admitted"
    );

    Ok(Admission::Member(resolved))
}
