/// Workspace access control for routes
///
/// Every workspace-scoped route is registered with an [`Endpoint`]. The
/// endpoint's permission requirement lives in one table,
/// [`Endpoint::required_permissions`], and is enforced by
/// [`workspace_gate`], a route layer that runs after authentication and
/// before the handler:
///
/// 1. read `workspace_id` from the path (400 if it is not a UUID)
/// 2. resolve the caller's role in that workspace (404 if missing or not a member)
/// 3. admit if the role holds any of the required permissions (403 otherwise)
/// 4. attach the [`ResolvedRole`] to the request extensions
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use sqlx::PgPool;
/// use workboard_api::access::{workspace_gate, Endpoint, Gate};
///
/// # fn example(pool: PgPool) {
/// async fn handler() -> &'static str { "ok" }
///
/// let app: Router = Router::new().route(
///     "/workspace/:workspace_id",
///     get(handler).route_layer(from_fn_with_state(
///         Gate::new(Arc::new(pool), Endpoint::WorkspaceGet),
///         workspace_gate::<PgPool>,
///     )),
/// );
/// # }
/// ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;
use workboard_shared::auth::{
    authorization::{authorize, MembershipDirectory, ResolvedRole},
    middleware::AuthContext,
    permissions::{Permission, PermissionSet},
};

use crate::error::{ApiError, ValidationErrorDetail};

/// Path parameter naming the workspace
pub const WORKSPACE_PARAM: &str = "workspace_id";

/// Every workspace-scoped operation the API exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    WorkspaceCreate,
    WorkspaceListMine,
    WorkspaceGet,
    WorkspaceMembers,
    WorkspaceAnalytics,
    WorkspaceChangeMemberRole,
    WorkspaceUpdate,
    WorkspaceDelete,
    WorkspaceResetInviteCode,
    WorkspaceRemoveMember,
    ProjectCreate,
    ProjectList,
    ProjectGet,
    ProjectAnalytics,
    ProjectUpdate,
    ProjectDelete,
    TaskCreate,
    TaskUpdate,
    TaskList,
    TaskGet,
    TaskDelete,
    UserSwitchWorkspace,
}

impl Endpoint {
    pub const ALL: [Endpoint; 22] = [
        Endpoint::WorkspaceCreate,
        Endpoint::WorkspaceListMine,
        Endpoint::WorkspaceGet,
        Endpoint::WorkspaceMembers,
        Endpoint::WorkspaceAnalytics,
        Endpoint::WorkspaceChangeMemberRole,
        Endpoint::WorkspaceUpdate,
        Endpoint::WorkspaceDelete,
        Endpoint::WorkspaceResetInviteCode,
        Endpoint::WorkspaceRemoveMember,
        Endpoint::ProjectCreate,
        Endpoint::ProjectList,
        Endpoint::ProjectGet,
        Endpoint::ProjectAnalytics,
        Endpoint::ProjectUpdate,
        Endpoint::ProjectDelete,
        Endpoint::TaskCreate,
        Endpoint::TaskUpdate,
        Endpoint::TaskList,
        Endpoint::TaskGet,
        Endpoint::TaskDelete,
        Endpoint::UserSwitchWorkspace,
    ];

    /// Permissions the caller needs, any one of which suffices
    ///
    /// An empty set means any authenticated caller is admitted.
    pub const fn required_permissions(self) -> PermissionSet {
        use Permission::*;

        match self {
            Endpoint::WorkspaceCreate | Endpoint::WorkspaceListMine => PermissionSet::EMPTY,

            Endpoint::WorkspaceGet
            | Endpoint::WorkspaceMembers
            | Endpoint::WorkspaceAnalytics
            | Endpoint::ProjectList
            | Endpoint::ProjectGet
            | Endpoint::ProjectAnalytics
            | Endpoint::TaskList
            | Endpoint::TaskGet
            | Endpoint::UserSwitchWorkspace => PermissionSet::only(ViewOnly),

            Endpoint::WorkspaceChangeMemberRole => PermissionSet::only(ChangeMemberRole),
            Endpoint::WorkspaceUpdate => PermissionSet::only(EditWorkspace),
            Endpoint::WorkspaceDelete => PermissionSet::only(DeleteWorkspace),
            Endpoint::WorkspaceResetInviteCode => PermissionSet::only(ManageWorkspaceSettings),
            Endpoint::WorkspaceRemoveMember => PermissionSet::only(RemoveMember),

            Endpoint::ProjectCreate => PermissionSet::only(CreateProject),
            Endpoint::ProjectUpdate => PermissionSet::only(EditProject),
            Endpoint::ProjectDelete => PermissionSet::only(DeleteProject),

            Endpoint::TaskCreate => PermissionSet::only(CreateTask),
            Endpoint::TaskUpdate => PermissionSet::only(EditTask),
            Endpoint::TaskDelete => PermissionSet::only(DeleteTask),
        }
    }
}

/// State of one gated route: where memberships come from and which
/// endpoint the route is
pub struct Gate<D: ?Sized> {
    directory: Arc<D>,
    endpoint: Endpoint,
}

impl<D: ?Sized> Gate<D> {
    pub fn new(directory: Arc<D>, endpoint: Endpoint) -> Self {
        Self { directory, endpoint }
    }
}

impl<D: ?Sized> Clone for Gate<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            endpoint: self.endpoint,
        }
    }
}

/// Route layer enforcing the endpoint's permission requirement
///
/// Expects [`AuthContext`] in the request extensions, i.e. it must sit
/// inside the authentication layer.
pub async fn workspace_gate<D>(
    State(gate): State<Gate<D>>,
    auth: AuthContext,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    D: MembershipDirectory + 'static,
{
    let workspace_id = params
        .get(WORKSPACE_PARAM)
        .map(|raw| parse_workspace_id(raw))
        .transpose()?;

    let admission = authorize(
        gate.directory.as_ref(),
        auth.user_id,
        workspace_id,
        gate.endpoint.required_permissions(),
    )
    .await?;

    if let Some(role) = admission.role() {
        req.extensions_mut().insert::<ResolvedRole>(role);
    }

    Ok(next.run(req).await)
}

fn parse_workspace_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: WORKSPACE_PARAM.to_string(),
            message: "Invalid workspace id".to_string(),
        }])
    })
}
