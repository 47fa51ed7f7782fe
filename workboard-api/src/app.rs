/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use workboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = workboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    access::{workspace_gate, Endpoint, Gate},
    config::Config,
    error::ApiError,
    middleware::security::{security_headers, SecurityHeaders},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use workboard_shared::auth::{
    middleware::{bearer_claims, AuthContext, AuthError},
    oauth::GoogleOAuthClient,
};
use workboard_shared::models::user::User;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Google sign-in client; `None` when not configured
    pub google: Option<GoogleOAuthClient>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let google = config
            .google
            .as_ref()
            .map(|google| GoogleOAuthClient::new(google.oauth()));

        Self {
            db,
            config: Arc::new(config),
            google,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                           # public
/// └── {base_path}/                      # default /api
///     ├── /auth/register, /auth/login   # public
///     ├── /auth/google[/callback]       # public
///     └── everything else               # bearer token, then workspace gate
///         ├── /auth/logout
///         ├── /user/...
///         ├── /member/...
///         ├── /workspace/...
///         ├── /project/...
///         └── /task/...
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (protected routes)
/// 5. Workspace gate (per route, see [`Endpoint`])
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let directory = Arc::new(state.db.clone());
    let gate = |route: MethodRouter<AppState>, endpoint: Endpoint| gated(route, &directory, endpoint);

    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/google", get(routes::auth::google_login))
        .route("/auth/google/callback", get(routes::auth::google_callback));

    let user_routes = Router::new()
        .route("/current", get(routes::user::current_user))
        .route(
            "/current-workspace/:workspace_id",
            gate(put(routes::user::switch_current_workspace), Endpoint::UserSwitchWorkspace),
        );

    let member_routes = Router::new().route(
        "/workspace/:invite_code/join",
        post(routes::member::join_workspace),
    );

    let workspace_routes = Router::new()
        .route(
            "/create/new",
            gate(post(routes::workspace::create_workspace), Endpoint::WorkspaceCreate),
        )
        .route(
            "/all",
            gate(get(routes::workspace::list_workspaces), Endpoint::WorkspaceListMine),
        )
        .route(
            "/members/:workspace_id",
            gate(get(routes::workspace::workspace_members), Endpoint::WorkspaceMembers),
        )
        .route(
            "/analytics/:workspace_id",
            gate(get(routes::workspace::workspace_analytics), Endpoint::WorkspaceAnalytics),
        )
        .route(
            "/change/member/role/:workspace_id",
            gate(
                put(routes::workspace::change_member_role),
                Endpoint::WorkspaceChangeMemberRole,
            ),
        )
        .route(
            "/update/:workspace_id",
            gate(put(routes::workspace::update_workspace), Endpoint::WorkspaceUpdate),
        )
        .route(
            "/delete/:workspace_id",
            gate(delete(routes::workspace::delete_workspace), Endpoint::WorkspaceDelete),
        )
        .route(
            "/invite-code/reset/:workspace_id",
            gate(
                put(routes::workspace::reset_invite_code),
                Endpoint::WorkspaceResetInviteCode,
            ),
        )
        .route(
            "/:workspace_id/members/:member_id",
            gate(delete(routes::workspace::remove_member), Endpoint::WorkspaceRemoveMember),
        )
        .route(
            "/:workspace_id",
            gate(get(routes::workspace::get_workspace), Endpoint::WorkspaceGet),
        );

    let project_routes = Router::new()
        .route(
            "/workspace/:workspace_id/create",
            gate(post(routes::project::create_project), Endpoint::ProjectCreate),
        )
        .route(
            "/workspace/:workspace_id/all",
            gate(get(routes::project::list_projects), Endpoint::ProjectList),
        )
        .route(
            "/:project_id/workspace/:workspace_id/analytics",
            gate(get(routes::project::project_analytics), Endpoint::ProjectAnalytics),
        )
        .route(
            "/:project_id/workspace/:workspace_id",
            gate(get(routes::project::get_project), Endpoint::ProjectGet),
        )
        .route(
            "/:project_id/workspace/:workspace_id/update",
            gate(put(routes::project::update_project), Endpoint::ProjectUpdate),
        )
        .route(
            "/:project_id/workspace/:workspace_id/delete",
            gate(delete(routes::project::delete_project), Endpoint::ProjectDelete),
        );

    let task_routes = Router::new()
        .route(
            "/project/:project_id/workspace/:workspace_id/create",
            gate(post(routes::task::create_task), Endpoint::TaskCreate),
        )
        .route(
            "/:task_id/project/:project_id/workspace/:workspace_id/update",
            gate(put(routes::task::update_task), Endpoint::TaskUpdate),
        )
        .route(
            "/workspace/:workspace_id/all",
            gate(get(routes::task::list_tasks), Endpoint::TaskList),
        )
        .route(
            "/:task_id/project/:project_id/workspace/:workspace_id",
            gate(get(routes::task::get_task), Endpoint::TaskGet),
        )
        .route(
            "/:task_id/workspace/:workspace_id/delete",
            gate(delete(routes::task::delete_task), Endpoint::TaskDelete),
        );

    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .nest("/user", user_routes)
        .nest("/member", member_routes)
        .nest("/workspace", workspace_routes)
        .nest("/project", project_routes)
        .nest("/task", task_routes)
        .layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    let root = Router::new().route("/health", get(routes::health::health_check));
    let root = match state.config.api.base_path.as_str() {
        "" => root.merge(api_routes),
        base_path => root.nest(base_path, api_routes),
    };

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let security = SecurityHeaders {
        hsts: state.config.api.production,
    };

    root.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
    .layer(cors)
    .layer(from_fn_with_state(security, security_headers))
    .with_state(state)
}

/// Puts a route behind the workspace gate for `endpoint`
fn gated(
    route: MethodRouter<AppState>,
    directory: &Arc<PgPool>,
    endpoint: Endpoint,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(
        Gate::new(Arc::clone(directory), endpoint),
        workspace_gate::<PgPool>,
    ))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token, refuses tokens of deleted or deactivated
/// users, then injects [`AuthContext`] into the request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_claims(req.headers(), state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    match user {
        Some(user) if user.is_active => {}
        Some(_) => return Err(AuthError::InvalidToken("User is inactive".to_string()).into()),
        None => return Err(AuthError::InvalidToken("User not found".to_string()).into()),
    }

    req.extensions_mut().insert(AuthContext::new(claims.sub));

    Ok(next.run(req).await)
}
