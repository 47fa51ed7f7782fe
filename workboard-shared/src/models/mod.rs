/// Database models
///
/// Every operation is an associated async fn generic over `sqlx::PgExecutor`,
/// so it runs equally against the pool or inside a transaction.
///
/// # Models
///
/// - `user`: Registered users and their current-workspace pointer
/// - `account`: Identity provider links (email, Google, ...)
/// - `workspace`: Tenant boundary with invite code
/// - `role`: Seeded role rows referenced by members
/// - `member`: User ↔ workspace binding carrying one role
/// - `project`: Task groupings inside a workspace
/// - `task`: Work items, filtered listing and analytics
/// - `pagination`: Offset pagination math
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::workspace::Workspace;
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// for workspace in Workspace::list_for_user(&pool, user_id).await? {
///     println!("{} ({})", workspace.name, workspace.invite_code);
/// }
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod member;
pub mod pagination;
pub mod project;
pub mod role;
pub mod task;
pub mod user;
pub mod workspace;
