/// Business operations
///
/// Services sit between the HTTP handlers and the models. They assume the
/// caller has already passed the workspace gate, so they only enforce the
/// rules permissions cannot express (ownership, scoping of child resources,
/// uniqueness).
///
/// Operations that write several rows take `&mut PgConnection` and open
/// their own transaction with `Connection::begin`. Handed a connection that
/// is already inside a transaction, they run as a savepoint instead.
///
/// - `onboarding`: Registration, password login and Google sign-in
/// - `user`: Current user and current-workspace switching
/// - `workspace`: Workspace lifecycle, members and analytics
/// - `project`: Project CRUD and analytics
/// - `task`: Task CRUD and filtered listing
/// - `invite`: Joining a workspace by invite code

pub mod invite;
pub mod onboarding;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;

use crate::auth::password::PasswordError;
use thiserror::Error;

/// Service error
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The named resource does not exist (or is outside the workspace)
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// The request is well-formed but breaks a business rule
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
