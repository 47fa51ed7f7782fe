/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and Google sign-in
/// - `user`: Current user and current workspace
/// - `member`: Joining a workspace by invite code
/// - `workspace`: Workspace management and membership
/// - `project`: Projects inside a workspace
/// - `task`: Tasks inside a project
///
/// Workspace-scoped handlers run behind the workspace gate, so the
/// workspace id is read from the [`ResolvedRole`] it leaves in the request
/// extensions rather than parsed again.
///
/// [`ResolvedRole`]: workboard_shared::auth::authorization::ResolvedRole

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use std::collections::HashMap;
use uuid::Uuid;

pub mod auth;
pub mod health;
pub mod member;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;

/// Parses the UUID path parameter `name`
///
/// Malformed ids become a `VALIDATION_ERROR` naming the parameter, the same
/// answer the workspace gate gives for `workspace_id`.
pub(crate) fn path_id(params: &HashMap<String, String>, name: &'static str) -> ApiResult<Uuid> {
    let raw = params.get(name).map(String::as_str).unwrap_or_default();

    Uuid::parse_str(raw).map_err(|_| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: name.to_string(),
            message: format!("Invalid {}", name),
        }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_id() {
        let id = Uuid::new_v4();
        let params = HashMap::from([
            ("project_id".to_string(), id.to_string()),
            ("task_id".to_string(), "42".to_string()),
        ]);

        assert_eq!(path_id(&params, "project_id").unwrap(), id);
        assert!(matches!(
            path_id(&params, "task_id"),
            Err(ApiError::ValidationError(details)) if details[0].field == "task_id"
        ));
        assert!(path_id(&params, "member_id").is_err());
    }
}
