/// Authentication endpoints
///
/// - `POST /auth/register` - Register with email and password
/// - `POST /auth/login` - Exchange credentials for an access token
/// - `POST /auth/logout` - Acknowledge logout (tokens are stateless)
/// - `GET /auth/google` - Redirect to Google's consent screen
/// - `GET /auth/google/callback` - Finish Google sign-in and hand the token to the frontend

use crate::{
    app::AppState,
    error::{validation_failed, ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;
use workboard_shared::{
    auth::jwt::issue_access_token,
    models::user::User,
    services::{
        onboarding::{self, RegisterUser},
        ServiceError,
    },
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,

    /// Bearer token for the `Authorization` header
    pub access_token: String,

    pub user: User,
}

/// Query Google appends to the callback URL
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Register a new user
///
/// Creates the user together with a personal workspace the user owns.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    req.validate().map_err(validation_failed)?;

    let user = onboarding::register(
        &state.db,
        RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email, wrong password or inactive account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_failed)?;

    let user = onboarding::login(&state.db, &req.email, &req.password).await?;
    let access_token = issue_access_token(
        user.id,
        state.jwt_secret(),
        state.config.jwt.expires_in_hours,
    )?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Logged in successfully",
        access_token,
        user,
    }))
}

/// Logout
///
/// Tokens are not tracked server-side; the client discards its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully",
    })
}

/// Starts Google sign-in with a 302 to the consent screen
pub async fn google_login(State(state): State<AppState>) -> ApiResult<Response> {
    let client = state.google.as_ref().ok_or_else(google_disabled)?;

    Ok(found(client.authorization_url()))
}

/// Finishes Google sign-in
///
/// Always answers with a redirect to the frontend callback URL, carrying
/// `status=success` with the token and current workspace, or
/// `status=failure`.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> ApiResult<Response> {
    let frontend = state
        .config
        .google
        .as_ref()
        .map(|google| google.frontend_callback_url.clone())
        .ok_or_else(google_disabled)?;

    match complete_google_login(&state, query).await {
        Ok((access_token, current_workspace)) => {
            let workspace = current_workspace
                .map(|id| id.to_string())
                .unwrap_or_default();
            Ok(found(callback_url(
                &frontend,
                &format!(
                    "status=success&access_token={}&current_workspace={}",
                    access_token, workspace
                ),
            )))
        }
        Err(e) => {
            warn!(error = %e, "Google sign-in failed");
            Ok(found(callback_url(&frontend, "status=failure")))
        }
    }
}

async fn complete_google_login(
    state: &AppState,
    query: GoogleCallbackQuery,
) -> ApiResult<(String, Option<Uuid>)> {
    if let Some(error) = query.error {
        return Err(ApiError::Unauthorized(format!("Google returned: {}", error)));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;
    let client = state.google.as_ref().ok_or_else(google_disabled)?;

    let profile = client.exchange_code(&code).await?;

    let mut conn = state.db.acquire().await?;
    let user = onboarding::login_with_google(&mut *conn, &profile)
        .await
        .map_err(|e| match e {
            ServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Account is inactive".to_string())
            }
            other => other.into(),
        })?;

    let access_token = issue_access_token(
        user.id,
        state.jwt_secret(),
        state.config.jwt.expires_in_hours,
    )?;

    info!(user_id = %user.id, "User signed in with Google");
    Ok((access_token, user.current_workspace_id))
}

fn google_disabled() -> ApiError {
    ApiError::NotFound("Google sign-in is not configured".to_string())
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Appends `query` to `base`, which may already carry a query string
fn callback_url(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url("http://localhost:5173/google/callback", "status=failure"),
            "http://localhost:5173/google/callback?status=failure"
        );
        assert_eq!(
            callback_url("http://app.test/cb?from=google", "status=failure"),
            "http://app.test/cb?from=google&status=failure"
        );
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "pass".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_redirect_is_302() {
        let response = found("https://accounts.google.com/".to_string());
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://accounts.google.com/"
        );
    }
}
