/// Bearer-token authentication primitives for Axum
///
/// [`bearer_claims`] pulls the `Authorization: Bearer <token>` header apart
/// and validates the token. The API's authentication layer calls it, checks
/// that the user is still active, and inserts an [`AuthContext`] into the
/// request extensions. Handlers take `AuthContext` directly as an extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use workboard_shared::auth::middleware::AuthContext;
///
/// async fn whoami(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new().route("/whoami", get(whoami));
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for authentication
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    InvalidFormat(String),

    /// Token validation failed, or the user is gone or inactive
    InvalidToken(String),

    /// Database error while loading the user
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "ACCESS_UNAUTHORIZED",
                "Missing credentials".to_string(),
            ),
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "ACCESS_UNAUTHORIZED", msg),
            AuthError::DatabaseError(msg) => {
                tracing::error!("Authentication lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

/// Extracts and validates the bearer token from request headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no Authorization header
/// - `AuthError::InvalidFormat` if it is not a Bearer credential
/// - `AuthError::InvalidToken` if validation fails or the token expired
pub fn bearer_claims(headers: &HeaderMap, secret: &str) -> Result<Claims, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_claims_valid() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();

        let claims = bearer_claims(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_bearer_claims_missing_header() {
        assert!(matches!(
            bearer_claims(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_bearer_claims_wrong_scheme() {
        assert!(matches!(
            bearer_claims(&headers_with("Basic dXNlcjpwYXNz"), SECRET),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_bearer_claims_bad_token() {
        assert!(matches!(
            bearer_claims(&headers_with("Bearer nope"), SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        assert_eq!(AuthError::MissingCredentials.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidFormat("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidToken("x".to_string()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::DatabaseError("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
