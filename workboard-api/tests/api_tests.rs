/// Router-level tests
///
/// The first group runs against a pool that never connects: every request
/// is rejected before a query is issued. The `#[ignore]`d group needs
/// PostgreSQL at `DATABASE_URL`:
///
/// ```bash
/// DATABASE_URL=postgres://localhost/workboard_test cargo test -p workboard-api -- --ignored
/// ```

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{lazy_app, register_user, send, TestContext};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(&lazy_app(), Method::GET, "/api/user/current", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ACCESS_UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_scheme_is_rejected() {
    let request = Request::builder()
        .uri("/api/workspace/all")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = lazy_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (status, body) = send(
        &lazy_app(),
        Method::GET,
        &format!("/api/workspace/{}", Uuid::new_v4()),
        Some("not.a.jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ACCESS_UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let token = workboard_shared::auth::jwt::issue_access_token(
        Uuid::new_v4(),
        "some-other-secret-that-is-32-bytes-long",
        1,
    )
    .unwrap();

    let (status, _) = send(&lazy_app(), Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "", "email": "nope", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_google_routes_without_configuration() {
    let (status, body) = send(&lazy_app(), Method::GET, "/api/auth/google", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_health_lives_outside_base_path() {
    let (status, _) = send(&lazy_app(), Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_on_rejections() {
    let request = Request::builder()
        .uri("/api/user/current")
        .body(Body::empty())
        .unwrap();

    let response = lazy_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("Strict-Transport-Security").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_returns_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ctx.user.email, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ctx.user.email, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ACCESS_UNAUTHORIZED");
}

#[tokio::test]
#[ignore]
async fn test_project_and_task_flow() {
    let ctx = TestContext::new().await.unwrap();
    let ws = ctx.workspace_id();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/api/project/workspace/{}/create", ws),
            &ctx.token,
            Some(json!({ "name": "Launch" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["project"]["emoji"], "📊");
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/api/task/project/{}/workspace/{}/create", project_id, ws),
            &ctx.token,
            Some(json!({ "title": "Write landing page", "priority": "HIGH" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["task"]["status"], "TODO");

    let (status, body) = ctx
        .send(
            Method::GET,
            &format!("/api/task/workspace/{}/all?priority=HIGH&keyword=LANDING", ws),
            &ctx.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_count"], 1);
    assert_eq!(body["tasks"][0]["project"]["name"], "Launch");

    let (status, body) = ctx
        .send(
            Method::GET,
            &format!("/api/task/workspace/{}/all?priority=LOW", ws),
            &ctx.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_count"], 0);

    let (status, body) = ctx
        .send(
            Method::GET,
            &format!("/api/workspace/analytics/{}", ws),
            &ctx.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"]["total_tasks"], 1);
}

#[tokio::test]
#[ignore]
async fn test_member_permissions_through_router() {
    let ctx = TestContext::new().await.unwrap();
    let ws = ctx.workspace_id();
    let (guest, guest_token) = register_user(&ctx.db, "Guest").await.unwrap();

    // Not yet a member: indistinguishable from a missing workspace
    let (status, body) = ctx
        .send(Method::GET, &format!("/api/workspace/{}", ws), &guest_token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "RESOURCE_NOT_FOUND");

    let (_, body) = ctx
        .send(Method::GET, &format!("/api/workspace/{}", ws), &ctx.token, None)
        .await;
    let invite_code = body["workspace"]["invite_code"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/api/member/workspace/{}/join", invite_code),
            &guest_token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "MEMBER");

    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/api/member/workspace/{}/join", invite_code),
            &guest_token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // MEMBER may view but not manage
    let (status, _) = ctx
        .send(Method::GET, &format!("/api/workspace/members/{}", ws), &guest_token, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/workspace/update/{}", ws),
            &guest_token,
            Some(json!({ "name": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "ACCESS_UNAUTHORIZED");

    let (status, _) = ctx
        .send(
            Method::DELETE,
            &format!("/api/task/{}/workspace/{}/delete", Uuid::new_v4(), ws),
            &guest_token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner removes the guest, who loses access again
    let (status, _) = ctx
        .send(
            Method::DELETE,
            &format!("/api/workspace/{}/members/{}", ws, guest.id),
            &ctx.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(Method::GET, &format!("/api/workspace/{}", ws), &guest_token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_workspace_create_and_delete() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.workspace_id();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/workspace/create/new",
            &ctx.token,
            Some(json!({ "name": "Side project" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body["workspace"]["id"].as_str().unwrap().to_string();

    let (_, body) = ctx.send(Method::GET, "/api/user/current", &ctx.token, None).await;
    assert_eq!(body["user"]["current_workspace_id"], created.as_str());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = ctx
        .send(
            Method::DELETE,
            &format!("/api/workspace/delete/{}", created),
            &ctx.token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_workspace"], home.to_string().as_str());

    let (status, _) = ctx
        .send(Method::GET, &format!("/api/workspace/{}", created), &ctx.token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_malformed_workspace_id() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(Method::GET, "/api/workspace/analytics/not-a-uuid", &ctx.token, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
