//! Session integration tests.
//!
//! Tests verify:
//! - `POST /jwt` sets an HttpOnly session cookie with the mode's attributes
//! - `POST /logout` clears the cookie
//! - Missing, expired, tampered and foreign-key tokens are rejected with 401

use axum::http::StatusCode;
use serde_json::{json, Map, Value};

use job_portal::{DeployMode, SessionAuth, SESSION_COOKIE};

use super::test_utils::{
    body_json, get, get_with_cookie, login, post_json, send, set_cookie, test_router,
    test_router_with_mode, MockStore, TEST_SECRET,
};

fn email_claims(email: &str) -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert("email".to_string(), Value::String(email.to_string()));
    claims
}

// =============================================================================
// Issuing
// =============================================================================

#[tokio::test]
async fn test_issue_session_sets_cookie() {
    let router = test_router(MockStore::new());

    let response = send(&router, post_json("/jwt", json!({ "email": "a@x.com" }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("Set-Cookie header");
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_issue_session_production_cookie() {
    let router = test_router_with_mode(MockStore::new(), DeployMode::Production);

    let response = send(&router, post_json("/jwt", json!({ "email": "a@x.com" }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("Set-Cookie header");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn test_issued_token_carries_claims() {
    let router = test_router(MockStore::new());

    let response = send(
        &router,
        post_json("/jwt", json!({ "email": "a@x.com", "name": "Ada" })),
    )
    .await;
    let cookie = set_cookie(&response).unwrap();
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("token="))
        .unwrap();

    let claims = SessionAuth::new(TEST_SECRET).verify(token).unwrap();
    assert_eq!(claims.email.as_deref(), Some("a@x.com"));
    assert_eq!(claims.extra["name"], "Ada");
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_issue_session_rejects_non_object_body() {
    let router = test_router(MockStore::new());

    let response = send(&router, post_json("/jwt", json!(["a@x.com"]))).await;
    assert!(response.status().is_client_error());
    assert!(set_cookie(&response).is_none());
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_clears_cookie() {
    let router = test_router(MockStore::new());

    let response = send(&router, post_json("/logout", json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("Set-Cookie header");
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_logout_production_cookie_attributes() {
    let router = test_router_with_mode(MockStore::new(), DeployMode::Production);

    let response = send(&router, post_json("/logout", json!({}))).await;
    let cookie = set_cookie(&response).expect("Set-Cookie header");
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_missing_cookie_rejected() {
    let router = test_router(MockStore::new());

    let response = send(&router, get("/jobApplications?email=a@x.com")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_token");
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_empty_cookie_rejected() {
    let router = test_router(MockStore::new());

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", "token="),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let router = test_router(MockStore::new());

    let token = SessionAuth::new(TEST_SECRET)
        .issue_with_expiry(email_claims("a@x.com"), 1)
        .unwrap();

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", &format!("token={}", token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "token_expired");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let router = test_router(MockStore::new());
    let cookie = login(&router, "a@x.com").await;

    // Flip the last signature character
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", &tampered),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let router = test_router(MockStore::new());

    let (token, _) = SessionAuth::new("some-other-secret")
        .issue(email_claims("a@x.com"))
        .unwrap();

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", &format!("token={}", token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let router = test_router(MockStore::new());

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", "token=not.a.jwt"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_string_email_session_is_forbidden_not_unauthorized() {
    let router = test_router(MockStore::new());

    let response = send(&router, post_json("/jwt", json!({ "email": 42 }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).expect("Set-Cookie header");
    let cookie = cookie.split(';').next().unwrap();

    let response = send(&router, get_with_cookie("/jobApplications?email=42", cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_public_routes_need_no_session() {
    let router = test_router(MockStore::new());

    let response = send(&router, get("/jobs")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &router,
        post_json("/jobApplications", json!({ "applicantEmail": "a@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
