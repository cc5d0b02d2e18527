//! Integration tests for sign-in, sign-out, health checks and the
//! portal's response headers.
//!
//! Run with: cargo test -p bsm-integration-tests

use axum::http::StatusCode;
use bsm_core::Role;
use bsm_integration_tests::{ScriptedAuth, SessionScript, TestContext, identity};
use tower::ServiceExt;

const PASSWORD: &str = "hunter2-but-longer";

fn scripted() -> ScriptedAuth {
    ScriptedAuth::new().with_account(
        "ada@bsm.test",
        PASSWORD,
        "tok-admin",
        SessionScript::Valid(identity("ada@bsm.test", Role::Admin.into())),
    )
}

#[tokio::test]
async fn test_login_page_renders_form() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/login", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"action="/login""#));
    assert!(!response.body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_page_shows_error_message() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/login?error=credentials", None).await;

    assert!(response.body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_normalises_email() {
    let ctx = TestContext::new(scripted());

    let cookie = ctx.sign_in("ADA%40bsm.test", PASSWORD).await;

    assert!(cookie.starts_with("bsm_session="));
    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.location.as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_login_with_wrong_password_redirects_with_error() {
    let ctx = TestContext::new(scripted());

    let response = ctx
        .post_form("/login", "email=ada%40bsm.test&password=nope", None)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login?error=credentials"));
    assert_eq!(response.cookie, None, "no session for a failed login");
}

#[tokio::test]
async fn test_login_with_malformed_email_redirects_with_error() {
    let ctx = TestContext::new(scripted());

    let response = ctx
        .post_form("/login", "email=not-an-email&password=whatever", None)
        .await;

    assert_eq!(response.location.as_deref(), Some("/login?error=credentials"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new(scripted());
    let cookie = ctx.sign_in("ada%40bsm.test", PASSWORD).await;

    let response = ctx.post_form("/logout", "", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert_eq!(ctx.auth.sign_outs(), 1);

    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let ctx = TestContext::new(scripted());

    let response = ctx.post_form("/logout", "", None).await;

    assert_eq!(response.location.as_deref(), Some("/login"));
    assert_eq!(ctx.auth.sign_outs(), 0);
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new(scripted());

    let live = ctx.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = ctx.get("/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/no-such-page", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let ctx = TestContext::new(scripted());
    let request = axum::http::Request::get("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("referrer-policy").unwrap(),
        "same-origin"
    );
    assert!(response.headers().contains_key("content-security-policy"));
    assert!(response.headers().contains_key("x-request-id"));
}
