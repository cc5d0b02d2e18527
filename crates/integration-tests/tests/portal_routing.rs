//! Integration tests for the session resolver and the role guard.
//!
//! Each test signs in through `POST /login` against the scripted auth
//! provider, then drives the real router with the resulting cookie.
//!
//! Run with: cargo test -p bsm-integration-tests

use axum::http::StatusCode;
use bsm_core::{Role, RoleAttribute};
use bsm_integration_tests::{ScriptedAuth, SessionScript, TestContext, identity};
use serde_json::{Value, json};

const PASSWORD: &str = "hunter2-but-longer";

fn scripted() -> ScriptedAuth {
    ScriptedAuth::new()
        .with_account(
            "ada@bsm.test",
            PASSWORD,
            "tok-admin",
            SessionScript::Valid(identity("ada@bsm.test", Role::Admin.into())),
        )
        .with_account(
            "carl@bsm.test",
            PASSWORD,
            "tok-customer",
            SessionScript::Valid(identity("carl@bsm.test", Role::Customer.into())),
        )
        .with_account(
            "una@bsm.test",
            PASSWORD,
            "tok-unknown",
            SessionScript::Valid(identity(
                "una@bsm.test",
                RoleAttribute::Unrecognized("auditor".to_string()),
            )),
        )
        .with_account(
            "nora@bsm.test",
            PASSWORD,
            "tok-norole",
            SessionScript::Valid(identity("nora@bsm.test", RoleAttribute::Missing)),
        )
        .with_account("rex@bsm.test", PASSWORD, "tok-revoked", SessionScript::Revoked)
        .with_account("flo@bsm.test", PASSWORD, "tok-failing", SessionScript::Failing)
        .with_account("hal@bsm.test", PASSWORD, "tok-hanging", SessionScript::Hanging)
}

async fn signed_in(email: &str) -> (TestContext, String) {
    let ctx = TestContext::new(scripted());
    let cookie = ctx.sign_in(email, PASSWORD).await;
    (ctx, cookie)
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).expect("response should be JSON")
}

// =============================================================================
// Session resolver
// =============================================================================

#[tokio::test]
async fn test_no_session_redirects_to_login() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert_eq!(ctx.auth.session_queries(), 0, "no token, no round trip");
}

#[tokio::test]
async fn test_admin_lands_on_admin_dashboard() {
    let (ctx, cookie) = signed_in("ada@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin"));

    let dashboard = ctx.get("/admin", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains(r#"data-view="admin""#));
    assert!(dashboard.body.contains("ada@bsm.test"));
}

#[tokio::test]
async fn test_customer_lands_on_customer_dashboard() {
    let (ctx, cookie) = signed_in("carl@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/customer-dashboard"));

    let dashboard = ctx.get("/customer-dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains(r#"data-view="customer""#));
}

#[tokio::test]
async fn test_landing_queries_the_provider_once() {
    let (ctx, cookie) = signed_in("ada@bsm.test").await;

    ctx.get("/", Some(&cookie)).await;

    assert_eq!(ctx.auth.session_queries(), 1);
}

#[tokio::test]
async fn test_unrecognized_role_renders_blank_page() {
    let (ctx, cookie) = signed_in("una@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.location, None, "no redirect for an unknown role");
    assert!(!response.body.contains("data-state=\"loading\""));
    assert!(!response.body.contains("data-view="));
}

#[tokio::test]
async fn test_missing_role_renders_blank_page_every_time() {
    let (ctx, cookie) = signed_in("nora@bsm.test").await;

    for _ in 0..3 {
        let response = ctx.get("/", Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.location, None);
    }
}

#[tokio::test]
async fn test_revoked_session_redirects_to_login() {
    let (ctx, cookie) = signed_in("rex@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_failing_session_query_is_treated_as_signed_out() {
    let (ctx, cookie) = signed_in("flo@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert_eq!(ctx.auth.session_queries(), 1, "no retry");
}

#[tokio::test]
async fn test_pending_session_shows_loading_page() {
    let (ctx, cookie) = signed_in("hal@bsm.test").await;

    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.location, None, "pending never navigates");
    assert!(response.body.contains(r#"data-state="loading""#));
    assert!(response.body.contains(r#"http-equiv="refresh""#));
}

// =============================================================================
// Role guard
// =============================================================================

#[tokio::test]
async fn test_guarded_view_without_session_redirects_to_login() {
    let ctx = TestContext::new(scripted());

    for path in ["/admin", "/customer-dashboard"] {
        let response = ctx.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location.as_deref(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn test_customer_on_admin_view_is_sent_to_access_guard() {
    let (ctx, cookie) = signed_in("carl@bsm.test").await;

    let response = ctx.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn test_admin_on_customer_view_is_sent_to_access_guard() {
    let (ctx, cookie) = signed_in("ada@bsm.test").await;

    let response = ctx.get("/customer-dashboard", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn test_unrecognized_role_is_refused_by_guarded_views() {
    let (ctx, cookie) = signed_in("una@bsm.test").await;

    for path in ["/admin", "/customer-dashboard"] {
        let response = ctx.get(path, Some(&cookie)).await;
        assert_eq!(response.location.as_deref(), Some("/unauthorized"), "{path}");
    }
}

#[tokio::test]
async fn test_guarded_view_while_pending_shows_loading_page() {
    let (ctx, cookie) = signed_in("hal@bsm.test").await;

    let response = ctx.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"data-state="loading""#));
}

// =============================================================================
// Access guard exits
// =============================================================================

#[tokio::test]
async fn test_access_guard_offers_home_and_back() {
    let ctx = TestContext::new(scripted());
    let request = axum::http::Request::get("/unauthorized")
        .header("referer", "http://portal.bsm.test/kb?page=2")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("Access denied"));
    assert!(response.body.contains(r#"href="/unauthorized/home""#));
    assert!(response.body.contains("/unauthorized/back?to=%2Fkb%3Fpage%3D2"));
}

#[tokio::test]
async fn test_access_guard_ignores_foreign_referer() {
    let ctx = TestContext::new(scripted());
    let request = axum::http::Request::get("/unauthorized")
        .header("referer", "https://evil.test/phish")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = ctx.send(request).await;

    assert!(response.body.contains(r#"href="/unauthorized/back""#));
    assert!(!response.body.contains("evil.test"));
}

#[tokio::test]
async fn test_back_exit_returns_to_previous_page() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/unauthorized/back?to=%2Fkb%3Fpage%3D2", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/kb?page=2"));
}

#[tokio::test]
async fn test_back_exit_falls_back_to_home() {
    let ctx = TestContext::new(scripted());

    for path in [
        "/unauthorized/back",
        "/unauthorized/back?to=https%3A%2F%2Fevil.test%2F",
        "/unauthorized/back?to=%2Funauthorized",
        "/unauthorized/back?to=%2F%5Cevil.test",
        "/unauthorized/back?to=%2F%09%2Fevil.test",
    ] {
        let response = ctx.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location.as_deref(), Some("/"), "{path}");
    }
}

#[tokio::test]
async fn test_home_exit_navigates_home() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/unauthorized/home", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_route_decision_without_session() {
    let ctx = TestContext::new(scripted());

    let response = ctx.get("/api/session/route", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        json_body(&response.body),
        json!({"decision": "login_redirect", "target": "/login"})
    );
}

#[tokio::test]
async fn test_route_decision_per_role() {
    let cases = [
        ("ada@bsm.test", json!({"decision": "admin_view", "target": "/admin"})),
        (
            "carl@bsm.test",
            json!({"decision": "customer_view", "target": "/customer-dashboard"}),
        ),
        ("una@bsm.test", json!({"decision": "blank", "target": null})),
        ("hal@bsm.test", json!({"decision": "loading", "target": null})),
    ];

    for (email, expected) in cases {
        let (ctx, cookie) = signed_in(email).await;
        let response = ctx.get("/api/session/route", Some(&cookie)).await;
        assert_eq!(json_body(&response.body), expected, "{email}");
    }
}

#[tokio::test]
async fn test_api_guard_uses_status_codes() {
    let ctx = TestContext::new(scripted());
    assert_eq!(
        ctx.get("/api/admin/me", None).await.status,
        StatusCode::UNAUTHORIZED
    );

    let (ctx, cookie) = signed_in("carl@bsm.test").await;
    assert_eq!(
        ctx.get("/api/admin/me", Some(&cookie)).await.status,
        StatusCode::FORBIDDEN
    );

    let (ctx, cookie) = signed_in("hal@bsm.test").await;
    assert_eq!(
        ctx.get("/api/customer/me", Some(&cookie)).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_api_me_returns_identity() {
    let (ctx, cookie) = signed_in("ada@bsm.test").await;

    let response = ctx.get("/api/admin/me", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = json_body(&response.body);
    assert_eq!(body["email"], "ada@bsm.test");
    assert_eq!(body["role"], "admin");
}
