//! Integration test harness for the BSM portal.
//!
//! Runs the real portal router (sessions, security headers, guards) in
//! process against a scripted auth provider, so no hosted service or network
//! is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bsm-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use secrecy::{ExposeSecret, SecretString};
use tower::ServiceExt;
use url::Url;

use bsm_core::{Email, RoleAttribute, SessionIdentity, UserId};
use bsm_portal::app;
use bsm_portal::config::{AuthServiceConfig, LogFormat, PortalConfig};
use bsm_portal::services::auth::{AuthError, AuthProvider, IssuedSession};
use bsm_portal::state::AppState;

/// How the scripted provider answers a session query for a token.
#[derive(Debug, Clone)]
pub enum SessionScript {
    /// Token is valid for this identity.
    Valid(SessionIdentity),
    /// Token was revoked: session absent.
    Revoked,
    /// The hosted service errors out.
    Failing,
    /// The hosted service never answers.
    Hanging,
}

struct Account {
    password: String,
    token: String,
    user_id: UserId,
}

/// Auth provider driven by a script instead of a hosted service.
#[derive(Default)]
pub struct ScriptedAuth {
    sessions: HashMap<String, SessionScript>,
    accounts: HashMap<String, Account>,
    session_queries: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl ScriptedAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account whose sign-in issues `token`, and script the
    /// session query for that token.
    #[must_use]
    pub fn with_account(
        mut self,
        email: &str,
        password: &str,
        token: &str,
        script: SessionScript,
    ) -> Self {
        let user_id = match &script {
            SessionScript::Valid(identity) => identity.user_id,
            _ => UserId::random(),
        };
        self.accounts.insert(
            Email::parse(email).unwrap().as_str().to_string(),
            Account {
                password: password.to_string(),
                token: token.to_string(),
                user_id,
            },
        );
        self.sessions.insert(token.to_string(), script);
        self
    }

    /// Number of session queries received so far.
    #[must_use]
    pub fn session_queries(&self) -> usize {
        self.session_queries.load(Ordering::SeqCst)
    }

    /// Number of sign-outs received so far.
    #[must_use]
    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuth {
    async fn get_session(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionIdentity>, AuthError> {
        self.session_queries.fetch_add(1, Ordering::SeqCst);
        match self.sessions.get(access_token) {
            Some(SessionScript::Valid(identity)) => Ok(Some(identity.clone())),
            Some(SessionScript::Revoked) | None => Ok(None),
            Some(SessionScript::Failing) => Err(AuthError::Service {
                status: 503,
                message: "upstream unavailable".to_string(),
            }),
            Some(SessionScript::Hanging) => std::future::pending().await,
        }
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<IssuedSession, AuthError> {
        let account = self
            .accounts
            .get(email.as_str())
            .filter(|account| account.password == password.expose_secret())
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(IssuedSession {
            access_token: account.token.clone(),
            user_id: account.user_id,
            email: email.clone(),
            expires_in: Some(3600),
        })
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Identity with the given raw role attribute.
#[must_use]
pub fn identity(email: &str, role: RoleAttribute) -> SessionIdentity {
    SessionIdentity::new(UserId::random(), Some(Email::parse(email).unwrap()), role)
}

/// Portal configuration suitable for tests.
#[must_use]
pub fn test_config() -> PortalConfig {
    PortalConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://portal.bsm.test".to_string(),
        session_resolve_timeout: Duration::from_millis(100),
        log_format: LogFormat::Text,
        auth: AuthServiceConfig {
            url: Url::parse("http://auth.bsm.test").unwrap(),
            anon_key: SecretString::from("scripted"),
            profile_table: "profiles".to_string(),
            request_timeout: Duration::from_secs(1),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// What a test needs from a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    /// `name=value` part of the session cookie, if one was set.
    pub cookie: Option<String>,
    pub body: String,
}

/// A running portal router plus the provider behind it.
pub struct TestContext {
    pub app: Router,
    pub auth: Arc<ScriptedAuth>,
}

impl TestContext {
    #[must_use]
    pub fn new(auth: ScriptedAuth) -> Self {
        let auth = Arc::new(auth);
        let state = AppState::with_provider(test_config(), auth.clone());
        Self {
            app: app::router(state),
            auth,
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path`, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// `POST path` with a urlencoded form body.
    pub async fn post_form(&self, path: &str, form: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    /// Sign in and return the session cookie.
    pub async fn sign_in(&self, email: &str, password: &str) -> String {
        let response = self
            .post_form("/login", &format!("email={email}&password={password}"), None)
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login should redirect");
        assert_eq!(response.location.as_deref(), Some("/"));
        response.cookie.expect("login should set a session cookie")
    }
}
