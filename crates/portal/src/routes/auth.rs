//! Authentication route handlers.
//!
//! Sign-in and sign-out are forwarded to the hosted auth service; the portal
//! only keeps the resulting access token in its cookie session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use bsm_core::Email;

use crate::error::{Result, clear_sentry_user};
use crate::middleware::{clear_auth_session, set_auth_session};
use crate::models::AuthSession;
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

/// Map an error code from the query string to a user-facing message.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "service" => "Sign-in is temporarily unavailable. Please try again shortly.",
        "session" => "We could not start your session. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

fn login_error(login_path: &str, code: &str) -> Response {
    Redirect::to(&format!("{login_path}?error={code}")).into_response()
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle login form submission.
///
/// On success the visitor is sent back to the resolver, which dispatches on
/// the freshly resolved role.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let paths = state.paths();

    let Ok(email) = Email::parse(&form.email) else {
        return login_error(paths.login, "credentials");
    };
    let password = SecretString::from(form.password);

    match state.auth().sign_in(&email, &password).await {
        Ok(issued) => {
            let auth_session = AuthSession::from_issued(issued);
            if let Err(e) = set_auth_session(&session, &auth_session).await {
                tracing::error!(error = %e, "Failed to store session");
                return login_error(paths.login, "session");
            }
            tracing::info!(user_id = %auth_session.user_id, "Signed in");
            Redirect::to(paths.home).into_response()
        }
        Err(e @ AuthError::InvalidCredentials) => {
            tracing::warn!(email = %email, error = %e, "Login failed");
            login_error(paths.login, "credentials")
        }
        Err(e) => {
            tracing::error!(error = %e, "Auth service unavailable during login");
            login_error(paths.login, "service")
        }
    }
}

/// Handle logout.
///
/// The portal session is cleared even if the hosted service cannot be told.
///
/// # Errors
///
/// Returns [`AppError::Session`](crate::error::AppError::Session) if the
/// cookie session cannot be modified.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    if let Some(stored) = clear_auth_session(&session).await? {
        if let Err(e) = state.auth().sign_out(&stored.access_token).await {
            tracing::warn!(error = %e, user_id = %stored.user_id, "Hosted sign-out failed");
        }
        tracing::info!(user_id = %stored.user_id, "Signed out");
    }
    clear_sentry_user();

    Ok(Redirect::to(state.paths().login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(error_message("credentials"), "Invalid email or password.");
        assert!(error_message("service").contains("unavailable"));
        assert!(error_message("???").starts_with("Something went wrong"));
    }

    #[test]
    fn test_login_template_renders_error() {
        let html = LoginTemplate {
            error: Some(error_message("credentials")),
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains("Invalid email or password."));
        assert!(html.contains("action=\"/login\""));
    }
}
