//! Session resolution and role-guard extractors.
//!
//! Every page reads the session the same way: the access token kept in the
//! cookie session is sent to the auth collaborator, which answers with the
//! identity and role. The round trip is bounded by
//! `PortalConfig::session_resolve_timeout`; a query that has not answered
//! by then leaves the session [`SessionState::Pending`] and is dropped.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use bsm_core::{
    Role, RoleAttribute, RouteDecision, RouteRequest, SessionIdentity, SessionState, decide,
};

use crate::components::LoadingPage;
use crate::error::set_sentry_user;
use crate::models::{AuthSession, session_keys};
use crate::state::AppState;

/// Resolve the visitor's session with a single provider round trip.
///
/// Always returns a resolved state. A missing or expired token resolves to
/// absent; so does a failed query, after logging it.
pub async fn resolve_session(state: &AppState, session: &Session) -> SessionState {
    let stored = match session.get::<AuthSession>(session_keys::AUTH_SESSION).await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read portal session");
            None
        }
    };

    let Some(stored) = stored else {
        return SessionState::absent();
    };

    if stored.is_expired() {
        tracing::debug!(user_id = %stored.user_id, "Stored access token expired");
        if let Err(e) = clear_auth_session(session).await {
            tracing::warn!(error = %e, "Failed to clear expired session");
        }
        return SessionState::absent();
    }

    let result = state.auth().get_session(&stored.access_token).await;
    if let Err(e) = &result {
        tracing::warn!(
            error = %e,
            user_id = %stored.user_id,
            "Session query failed, treating visitor as signed out"
        );
    }

    let resolved = SessionState::from_query(result);
    if let Some(identity) = resolved.identity() {
        note_identity(identity);
    }
    resolved
}

/// Resolve the session, giving up after the configured timeout.
pub async fn current_session_state(state: &AppState, session: &Session) -> SessionState {
    let timeout = state.config().session_resolve_timeout;
    if let Ok(resolved) = tokio::time::timeout(timeout, resolve_session(state, session)).await {
        resolved
    } else {
        tracing::info!(
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "Session query still pending, showing loading page"
        );
        SessionState::Pending
    }
}

fn note_identity(identity: &SessionIdentity) {
    set_sentry_user(
        &identity.user_id,
        identity.email.as_ref().map(bsm_core::Email::as_str),
    );
    match &identity.role {
        RoleAttribute::Known(_) => {}
        RoleAttribute::Unrecognized(raw) => {
            tracing::warn!(user_id = %identity.user_id, role = %raw, "Unrecognized role");
        }
        RoleAttribute::Missing => {
            tracing::warn!(user_id = %identity.user_id, "Signed-in user has no role");
        }
    }
}

/// Extractor yielding the resolved (or still pending) session state.
///
/// Never rejects.
pub struct ResolvedSession(pub SessionState);

impl FromRequestParts<AppState> for ResolvedSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_state = match parts.extensions.get::<Session>() {
            Some(session) => current_session_state(state, session).await,
            None => SessionState::absent(),
        };
        Ok(Self(session_state))
    }
}

/// Marker naming the role a guarded view requires.
pub trait RequiredRole: Send + Sync + 'static {
    const ROLE: Role;
}

/// Views restricted to [`Role::Admin`].
pub struct AdminOnly;

impl RequiredRole for AdminOnly {
    const ROLE: Role = Role::Admin;
}

/// Views restricted to [`Role::Customer`].
pub struct CustomerOnly;

impl RequiredRole for CustomerOnly {
    const ROLE: Role = Role::Customer;
}

/// Extractor that admits only sessions whose role is `R::ROLE`.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_dashboard(
///     RequireRole(identity, _): RequireRole<AdminOnly>,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.user_id)
/// }
/// ```
pub struct RequireRole<R>(pub SessionIdentity, pub PhantomData<R>);

/// Why a guarded view was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// Session still resolving: show the loading page.
    Loading,
    /// No session: redirect to the login surface.
    RedirectToLogin(&'static str),
    /// Wrong role: redirect to the access-guard surface.
    AccessDenied(&'static str),
    /// API request without a session.
    Unauthorized,
    /// API request with the wrong role.
    Forbidden,
    /// API request while the session is still resolving.
    Unavailable,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Loading => LoadingPage::default().into_response(),
            Self::RedirectToLogin(path) | Self::AccessDenied(path) => {
                Redirect::to(path).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

impl<R: RequiredRole> FromRequestParts<AppState> for RequireRole<R> {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_api = parts.uri.path().starts_with("/api/");
        let paths = state.paths();

        let session_state = match parts.extensions.get::<Session>() {
            Some(session) => current_session_state(state, session).await,
            None => SessionState::absent(),
        };

        let login = if is_api {
            GuardRejection::Unauthorized
        } else {
            GuardRejection::RedirectToLogin(paths.login)
        };

        match decide(&session_state, RouteRequest::View(R::ROLE)) {
            RouteDecision::Loading if is_api => Err(GuardRejection::Unavailable),
            RouteDecision::Loading => Err(GuardRejection::Loading),
            RouteDecision::LoginRedirect => Err(login),
            RouteDecision::Unauthorized | RouteDecision::Blank if is_api => {
                Err(GuardRejection::Forbidden)
            }
            RouteDecision::Unauthorized | RouteDecision::Blank => {
                tracing::info!(
                    path = %parts.uri.path(),
                    required = %R::ROLE,
                    "Role mismatch, sending visitor to access guard"
                );
                Err(GuardRejection::AccessDenied(paths.unauthorized))
            }
            RouteDecision::AdminView | RouteDecision::CustomerView => session_state
                .identity()
                .cloned()
                .map(|identity| Self(identity, PhantomData))
                .ok_or(login),
        }
    }
}

/// Store the hosted-service session after sign-in.
///
/// The session ID is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_session(
    session: &Session,
    auth_session: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTH_SESSION, auth_session)
        .await
}

/// Take the hosted-service session out of the cookie session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_session(
    session: &Session,
) -> Result<Option<AuthSession>, tower_sessions::session::Error> {
    session
        .remove::<AuthSession>(session_keys::AUTH_SESSION)
        .await
}
