//! Pure route decision.
//!
//! [`decide`] maps a session state and the requested route to a
//! [`RouteDecision`]. It performs no navigation; see
//! [`RoleRouter`](super::RoleRouter) for the side-effecting half.

use serde::Serialize;

use super::RoutePaths;
use crate::types::{Role, SessionIdentity};

/// Outcome of a finished session query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Absent,
    Present(SessionIdentity),
}

/// The session as seen by the router: still loading, or resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Resolved(Resolution),
}

impl SessionState {
    /// Build a resolved state from the result of a session query.
    ///
    /// A failed query is indistinguishable from a logged-out visitor.
    pub fn from_query<E>(result: Result<Option<SessionIdentity>, E>) -> Self {
        match result {
            Ok(Some(identity)) => Self::Resolved(Resolution::Present(identity)),
            Ok(None) | Err(_) => Self::Resolved(Resolution::Absent),
        }
    }

    #[must_use]
    pub const fn absent() -> Self {
        Self::Resolved(Resolution::Absent)
    }

    #[must_use]
    pub const fn present(identity: SessionIdentity) -> Self {
        Self::Resolved(Resolution::Present(identity))
    }

    /// The identity, when the session resolved to one.
    #[must_use]
    pub const fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::Resolved(Resolution::Present(identity)) => Some(identity),
            Self::Pending | Self::Resolved(Resolution::Absent) => None,
        }
    }
}

/// What the visitor asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequest {
    /// The entry point that dispatches to a role's landing view.
    Landing,
    /// A view restricted to one role.
    View(Role),
}

/// What to show or where to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Session still resolving: loading indicator only.
    Loading,
    LoginRedirect,
    AdminView,
    CustomerView,
    /// Access-guard surface.
    Unauthorized,
    /// Signed in with a role the portal does not know: render nothing.
    Blank,
}

impl RouteDecision {
    /// The landing view for a role.
    #[must_use]
    pub const fn view(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminView,
            Role::Customer => Self::CustomerView,
        }
    }

    /// Navigation target, for decisions that navigate.
    #[must_use]
    pub const fn target(self, paths: &RoutePaths) -> Option<&'static str> {
        match self {
            Self::LoginRedirect => Some(paths.login),
            Self::AdminView => Some(paths.admin),
            Self::CustomerView => Some(paths.customer),
            Self::Loading | Self::Unauthorized | Self::Blank => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::LoginRedirect => "login_redirect",
            Self::AdminView => "admin_view",
            Self::CustomerView => "customer_view",
            Self::Unauthorized => "unauthorized",
            Self::Blank => "blank",
        }
    }
}

impl std::fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide where a visitor goes.
///
/// Never yields a role view while the session is pending, and never yields a
/// role view whose role differs from the session's.
#[must_use]
pub fn decide(state: &SessionState, request: RouteRequest) -> RouteDecision {
    let identity = match state {
        SessionState::Pending => return RouteDecision::Loading,
        SessionState::Resolved(Resolution::Absent) => return RouteDecision::LoginRedirect,
        SessionState::Resolved(Resolution::Present(identity)) => identity,
    };

    match (request, identity.role.role()) {
        (RouteRequest::Landing, Some(role)) => RouteDecision::view(role),
        (RouteRequest::Landing, None) => RouteDecision::Blank,
        (RouteRequest::View(required), Some(role)) if role == required => {
            RouteDecision::view(role)
        }
        (RouteRequest::View(_), _) => RouteDecision::Unauthorized,
    }
}
