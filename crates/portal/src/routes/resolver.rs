//! Session resolver: the portal's entry point.
//!
//! `GET /` resolves the visitor's session and sends them to their role's
//! landing view, to the login surface, or nowhere at all.

use axum::{
    Json,
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use bsm_core::{Render, RoleRouter, RouteDecision, RoutePaths, RouteRequest, decide};

use crate::components::{BlankPage, LoadingPage};
use crate::middleware::{ResolvedSession, ResponseNavigator};
use crate::state::AppState;

/// Resolve the session and dispatch on role.
pub async fn landing(
    State(state): State<AppState>,
    ResolvedSession(session_state): ResolvedSession,
    uri: Uri,
) -> Response {
    let paths = *state.paths();
    let navigator = ResponseNavigator::new(uri.path(), None, paths.home);
    let mut router = RoleRouter::new(navigator, paths);

    let render = router.activate(&session_state, RouteRequest::Landing);
    tracing::debug!(?render, "Landing resolved");

    respond(render, router.into_navigator(), &paths)
}

/// Build the HTTP response for a router outcome.
///
/// `InPlace` means the visitor is already at the target, so nothing is
/// redirected; the resolver itself has no view of its own to show.
pub fn respond(render: Render, navigator: ResponseNavigator, paths: &RoutePaths) -> Response {
    match render {
        Render::Spinner => LoadingPage::default().into_response(),
        Render::Nothing | Render::InPlace(_) => BlankPage.into_response(),
        Render::AccessDenied => Redirect::to(paths.unauthorized).into_response(),
        Render::Navigated(target) | Render::Redirecting(target) => navigator
            .into_redirect()
            .unwrap_or_else(|| Redirect::to(target))
            .into_response(),
    }
}

/// JSON body of `GET /api/session/route`.
#[derive(Debug, Serialize)]
pub struct RouteDecisionBody {
    pub decision: RouteDecision,
    pub target: Option<&'static str>,
}

/// The resolver's decision, without navigating.
pub async fn route_decision(
    State(state): State<AppState>,
    ResolvedSession(session_state): ResolvedSession,
) -> Json<RouteDecisionBody> {
    let decision = decide(&session_state, RouteRequest::Landing);
    Json(RouteDecisionBody {
        decision,
        target: decision.target(state.paths()),
    })
}
