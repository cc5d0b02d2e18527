//! Access-guard surface.
//!
//! Shown when a role-specific view is requested by a session with another
//! role. It offers exactly two exits: home, and back one step. There is no
//! way to retry with a different role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Query, State},
    http::{HeaderMap, StatusCode, header::REFERER},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use bsm_core::RoleRouter;

use crate::middleware::{ResponseNavigator, local_path};
use crate::state::AppState;

/// Query parameters for the back exit.
#[derive(Debug, Deserialize)]
pub struct BackQuery {
    /// Page the visitor came from before being refused.
    pub to: Option<String>,
}

/// Access-guard page template.
#[derive(Template, WebTemplate)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub home_href: String,
    pub back_href: String,
}

fn referer_path(headers: &HeaderMap, state: &AppState) -> Option<String> {
    let raw = headers.get(REFERER)?.to_str().ok()?;
    local_path(raw, &state.config().base_url, state.paths().unauthorized)
}

/// Display the access-guard page.
///
/// The `Referer` of this request is the page that linked to the refused
/// view (redirects keep it), so it is captured into the back link.
pub async fn unauthorized(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let base = state.paths().unauthorized;
    let back_href = referer_path(&headers, &state).map_or_else(
        || format!("{base}/back"),
        |previous| format!("{base}/back?to={}", urlencoding::encode(&previous)),
    );

    (
        StatusCode::FORBIDDEN,
        UnauthorizedTemplate {
            home_href: format!("{base}/home"),
            back_href,
        },
    )
}

/// Exit: back one step in navigation history.
pub async fn back(
    State(state): State<AppState>,
    Query(query): Query<BackQuery>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let paths = *state.paths();
    let previous = query
        .to
        .as_deref()
        .and_then(|to| local_path(to, &state.config().base_url, paths.unauthorized))
        .or_else(|| referer_path(&headers, &state));

    let mut router = RoleRouter::new(
        ResponseNavigator::new(uri.path(), previous, paths.home),
        paths,
    );
    router.back();

    exit(router.into_navigator(), paths.home)
}

/// Exit: home.
pub async fn home(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Response {
    let paths = *state.paths();
    let mut router = RoleRouter::new(ResponseNavigator::new(uri.path(), None, paths.home), paths);
    router.home();

    exit(router.into_navigator(), paths.home)
}

fn exit(navigator: ResponseNavigator, home: &'static str) -> Response {
    navigator
        .into_redirect()
        .unwrap_or_else(|| Redirect::to(home))
        .into_response()
}
