//! Page fragments shared by the resolver and the role guard.

use askama::Template;
use askama_web::WebTemplate;

/// Loading indicator shown while the session query is still pending.
///
/// The page refreshes itself; the next request starts a fresh session query.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingPage {
    pub refresh_seconds: u32,
}

impl Default for LoadingPage {
    fn default() -> Self {
        Self { refresh_seconds: 1 }
    }
}

/// Intentionally empty page for signed-in users without a known role.
#[derive(Template, WebTemplate, Default)]
#[template(path = "blank.html")]
pub struct BlankPage;
