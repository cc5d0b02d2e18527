//! HTTP implementation of the routing collaborator.
//!
//! A page request is one navigation pass: [`ResponseNavigator`] records the
//! single navigation the role router issues and turns it into a `303`
//! redirect when the response is built.

use axum::response::Redirect;
use bsm_core::Navigator;
use url::Url;

/// Navigator backed by the response of the current request.
#[derive(Debug)]
pub struct ResponseNavigator {
    current: String,
    previous: Option<String>,
    fallback: &'static str,
    redirect: Option<String>,
}

impl ResponseNavigator {
    /// Navigator for a request to `current`.
    ///
    /// `previous` is the page to return to on `navigate_back`; without one,
    /// going back lands on `fallback`.
    #[must_use]
    pub fn new(current: &str, previous: Option<String>, fallback: &'static str) -> Self {
        Self {
            current: current.to_string(),
            previous,
            fallback,
            redirect: None,
        }
    }

    /// The recorded navigation, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Turn the recorded navigation into a redirect response.
    #[must_use]
    pub fn into_redirect(self) -> Option<Redirect> {
        self.redirect.map(|location| Redirect::to(&location))
    }
}

impl Navigator for ResponseNavigator {
    fn current_path(&self) -> &str {
        &self.current
    }

    fn navigate_to(&mut self, path: &str) {
        tracing::debug!(from = %self.current, to = %path, "Navigating");
        self.redirect = Some(path.to_string());
    }

    fn navigate_back(&mut self) {
        let target = self
            .previous
            .clone()
            .unwrap_or_else(|| self.fallback.to_string());
        tracing::debug!(from = %self.current, to = %target, "Navigating back");
        self.redirect = Some(target);
    }
}

/// Reduce a back-navigation candidate to a local path.
///
/// Accepts absolute paths (`/tickets?page=2`) and absolute URLs. Every
/// candidate is resolved against `base_url` the way a browser would resolve
/// it (`\` as `/`, tabs and newlines stripped), and must stay on the portal's
/// origin. Paths under `exclude` are rejected too, so "back" can neither
/// leave the portal nor bounce between guard pages.
#[must_use]
pub fn local_path(raw: &str, base_url: &str, exclude: &str) -> Option<String> {
    if !raw.starts_with('/') && Url::parse(raw).is_err() {
        return None;
    }

    let base = Url::parse(base_url).ok()?;
    let url = base.join(raw).ok()?;
    if url.origin() != base.origin() {
        return None;
    }

    let candidate = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };

    if candidate == exclude || candidate.starts_with(&format!("{exclude}/")) {
        return None;
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://portal.bsm.test";

    #[test]
    fn test_navigate_to_records_redirect() {
        let mut nav = ResponseNavigator::new("/", None, "/");
        assert_eq!(nav.location(), None);
        nav.navigate_to("/login");
        assert_eq!(nav.location(), Some("/login"));
    }

    #[test]
    fn test_navigate_back_prefers_previous_page() {
        let mut nav = ResponseNavigator::new("/unauthorized/back", Some("/kb".into()), "/");
        nav.navigate_back();
        assert_eq!(nav.location(), Some("/kb"));

        let mut nav = ResponseNavigator::new("/unauthorized/back", None, "/");
        nav.navigate_back();
        assert_eq!(nav.location(), Some("/"));
    }

    #[test]
    fn test_local_path_accepts_same_origin() {
        assert_eq!(
            local_path("/tickets?page=2", BASE, "/unauthorized"),
            Some("/tickets?page=2".to_string())
        );
        assert_eq!(
            local_path("https://portal.bsm.test/catalog", BASE, "/unauthorized"),
            Some("/catalog".to_string())
        );
    }

    #[test]
    fn test_local_path_rejects_foreign_and_guard_paths() {
        assert_eq!(local_path("https://evil.test/", BASE, "/unauthorized"), None);
        assert_eq!(local_path("//evil.test/x", BASE, "/unauthorized"), None);
        assert_eq!(local_path("/\\evil.test", BASE, "/unauthorized"), None);
        assert_eq!(local_path("/unauthorized", BASE, "/unauthorized"), None);
        assert_eq!(local_path("/unauthorized/back", BASE, "/unauthorized"), None);
        assert_eq!(local_path("not a url", BASE, "/unauthorized"), None);
    }

    #[test]
    fn test_local_path_rejects_browser_normalised_hosts() {
        assert_eq!(local_path("/\\evil.test/kb", BASE, "/unauthorized"), None);
        assert_eq!(local_path("\\\\evil.test", BASE, "/unauthorized"), None);
        assert_eq!(local_path("/\t/evil.test", BASE, "/unauthorized"), None);
        assert_eq!(local_path("/\r\n/evil.test", BASE, "/unauthorized"), None);
        assert_eq!(
            local_path("https://portal.bsm.test:8443/kb", BASE, "/unauthorized"),
            None
        );
    }

    #[test]
    fn test_local_path_normalises_dot_segments() {
        assert_eq!(
            local_path("/kb/../tickets", BASE, "/unauthorized"),
            Some("/tickets".to_string())
        );
        assert_eq!(
            local_path("/kb/../unauthorized/back", BASE, "/unauthorized"),
            None
        );
    }
}
