//! Navigating role router.
//!
//! Wraps [`decide`] with the one side effect it is allowed: a single
//! navigation per resolution through a [`Navigator`].

use super::{RouteDecision, RoutePaths, RouteRequest, SessionState, decide};

/// The routing collaborator.
pub trait Navigator {
    /// Path currently displayed.
    fn current_path(&self) -> &str;

    /// Navigate to `path`.
    fn navigate_to(&mut self, path: &str);

    /// Go back one step in navigation history.
    fn navigate_back(&mut self);
}

/// What the caller should show after the router ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Session still loading.
    Spinner,
    /// Nothing at all.
    Nothing,
    /// Access-guard surface.
    AccessDenied,
    /// Already at the decision's target; render it where we are.
    InPlace(RouteDecision),
    /// A navigation to this path was just issued.
    Navigated(&'static str),
    /// A navigation to this path was issued earlier and not repeated.
    Redirecting(&'static str),
}

/// Session resolver / role router.
///
/// One instance corresponds to one mounted view. It remembers the last
/// decision it navigated for, so re-running with the same resolved state is
/// a no-op.
#[derive(Debug)]
pub struct RoleRouter<N> {
    navigator: N,
    paths: RoutePaths,
    navigated: Option<RouteDecision>,
}

impl<N: Navigator> RoleRouter<N> {
    #[must_use]
    pub const fn new(navigator: N, paths: RoutePaths) -> Self {
        Self {
            navigator,
            paths,
            navigated: None,
        }
    }

    /// Evaluate the session and navigate at most once.
    pub fn activate(&mut self, state: &SessionState, request: RouteRequest) -> Render {
        let decision = decide(state, request);

        let Some(target) = decision.target(&self.paths) else {
            return match decision {
                RouteDecision::Loading => Render::Spinner,
                RouteDecision::Unauthorized => Render::AccessDenied,
                _ => Render::Nothing,
            };
        };

        if self.navigator.current_path() == target {
            self.navigated = Some(decision);
            return Render::InPlace(decision);
        }

        if self.navigated == Some(decision) {
            return Render::Redirecting(target);
        }

        self.navigator.navigate_to(target);
        self.navigated = Some(decision);
        Render::Navigated(target)
    }

    /// Access-guard exit: back to the home path.
    pub fn home(&mut self) {
        if self.navigator.current_path() != self.paths.home {
            self.navigator.navigate_to(self.paths.home);
        }
    }

    /// Access-guard exit: one step back in history.
    pub fn back(&mut self) {
        self.navigator.navigate_back();
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Give back the navigator, e.g. to read what it recorded.
    pub fn into_navigator(self) -> N {
        self.navigator
    }
}
