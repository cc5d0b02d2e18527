//! Session resolution and role-based routing.
//!
//! - [`decide`] is the pure decision: `(session state, requested route) -> RouteDecision`.
//! - [`RoleRouter`] applies a decision through a [`Navigator`], navigating at
//!   most once per resolution.

mod decision;
mod paths;
mod router;

pub use decision::{Resolution, RouteDecision, RouteRequest, SessionState, decide};
pub use paths::RoutePaths;
pub use router::{Navigator, Render, RoleRouter};
