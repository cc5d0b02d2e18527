//! Static route targets.

/// Paths the router navigates between.
///
/// Recomputed for every navigation from this static table; nothing here is
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePaths {
    pub home: &'static str,
    pub login: &'static str,
    pub admin: &'static str,
    pub customer: &'static str,
    pub unauthorized: &'static str,
}

impl RoutePaths {
    pub const DEFAULT: Self = Self {
        home: "/",
        login: "/login",
        admin: "/admin",
        customer: "/customer-dashboard",
        unauthorized: "/unauthorized",
    };
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self::DEFAULT
    }
}
