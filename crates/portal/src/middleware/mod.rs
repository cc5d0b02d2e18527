//! HTTP middleware stack and extractors for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)
//!
//! Role guarding is done per route with the [`RequireRole`] extractor, and
//! the landing route uses [`ResolvedSession`] with a [`ResponseNavigator`].

pub mod auth;
pub mod navigation;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminOnly, CustomerOnly, GuardRejection, RequireRole, RequiredRole, ResolvedSession,
    clear_auth_session, current_session_state, resolve_session, set_auth_session,
};
pub use navigation::{ResponseNavigator, local_path};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
