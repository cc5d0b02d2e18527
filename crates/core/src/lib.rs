//! BSM Core - session, role and routing types.
//!
//! This crate holds everything the portal needs to decide where a visitor
//! goes, with no I/O: no HTTP, no session store, no hosted-auth client.
//! That keeps the routing rules testable without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles and session identities
//! - [`routing`] - Route decision and the navigating role router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod routing;
pub mod types;

pub use routing::{
    Navigator, Render, Resolution, RoleRouter, RouteDecision, RouteRequest, RoutePaths,
    SessionState, decide,
};
pub use types::*;
