//! Service layer.
//!
//! - `auth` - Hosted auth/session collaborator

pub mod auth;
