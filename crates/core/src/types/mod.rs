//! Core identity types for the BSM portal.
//!
//! Type-safe wrappers for the concepts the route decision reads.

pub mod email;
pub mod id;
pub mod identity;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::SessionIdentity;
pub use role::{Role, RoleAttribute, RoleParseError};
