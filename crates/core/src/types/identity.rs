//! Identity of an authenticated session.

use serde::{Deserialize, Serialize};

use super::{Email, RoleAttribute, UserId};

/// What the hosted auth service tells us about the holder of a session.
///
/// Read-only from the portal's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: Option<Email>,
    pub role: RoleAttribute,
}

impl SessionIdentity {
    #[must_use]
    pub const fn new(user_id: UserId, email: Option<Email>, role: RoleAttribute) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }
}
