//! Portal roles.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Coarse authorization category deciding which landing view a session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Back-office staff: service catalog, billing, ticket triage.
    Admin,
    /// Support-portal customer: own tickets, knowledge base.
    Customer,
}

impl Role {
    /// Every known role.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Customer];

    /// Stable lower-case name, as stored by the hosted auth service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}

/// The role attribute as read from an identity.
///
/// The hosted service stores roles as free-form text, so the attribute may
/// name a role this portal does not know about, or be absent entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoleAttribute {
    Known(Role),
    Unrecognized(String),
    Missing,
}

impl RoleAttribute {
    /// Classify a raw attribute value. Blank strings count as missing.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Missing,
            Some(value) => value
                .parse()
                .map_or_else(|_| Self::Unrecognized(value.to_string()), Self::Known),
        }
    }

    /// The role, if it is one the portal recognises.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unrecognized(_) | Self::Missing => None,
        }
    }
}

impl From<Role> for RoleAttribute {
    fn from(role: Role) -> Self {
        Self::Known(role)
    }
}
