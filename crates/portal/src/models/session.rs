//! Session-related types.
//!
//! Types stored in the portal's cookie session. The portal keeps only the
//! hosted service's access token; identity and role are re-read from the
//! hosted service on every navigation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use bsm_core::{Email, UserId};

use crate::services::auth::IssuedSession;

/// Seconds before real expiry at which a token is considered expired.
const EXPIRY_LEEWAY_SECONDS: i64 = 60;

/// Session-stored credentials for the hosted auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for the hosted service.
    pub access_token: String,
    pub user_id: UserId,
    pub email: Email,
    /// Token lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
}

impl AuthSession {
    /// Capture a freshly issued session, stamping it with the current time.
    #[must_use]
    pub fn from_issued(issued: IssuedSession) -> Self {
        Self {
            access_token: issued.access_token,
            user_id: issued.user_id,
            email: issued.email,
            expires_in: issued.expires_in,
            obtained_at: Utc::now().timestamp(),
        }
    }

    /// Check if the access token is expired (with 60s buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    fn is_expired_at(&self, now: i64) -> bool {
        self.expires_in.is_some_and(|expires_in| {
            now >= self
                .obtained_at
                .saturating_add(expires_in)
                .saturating_sub(EXPIRY_LEEWAY_SECONDS)
        })
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the hosted-service session of the signed-in user.
    pub const AUTH_SESSION: &str = "auth_session";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(expires_in: Option<i64>) -> AuthSession {
        AuthSession {
            access_token: "token".to_string(),
            user_id: UserId::random(),
            email: Email::parse("agent@bsm.test").unwrap(),
            expires_in,
            obtained_at: 1_000,
        }
    }

    #[test]
    fn test_token_without_lifetime_never_expires() {
        assert!(!session(None).is_expired_at(i64::MAX));
    }

    #[test]
    fn test_token_expires_with_leeway() {
        let s = session(Some(3600));
        assert!(!s.is_expired_at(1_000 + 3600 - 61));
        assert!(s.is_expired_at(1_000 + 3600 - 60));
    }

    #[test]
    fn test_huge_lifetime_does_not_overflow() {
        let s = session(Some(i64::MAX));
        assert!(!s.is_expired_at(i64::MAX - 61));
        assert!(s.is_expired_at(i64::MAX));

        let negative = session(Some(i64::MIN));
        assert!(negative.is_expired_at(0));
    }
}
