//! Authentication service.
//!
//! The portal never owns identities. It asks a hosted auth/database service
//! for the current session and forwards sign-in/sign-out, all through the
//! [`AuthProvider`] trait so handlers can be exercised against a scripted
//! provider in tests.

mod error;
mod hosted;

pub use error::AuthError;
pub use hosted::HostedAuthClient;

use async_trait::async_trait;
use secrecy::SecretString;

use bsm_core::{Email, SessionIdentity, UserId};

/// A session freshly issued by the provider after sign-in.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub user_id: UserId,
    pub email: Email,
    /// Token lifetime in seconds, when the provider reports one.
    pub expires_in: Option<i64>,
}

/// The auth/session collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an access token to the identity behind it.
    ///
    /// `Ok(None)` means the token is no longer valid (signed out, expired,
    /// revoked).
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached or answers
    /// unexpectedly.
    async fn get_session(&self, access_token: &str)
    -> Result<Option<SessionIdentity>, AuthError>;

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a wrong email/password.
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<IssuedSession, AuthError>;

    /// Revoke a session at the provider.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Cheap reachability probe for readiness checks.
    async fn is_reachable(&self) -> bool {
        true
    }
}
