//! Authentication error types.

use thiserror::Error;

/// Errors that can occur talking to the hosted auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// HTTP request failed (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted service answered with an unexpected status.
    #[error("auth service returned {status}: {message}")]
    Service { status: u16, message: String },
}
