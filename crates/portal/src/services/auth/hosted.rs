//! Client for the hosted auth/database service.
//!
//! Speaks the GoTrue-style auth API (`/auth/v1/...`) and the PostgREST-style
//! data API (`/rest/v1/...`) the hosted service exposes.
//!
//! # Role lookup
//!
//! The role is read from the user's `app_metadata.role`. When the user record
//! carries none, the associated profile row is consulted:
//!
//! ```text
//! GET /rest/v1/{profile_table}?id=eq.{user_id}&select=role
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use bsm_core::{Email, RoleAttribute, SessionIdentity, UserId};

use super::{AuthError, AuthProvider, IssuedSession};
use crate::config::AuthServiceConfig;

const APIKEY_HEADER: &str = "apikey";

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    user: HostedUser,
}

#[derive(Debug, Deserialize)]
struct HostedUser {
    id: UserId,
    email: Option<String>,
    #[serde(default)]
    app_metadata: serde_json::Map<String, serde_json::Value>,
}

impl HostedUser {
    /// Non-blank `app_metadata.role`, if any.
    fn metadata_role(&self) -> Option<&str> {
        self.app_metadata
            .get("role")
            .and_then(serde_json::Value::as_str)
            .filter(|raw| !raw.trim().is_empty())
    }

    fn parsed_email(&self) -> Option<Email> {
        self.email.as_deref().and_then(|raw| Email::parse(raw).ok())
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the hosted auth service.
#[derive(Clone)]
pub struct HostedAuthClient {
    inner: Arc<HostedAuthClientInner>,
}

struct HostedAuthClientInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    profile_table: String,
}

impl HostedAuthClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client cannot be built.
    pub fn new(config: &AuthServiceConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HostedAuthClientInner {
                client,
                base_url: config.url.clone(),
                anon_key: config.anon_key.clone(),
                profile_table: config.profile_table.clone(),
            }),
        })
    }

    /// Build an endpoint URL below the service base URL.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    fn profile_url(&self, user_id: UserId) -> Url {
        let mut url = self.endpoint(&format!("rest/v1/{}", self.inner.profile_table));
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "role");
        url
    }

    fn apikey(&self) -> &str {
        self.inner.anon_key.expose_secret()
    }

    /// Look up the role on the user's profile row.
    async fn profile_role(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<RoleAttribute, AuthError> {
        let response = self
            .inner
            .client
            .get(self.profile_url(user_id))
            .header(APIKEY_HEADER, self.apikey())
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        let rows: Vec<ProfileRow> = response.json().await?;
        let raw = rows.into_iter().next().and_then(|row| row.role);
        Ok(RoleAttribute::from_raw(raw.as_deref()))
    }
}

#[async_trait]
impl AuthProvider for HostedAuthClient {
    #[instrument(skip_all)]
    async fn get_session(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionIdentity>, AuthError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("auth/v1/user"))
            .header(APIKEY_HEADER, self.apikey())
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Hosted session no longer valid");
                return Ok(None);
            }
            status if !status.is_success() => return Err(service_error(response).await),
            _ => {}
        }

        let user: HostedUser = response.json().await?;
        let role = match user.metadata_role() {
            Some(raw) => RoleAttribute::from_raw(Some(raw)),
            None => self.profile_role(access_token, user.id).await?,
        };

        tracing::debug!(user_id = %user.id, ?role, "Resolved hosted session");
        Ok(Some(SessionIdentity::new(user.id, user.parsed_email(), role)))
    }

    #[instrument(skip_all, fields(email = %email))]
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<IssuedSession, AuthError> {
        let mut url = self.endpoint("auth/v1/token");
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .inner
            .client
            .post(url)
            .header(APIKEY_HEADER, self.apikey())
            .json(&PasswordGrant {
                email: email.as_str(),
                password: password.expose_secret(),
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(AuthError::InvalidCredentials);
            }
            status if !status.is_success() => return Err(service_error(response).await),
            _ => {}
        }

        let token: TokenResponse = response.json().await?;
        let issued_email = token.user.parsed_email().unwrap_or_else(|| email.clone());

        Ok(IssuedSession {
            access_token: token.access_token,
            user_id: token.user.id,
            email: issued_email,
            expires_in: token.expires_in,
        })
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/v1/logout"))
            .header(APIKEY_HEADER, self.apikey())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        // Already revoked counts as signed out.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(service_error(response).await)
        }
    }

    async fn is_reachable(&self) -> bool {
        self.inner
            .client
            .get(self.endpoint("auth/v1/health"))
            .header(APIKEY_HEADER, self.apikey())
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

async fn service_error(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    AuthError::Service { status, message }
}
