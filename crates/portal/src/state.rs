//! Application state shared across handlers.

use std::sync::Arc;

use bsm_core::RoutePaths;

use crate::config::PortalConfig;
use crate::services::auth::{AuthError, AuthProvider, HostedAuthClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the auth collaborator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    auth: Arc<dyn AuthProvider>,
    paths: RoutePaths,
}

impl AppState {
    /// Create state backed by the hosted auth service.
    ///
    /// # Errors
    ///
    /// Returns an error if the hosted auth HTTP client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, AuthError> {
        let auth = HostedAuthClient::new(&config.auth)?;
        Ok(Self::with_provider(config, Arc::new(auth)))
    }

    /// Create state with an explicit auth provider.
    #[must_use]
    pub fn with_provider(config: PortalConfig, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                paths: RoutePaths::DEFAULT,
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get the auth collaborator.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthProvider {
        self.inner.auth.as_ref()
    }

    /// Route targets.
    #[must_use]
    pub fn paths(&self) -> &RoutePaths {
        &self.inner.paths
    }
}
