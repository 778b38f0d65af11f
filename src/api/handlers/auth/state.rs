//! Auth state and configuration.

use std::{sync::Arc, time::Duration};

use super::{credentials::Credentials, store::SessionStore};

const DEFAULT_SESSION_TTL_SECONDS: u64 = 30 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl: Duration,
    cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS),
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Mark the session cookie `Secure`; enabled in production.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

/// Everything the auth handlers and the gate need, injected at construction.
pub struct AuthState {
    config: AuthConfig,
    credentials: Credentials,
    store: Arc<dyn SessionStore>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, credentials: Credentials, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            credentials,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }
}
