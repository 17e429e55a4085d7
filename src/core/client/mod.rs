//! Public client surface + builder.
//! Internals are split into `auth` (basic/token selection) and `constants`
//! (host + defaults).

mod auth;
pub(crate) mod constants;

pub use auth::AuthHeader;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::RwLock;
use url::Url;

use crate::core::error::VebraError;
use crate::core::session::{InMemorySessionStore, SessionStore};
use crate::feed::FeedContext;
use constants::{DEFAULT_API_VERSION, DEFAULT_HOST, USER_AGENT};

/// Client for one export-API account.
///
/// Cheap to clone; clones share the HTTP connection pool, the session token
/// and the feed context.
#[derive(Clone)]
pub struct VebraClient {
    http: Client,
    base: Url,
    username: String,
    password: String,
    session: Arc<dyn SessionStore>,
    context: Arc<RwLock<FeedContext>>,
}

impl fmt::Debug for VebraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VebraClient")
            .field("base", &self.base.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl VebraClient {
    /// Create a client for `datafeed` with the default host and API version.
    ///
    /// # Errors
    ///
    /// Returns [`VebraError::Usage`] if any argument is empty, or
    /// [`VebraError::Url`] if the derived base URL is invalid.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        datafeed: impl Into<String>,
    ) -> Result<Self, VebraError> {
        Self::builder()
            .credentials(username, password)
            .datafeed(datafeed)
            .build()
    }

    /// Create a new builder.
    pub fn builder() -> VebraClientBuilder {
        VebraClientBuilder::default()
    }

    /// The resolved base URL (`{host}/export/{datafeed}/v{version}`).
    pub fn base(&self) -> &Url {
        &self.base
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn credentials(&self) -> (&str, &str) {
        (&self.username, &self.password)
    }

    pub(crate) fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub(crate) fn context_lock(&self) -> &RwLock<FeedContext> {
        &self.context
    }
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`VebraClient`].
#[derive(Default)]
pub struct VebraClientBuilder {
    username: Option<String>,
    password: Option<String>,
    datafeed: Option<String>,
    api_version: Option<u8>,
    base_url: Option<Url>,
    session: Option<Arc<dyn SessionStore>>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl VebraClientBuilder {
    /// Set the account credentials. Mandatory.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the data-feed identifier the account is authorized for.
    /// Mandatory unless `base_url` is overridden.
    #[must_use]
    pub fn datafeed(mut self, datafeed: impl Into<String>) -> Self {
        self.datafeed = Some(datafeed.into());
        self
    }

    /// Override the export API version. Default: 7.
    #[must_use]
    pub const fn api_version(mut self, version: u8) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Override the full base URL (e.g., to point at a test server).
    /// When set, `datafeed`/`api_version` are not consulted.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Supply a token store backed by an external session mechanism.
    /// Default: a fresh [`InMemorySessionStore`].
    #[must_use]
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub const fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`VebraError::Usage`] when credentials are missing or neither
    /// `datafeed` nor `base_url` was supplied, [`VebraError::Url`] when the
    /// derived base URL does not parse, and [`VebraError::Transport`] when
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<VebraClient, VebraError> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VebraError::Usage("username is required".into()))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| VebraError::Usage("password is required".into()))?;

        let base = match self.base_url {
            Some(url) => url,
            None => {
                let datafeed = self
                    .datafeed
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| VebraError::Usage("datafeed is required".into()))?;
                let version = self.api_version.unwrap_or(DEFAULT_API_VERSION);
                Url::parse(&format!("{DEFAULT_HOST}/export/{datafeed}/v{version}"))?
            }
        };

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(VebraClient {
            http,
            base,
            username,
            password,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(InMemorySessionStore::new())),
            context: Arc::new(RwLock::new(FeedContext::default())),
        })
    }
}
