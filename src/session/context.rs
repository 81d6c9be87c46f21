use crate::config::ScraperConfig;
use crate::session::state::SessionState;
use crate::Result;
use reqwest::cookie::Jar;
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// One logical browser session against the scraped site
///
/// Owns the immutable configuration, the mutable session state, and an HTTP
/// client whose cookie jar carries the site's session cookies. The `state`
/// mutex doubles as the request lock: the transport holds it across the
/// rate-limit wait, so concurrent calls on one context cannot reorder
/// around the limiter.
///
/// One context is one session; `reset` tears the session down without
/// destroying the context.
pub struct SessionContext {
    config: Arc<ScraperConfig>,
    state: Mutex<SessionState>,
    client: RwLock<Client>,
}

impl SessionContext {
    /// Creates a context from a configuration, with a fresh cookie jar and
    /// logged-out state
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            state: Mutex::new(SessionState::new()),
            client: RwLock::new(client),
        })
    }

    /// The configuration this context was built from
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// A handle to the current HTTP client
    ///
    /// Clients are cheap clones sharing the same connection pool and cookie
    /// jar. A request that started before `reset` finishes on the old
    /// client; it cannot resurrect the discarded jar.
    pub(crate) fn client(&self) -> Client {
        self.client.read().unwrap().clone()
    }

    pub(crate) fn state(&self) -> &Mutex<SessionState> {
        &self.state
    }

    /// Whether the session currently believes it is authenticated
    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.is_logged_in
    }

    pub(crate) async fn set_logged_in(&self, value: bool) {
        self.state.lock().await.is_logged_in = value;
    }

    /// Discards all session-identifying state
    ///
    /// Swaps in a new client with an empty cookie jar and marks the session
    /// logged out. Configuration is preserved; the context stays usable.
    pub async fn reset(&self) -> Result<()> {
        let fresh = build_http_client(&self.config)?;
        *self.client.write().unwrap() = fresh;
        self.state.lock().await.is_logged_in = false;
        Ok(())
    }
}

/// Builds the HTTP client for a session
///
/// The client owns a persistent cookie jar so session cookies round-trip
/// automatically across the login flow and subsequent page fetches.
pub fn build_http_client(config: &ScraperConfig) -> Result<Client> {
    let jar = Arc::new(Jar::default());

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .cookie_provider(jar)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}
