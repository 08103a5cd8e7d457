//! Core client for the NSE public data API.
//!
//! The [`NseClient`] struct is the main entry point. It wraps a shared
//! [`SessionManager`] (cookies, priming, throttling) and provides typed
//! `get_json`, `get_text` and `download` helpers.
//!
//! API endpoint methods are added to `NseClient` via `impl` blocks in the
//! [`crate::api`] module.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::constants::{API_BASE_URL, ARCHIVE_BASE_URL};
use crate::error::Result;
use crate::session::{SessionConfig, SessionManager};
use crate::transport::{ReqwestTransport, Transport};

/// Core client for the NSE public data API.
///
/// Cheap to clone; clones share one session, so cookies and throttle state
/// are common to all of them.
///
/// # Example
///
/// ```no_run
/// use nse_rs::client::NseClient;
///
/// # #[tokio::main]
/// # async fn main() -> nse_rs::error::Result<()> {
/// let client = NseClient::new("./downloads")?;
/// let status: serde_json::Value = client.get_json("/marketStatus", &[]).await?;
/// client.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NseClient {
    session: Arc<SessionManager>,
    /// Base URL for JSON API requests (defaults to [`API_BASE_URL`]).
    base_url: String,
    /// Base URL for archive downloads (defaults to [`ARCHIVE_BASE_URL`]).
    archive_url: String,
}

impl NseClient {
    /// Create a client that stores downloads and cookies in `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().download_dir(download_dir).build()
    }

    /// Start configuring a client.
    pub fn builder() -> NseClientBuilder {
        NseClientBuilder::new()
    }

    /// Returns the shared session.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Returns the JSON API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the archive base URL.
    pub fn archive_url(&self) -> &str {
        &self.archive_url
    }

    /// Returns the download directory.
    pub fn download_dir(&self) -> &Path {
        &self.session.config().download_dir
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// GET an API path and deserialize the JSON response.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R> {
        self.session.request_json(&self.url(path), query).await
    }

    /// GET an API path and return the raw body (CSV endpoints).
    pub async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        self.session.request_text(&self.url(path), query).await
    }

    /// Download an archive path into `dir`, returning the absolute file path.
    pub async fn download(&self, archive_path: &str, dir: &Path) -> Result<PathBuf> {
        let url = join_url(&self.archive_url, archive_path);
        self.session.download_to_file(&url, dir).await
    }

    /// Persist session cookies so the next client can skip priming.
    pub async fn shutdown(&self) -> Result<()> {
        self.session.shutdown().await
    }

    /// Build the full URL from a path segment.
    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an [`NseClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use nse_rs::client::NseClient;
///
/// # fn main() -> nse_rs::error::Result<()> {
/// let client = NseClient::builder()
///     .download_dir("./downloads")
///     .default_rps(2)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NseClientBuilder {
    config: SessionConfig,
    base_url: String,
    archive_url: String,
    transport: Option<Arc<dyn Transport>>,
}

impl NseClientBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            base_url: API_BASE_URL.to_owned(),
            archive_url: ARCHIVE_BASE_URL.to_owned(),
            transport: None,
        }
    }

    /// Directory for downloads and the cookie file. Default: `$TMPDIR/nse-rs`.
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = dir.into();
        self
    }

    /// JSON API base URL. Useful for testing against a mock server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Archive base URL.
    pub fn archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Page requested to collect anti-bot cookies.
    pub fn priming_url(mut self, url: impl Into<String>) -> Self {
        self.config.priming_url = url.into();
        self
    }

    /// Requests per second for search / autocomplete. Default: 15.
    pub fn lookup_rps(mut self, rps: u32) -> Self {
        self.config.lookup_rps = rps.max(1);
        self
    }

    /// Requests per second for everything else. Default: 3.
    pub fn default_rps(mut self, rps: u32) -> Self {
        self.config.default_rps = rps.max(1);
        self
    }

    /// Per-request timeout. Default: 15 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Use a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client, loading any persisted cookies.
    pub fn build(self) -> Result<NseClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        Ok(NseClient {
            session: Arc::new(SessionManager::new(self.config, transport)),
            base_url: self.base_url,
            archive_url: self.archive_url,
        })
    }
}

impl Default for NseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
