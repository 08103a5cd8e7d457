//! Cookie-gated, throttled session over the upstream HTTP API.
//!
//! The exchange's public endpoints reject requests that do not carry the
//! anti-bot cookies handed out by its HTML pages. [`SessionManager`] hides
//! that dance behind three primitives:
//!
//! - [`SessionManager::request_json`]: GET and deserialize JSON
//! - [`SessionManager::request_text`]: GET and return the raw body
//! - [`SessionManager::download_to_file`]: GET and stream the body to disk
//!
//! Every outbound call (priming included) first waits on the session's
//! [`RateThrottle`]. Before the first call, and after a `401`, the session
//! requests the priming page to collect cookies and replays the request once;
//! the sequencing lives in [`AuthRetry`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::constants::{
    ACCEPT_LANGUAGE, COOKIE_FILE_NAME, PRIMING_URL, REFERER_OPTION_CHAIN, REFERER_QUOTES,
    REFERER_REPORTS, REQUEST_TIMEOUT_SECS, USER_AGENT, rate_limits,
};
use crate::cookies::CookieJar;
use crate::error::{NseError, Result};
use crate::throttle::{RateThrottle, ThrottleClass};
use crate::transport::{BodyStream, HttpRequest, HttpResponse, Transport};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionManager`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory for downloads and the persisted cookie jar.
    pub download_dir: PathBuf,
    /// Page requested to obtain anti-bot cookies.
    pub priming_url: String,
    /// Requests per second for search / autocomplete calls.
    pub lookup_rps: u32,
    /// Requests per second for every other call.
    pub default_rps: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Location of the persisted cookie jar.
    pub fn cookie_path(&self) -> PathBuf {
        self.download_dir.join(COOKIE_FILE_NAME)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            download_dir: std::env::temp_dir().join("nse-rs"),
            priming_url: PRIMING_URL.to_owned(),
            lookup_rps: rate_limits::lookup::PER_SECOND,
            default_rps: rate_limits::default::PER_SECOND,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Two-state policy for authentication failures: a fresh request may be
/// re-primed and replayed once, a replayed one may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRetry {
    /// No re-priming has happened for this request yet.
    #[default]
    Fresh,
    /// The session was re-primed and the request replayed.
    Retried,
}

/// What the session should do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Hand the response to the caller (success or non-auth error).
    Proceed,
    /// Re-prime the session and replay the request.
    Reprime,
    /// A replayed request was rejected again; surface the 401.
    GiveUp,
}

impl AuthRetry {
    /// Advance the policy with the status of the latest attempt.
    pub fn on_status(&mut self, status: StatusCode) -> AuthOutcome {
        if status != StatusCode::UNAUTHORIZED {
            return AuthOutcome::Proceed;
        }
        match self {
            Self::Fresh => {
                *self = Self::Retried;
                AuthOutcome::Reprime
            }
            Self::Retried => AuthOutcome::GiveUp,
        }
    }
}

// ---------------------------------------------------------------------------
// Session manager
// ---------------------------------------------------------------------------

/// Owns the cookie jar, the throttle and the transport for one client.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    throttle: RateThrottle,
    cookies: CookieJar,
    config: SessionConfig,
    /// Serializes priming and re-priming across concurrent requests.
    priming: tokio::sync::Mutex<()>,
    /// Bumped on every successful priming round-trip.
    generation: AtomicU64,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("transport", &self.transport)
            .field("throttle", &self.throttle)
            .field("cookies", &self.cookies.len())
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    /// Create a session, loading persisted cookies from the download directory.
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let cookies = CookieJar::load(&config.cookie_path());
        let throttle = RateThrottle::new(config.lookup_rps, config.default_rps);
        Self {
            transport,
            throttle,
            cookies,
            config,
            priming: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the cookie jar.
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Returns the throttle.
    pub fn throttle(&self) -> &RateThrottle {
        &self.throttle
    }

    /// GET `url` with `query` and deserialize the JSON body.
    pub async fn request_json<R: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<R> {
        let resp = self.get(url, query).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(NseError::Json)
    }

    /// GET `url` with `query` and return the body as text.
    pub async fn request_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        self.get(url, query).await?.text().await
    }

    /// Stream `url` into `dir`, named after the last path segment.
    ///
    /// Returns the absolute path. Fails with [`NseError::Download`] when the
    /// file is missing or empty afterwards; an empty or partial file is
    /// removed before the error is returned.
    pub async fn download_to_file(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let parsed = Url::parse(url)?;
        let file_name = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| NseError::InvalidArgument(format!("no file name in {url}")))?
            .to_owned();

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);

        let resp = self.get(url, &[]).await?;
        if let Err(err) = write_body(resp.into_body(), &path).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(err);
        }

        let len = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(_) => {
                return Err(NseError::Download(format!(
                    "{} was not created",
                    path.display()
                )));
            }
        };
        if len == 0 {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(NseError::Download(format!("{} is empty", path.display())));
        }

        let path = tokio::fs::canonicalize(&path).await?;
        tracing::info!(path = %path.display(), bytes = len, "download complete");
        Ok(path)
    }

    /// Request the priming page and store the cookies it sets.
    pub async fn prime(&self) -> Result<()> {
        let url = Url::parse(&self.config.priming_url)?;
        self.throttle.check(ThrottleClass::Default).await;
        tracing::info!(%url, "priming session cookies");

        let resp = self.transport.execute(self.build_request(url)).await?;
        let status = resp.status;
        let applied = self
            .cookies
            .absorb(resp.set_cookies.iter().map(String::as_str));

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NseError::HttpStatus { status, body });
        }

        self.cookies.mark_primed();
        self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(cookies = applied, "session primed");
        Ok(())
    }

    /// Persist the cookie jar into the download directory.
    pub async fn shutdown(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.config.download_dir).await?;
        let path = self.config.cookie_path();
        self.cookies.save(&path).await?;
        tracing::info!(path = %path.display(), cookies = self.cookies.len(), "cookies persisted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Throttled, primed GET with a single re-prime on 401.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let url = build_url(url, query)?;
        let class = ThrottleClass::for_url(&url);

        self.ensure_primed().await?;

        let mut retry = AuthRetry::Fresh;
        loop {
            self.throttle.check(class).await;
            tracing::debug!(%url, ?class, "GET");

            let generation = self.generation.load(Ordering::Acquire);
            let resp = self.transport.execute(self.build_request(url.clone())).await?;
            self.cookies
                .absorb(resp.set_cookies.iter().map(String::as_str));

            match retry.on_status(resp.status) {
                AuthOutcome::Proceed => return ensure_success(resp).await,
                AuthOutcome::Reprime => {
                    tracing::warn!(%url, "401 from upstream, re-priming session");
                    self.reprime(generation).await?;
                }
                AuthOutcome::GiveUp => {
                    tracing::warn!(%url, "401 after re-priming, giving up");
                    return ensure_success(resp).await;
                }
            }
        }
    }

    async fn ensure_primed(&self) -> Result<()> {
        if self.cookies.is_primed() {
            return Ok(());
        }
        let _guard = self.priming.lock().await;
        if self.cookies.is_primed() {
            return Ok(());
        }
        self.prime().await
    }

    /// Re-prime unless another request already did so after `seen`.
    async fn reprime(&self, seen: u64) -> Result<()> {
        let _guard = self.priming.lock().await;
        if self.generation.load(Ordering::Acquire) != seen {
            tracing::debug!("session already re-primed, replaying");
            return Ok(());
        }
        self.cookies.clear();
        self.prime().await
    }

    fn build_request(&self, url: Url) -> HttpRequest {
        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(header::REFERER, HeaderValue::from_static(referer_for(&url)));
        if let Some(cookie) = self.cookies.header_value() {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.insert(header::COOKIE, value);
                }
                Err(_) => tracing::warn!("cookie jar holds invalid header characters"),
            }
        }

        HttpRequest {
            url,
            headers,
            timeout: self.config.timeout,
        }
    }
}

/// Parse `url` and append `query` (no trailing `?` when empty).
fn build_url(url: &str, query: &[(&str, &str)]) -> Result<Url> {
    if query.is_empty() {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse_with_params(url, query)?)
    }
}

/// The page a browser would have been on when making this call.
fn referer_for(url: &Url) -> &'static str {
    let path = url.path();
    let archive = url
        .host_str()
        .is_some_and(|host| host.starts_with("nsearchives"));

    if path.contains("option-chain") {
        REFERER_OPTION_CHAIN
    } else if archive || path.contains("/historical") || path.contains("/reports") {
        REFERER_REPORTS
    } else {
        REFERER_QUOTES
    }
}

async fn ensure_success(resp: HttpResponse) -> Result<HttpResponse> {
    let status = resp.status;
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(NseError::HttpStatus { status, body })
    }
}

async fn write_body(mut body: BodyStream, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
