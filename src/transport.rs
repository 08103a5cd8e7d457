//! The seam between the session layer and the concrete HTTP stack.
//!
//! [`SessionManager`](crate::session::SessionManager) never talks to
//! `reqwest` directly. It hands an [`HttpRequest`] to a [`Transport`] and
//! receives an [`HttpResponse`] whose body is a byte stream, so downloads can
//! be written to disk chunk by chunk. [`ReqwestTransport`] is the production
//! implementation; tests plug in scripted transports.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, SET_COOKIE};
use url::Url;

use crate::constants::USER_AGENT;
use crate::error::{NseError, Result};

/// Streaming response body.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// A fully prepared GET request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute URL including the serialized query.
    pub url: Url,
    /// Headers to send (User-Agent, Referer, Cookie, ...).
    pub headers: HeaderMap,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Status, cookies and body stream returned by a [`Transport`].
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw `Set-Cookie` header values, in the order received.
    pub set_cookies: Vec<String>,
    body: BodyStream,
}

impl HttpResponse {
    /// Create a response from a body stream.
    pub fn new(status: StatusCode, set_cookies: Vec<String>, body: BodyStream) -> Self {
        Self {
            status,
            set_cookies,
            body,
        }
    }

    /// Create a response from an in-memory body.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::new(status, Vec::new(), stream::once(async move { Ok(body) }).boxed())
    }

    /// Append a `Set-Cookie` header value.
    pub fn with_set_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookies.push(cookie.into());
        self
    }

    /// Take the body stream.
    pub fn into_body(self) -> BodyStream {
        self.body
    }

    /// Collect the whole body into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        let mut body = self.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Collect the whole body as (lossy) UTF-8 text.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("set_cookies", &self.set_cookies)
            .finish_non_exhaustive()
    }
}

/// Executes a single GET request. Implementations must not retry or throttle;
/// that is the session's job.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `request` and return the response head with a streaming body.
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;
}

/// Production transport backed by [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the browser User-Agent.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .http
                .get(request.url)
                .headers(request.headers)
                .timeout(request.timeout)
                .send()
                .await?;

            let status = resp.status();
            let set_cookies = resp
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .map(str::to_owned)
                .collect();
            let body = resp
                .bytes_stream()
                .map(|chunk| chunk.map_err(NseError::from))
                .boxed();

            Ok(HttpResponse::new(status, set_cookies, body))
        })
    }
}
