//! Scripted transport shared by the offline integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderName, REFERER};

use nse_rs::client::NseClient;
use nse_rs::error::{NseError, Result};
use nse_rs::transport::{HttpRequest, HttpResponse, Transport};

pub const PRIMING_URL: &str = "https://prime.test/option-chain";
pub const API_URL: &str = "https://api.test/api";
pub const ARCHIVE_URL: &str = "https://nsearchives.test";

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub set_cookies: Vec<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            set_cookies: Vec::new(),
            body: body.into(),
        }
    }

    /// Priming page response setting one cookie.
    pub fn primed(cookie: &str) -> Self {
        Self::ok("<html></html>").cookie(cookie)
    }

    pub fn cookie(mut self, cookie: &str) -> Self {
        self.set_cookies.push(cookie.to_owned());
        self
    }
}

/// What the transport saw.
#[derive(Debug, Clone)]
pub struct Seen {
    pub url: String,
    pub cookie: Option<String>,
    pub referer: Option<String>,
}

/// Replays responses in order and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.url).collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            let header = |name: HeaderName| {
                request
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            };
            self.seen.lock().unwrap().push(Seen {
                url: request.url.to_string(),
                cookie: header(COOKIE),
                referer: header(REFERER),
            });

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| {
                    NseError::InvalidArgument(format!("unscripted request {}", request.url))
                })?;

            let status = StatusCode::from_u16(reply.status).unwrap();
            let mut resp = HttpResponse::from_bytes(status, reply.body);
            for cookie in reply.set_cookies {
                resp = resp.with_set_cookie(cookie);
            }
            Ok(resp)
        })
    }
}

/// Hands out a new `nsit=genN` cookie on every priming hit and rejects API
/// calls whose cookie generation is `stale_until` or older.
#[derive(Debug, Default)]
pub struct RotatingTransport {
    stale_until: usize,
    primes: AtomicUsize,
    calls: AtomicUsize,
}

impl RotatingTransport {
    pub fn new(stale_until: usize) -> Arc<Self> {
        Arc::new(Self {
            stale_until,
            ..Self::default()
        })
    }

    pub fn primes(&self) -> usize {
        self.primes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for RotatingTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            if request.url.as_str() == PRIMING_URL {
                let generation = self.primes.fetch_add(1, Ordering::SeqCst) + 1;
                return Ok(HttpResponse::from_bytes(StatusCode::OK, "<html></html>")
                    .with_set_cookie(format!("nsit=gen{generation}; Path=/")));
            }

            self.calls.fetch_add(1, Ordering::SeqCst);
            let generation = request
                .headers
                .get(COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("nsit=gen"))
                .and_then(|v| v.parse::<usize>().ok());
            if generation.is_none_or(|g| g <= self.stale_until) {
                Ok(HttpResponse::from_bytes(StatusCode::UNAUTHORIZED, "stale"))
            } else {
                Ok(HttpResponse::from_bytes(StatusCode::OK, "{}"))
            }
        })
    }
}

/// A client wired to `transport` with fast throttles and test URLs.
pub fn client(transport: Arc<ScriptedTransport>, dir: &Path) -> NseClient {
    NseClient::builder()
        .download_dir(dir)
        .base_url(API_URL)
        .archive_url(ARCHIVE_URL)
        .priming_url(PRIMING_URL)
        .lookup_rps(1000)
        .default_rps(1000)
        .transport(transport)
        .build()
        .unwrap()
}
