//! Session cookie jar with best-effort persistence.
//!
//! The jar is an opaque name → value map. It is filled from `Set-Cookie`
//! headers, replayed as a single `Cookie` header, and written to a JSON file
//! on shutdown so the next client can skip priming.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serializable contents of a [`CookieJar`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSnapshot {
    /// Cookie name → value.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// When the session was last primed.
    #[serde(default)]
    pub primed_at: Option<DateTime<Utc>>,
}

/// Thread-safe cookie store owned by one session.
#[derive(Debug, Default)]
pub struct CookieJar {
    inner: Mutex<CookieSnapshot>,
}

impl CookieJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a jar from `path`. A missing or unreadable file yields an empty jar.
    pub fn load(path: &Path) -> Self {
        let snapshot = match std::fs::read(path) {
            Ok(raw) => match serde_json::from_slice::<CookieSnapshot>(&raw) {
                Ok(snapshot) => {
                    tracing::debug!(
                        path = %path.display(),
                        cookies = snapshot.cookies.len(),
                        "loaded persisted cookies"
                    );
                    snapshot
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "ignoring corrupt cookie file");
                    CookieSnapshot::default()
                }
            },
            Err(_) => CookieSnapshot::default(),
        };
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Write the jar to `path` as JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_vec_pretty(&self.snapshot())?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }

    /// Store cookies from raw `Set-Cookie` header values. Returns how many were applied.
    ///
    /// An empty value, `Max-Age <= 0` or an `Expires` date in the past
    /// removes the cookie.
    pub fn absorb<'a>(&self, set_cookies: impl IntoIterator<Item = &'a str>) -> usize {
        let now = Utc::now();
        let mut inner = self.lock();
        let mut applied = 0;
        for header in set_cookies {
            let Some(cookie) = SetCookie::parse(header) else {
                continue;
            };
            if cookie.value.is_empty() || cookie.is_expired(now) {
                tracing::trace!(name = %cookie.name, "cookie removed by server");
                inner.cookies.remove(&cookie.name);
            } else {
                inner.cookies.insert(cookie.name, cookie.value);
            }
            applied += 1;
        }
        applied
    }

    /// The `Cookie` request header value, or `None` when the jar is empty.
    pub fn header_value(&self) -> Option<String> {
        let inner = self.lock();
        if inner.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = inner
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    /// Look up a single cookie.
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().cookies.get(name).cloned()
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.lock().cookies.len()
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.lock().cookies.is_empty()
    }

    /// Record a successful priming round-trip.
    pub fn mark_primed(&self) {
        self.lock().primed_at = Some(Utc::now());
    }

    /// When the session was last primed, if ever.
    pub fn primed_at(&self) -> Option<DateTime<Utc>> {
        self.lock().primed_at
    }

    /// Whether a priming round-trip has happened (here or in a persisted session).
    pub fn is_primed(&self) -> bool {
        self.lock().primed_at.is_some()
    }

    /// Drop all cookies and the priming timestamp.
    pub fn clear(&self) {
        *self.lock() = CookieSnapshot::default();
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> CookieSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, CookieSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One parsed `Set-Cookie` header.
#[derive(Debug)]
struct SetCookie {
    name: String,
    value: String,
    max_age: Option<i64>,
    expires: Option<DateTime<Utc>>,
}

impl SetCookie {
    /// `"name=value; Path=/; Max-Age=0"` → name, value and expiry attributes.
    fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_owned(),
            value: value.trim().trim_matches('"').to_owned(),
            max_age: None,
            expires: None,
        };
        for attribute in parts {
            let Some((key, value)) = attribute.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if key.trim().eq_ignore_ascii_case("max-age") {
                cookie.max_age = value.parse().ok();
            } else if key.trim().eq_ignore_ascii_case("expires") {
                cookie.expires = parse_expires(value);
            }
        }
        Some(cookie)
    }

    /// `Max-Age` takes precedence over `Expires` when both are present.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.max_age, self.expires) {
            (Some(max_age), _) => max_age <= 0,
            (None, Some(expires)) => expires <= now,
            (None, None) => false,
        }
    }
}

/// RFC 2822 dates, plus the dashed `Thu, 01-Jan-1970 00:00:00 GMT` form.
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}
