//! Error types for the `nse-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, NseError>`.
//!
//! [`NseError`] covers:
//! - **Range errors**: from-date after to-date, or a window over the endpoint cap
//! - **Expiry errors**: the upstream returned no option expiries
//! - **HTTP status errors**: non-2xx responses (401 is retried once before surfacing)
//! - **Download errors**: a downloaded file is missing or empty
//! - **Transport errors**: network, TLS, timeout failures
//! - **JSON / IO / URL errors**
//! - **Invalid arguments**: client-side validation errors

/// All possible errors produced by the `nse-rs` client.
#[derive(Debug, thiserror::Error)]
pub enum NseError {
    /// The requested date range is reversed or wider than the endpoint allows.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// The upstream returned an empty expiry list.
    #[error("No expiry dates available for {0}")]
    NoExpiry(String),

    /// The server returned a non-success HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// The downloaded file does not exist or is empty.
    #[error("Download failed: {0}")]
    Download(String),

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response body.
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A file system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl NseError {
    /// The upstream HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NseError>;
