//! Constants for the NSE public data endpoints.
//!
//! Contains base URLs, browser headers, throttle rates, date-range quotas and
//! file names. These are used internally by [`NseClient`](crate::client::NseClient)
//! and [`SessionManager`](crate::session::SessionManager), but are also
//! exported for advanced usage.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the JSON API.
pub const API_BASE_URL: &str = "https://www.nseindia.com/api";

/// Base URL for static archive files (bhavcopies, reports).
pub const ARCHIVE_BASE_URL: &str = "https://nsearchives.nseindia.com";

/// Page requested to collect anti-bot cookies before the first API call.
pub const PRIMING_URL: &str = "https://www.nseindia.com/option-chain";

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Browser User-Agent sent with every request.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// `Accept-Language` sent with every request.
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Referer used for quote, search and most JSON endpoints.
pub const REFERER_QUOTES: &str = "https://www.nseindia.com/get-quotes/equity?symbol=HDFCBANK";

/// Referer used for option chain endpoints.
pub const REFERER_OPTION_CHAIN: &str = "https://www.nseindia.com/option-chain";

/// Referer used for archive downloads and historical reports.
pub const REFERER_REPORTS: &str = "https://www.nseindia.com/all-reports";

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// File name of the persisted cookie jar inside the download directory.
pub const COOKIE_FILE_NAME: &str = "nse_cookies.json";

/// Default per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

// ---------------------------------------------------------------------------
// Rate Limits
// ---------------------------------------------------------------------------

/// Throttle rates per call class.
pub mod rate_limits {
    /// Search / autocomplete lookups.
    pub mod lookup {
        /// Maximum lookup requests per second.
        pub const PER_SECOND: u32 = 15;
    }

    /// Every other endpoint.
    pub mod default {
        /// Maximum requests per second.
        pub const PER_SECOND: u32 = 3;
    }
}

// ---------------------------------------------------------------------------
// Date range quotas
// ---------------------------------------------------------------------------

/// Maximum number of days per call for the date-range endpoints.
pub mod date_quotas {
    /// Equity historical prices (`/historical/cm/equity`).
    pub const EQUITY_HISTORY_DAYS: u32 = 100;
    /// India VIX history (`/historical/vixhistory`).
    pub const VIX_HISTORY_DAYS: u32 = 365;
    /// Hard cap for bulk/block deal reports.
    pub const DEALS_MAX_DAYS: i64 = 365;
}

// ---------------------------------------------------------------------------
// Option chain
// ---------------------------------------------------------------------------

/// Strike interval used when it cannot be inferred from the chain.
pub const FALLBACK_STRIKE_INTERVAL: f64 = 50.0;

/// Upstream expiry date format, e.g. `27-Nov-2025`.
pub const EXPIRY_DATE_FORMAT: &str = "%d-%b-%Y";

/// Date format used in query parameters, e.g. `27-11-2025`.
pub const QUERY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Index names served by `/option-chain-indices` rather than the equities endpoint.
pub const OPTION_INDICES: &[&str] = &[
    "NIFTY",
    "BANKNIFTY",
    "FINNIFTY",
    "MIDCPNIFTY",
    "NIFTYNXT50",
];
