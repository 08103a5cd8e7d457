//! # nse-rs
//!
//! A Rust client for the public (undocumented) data endpoints of the
//! [National Stock Exchange of India](https://www.nseindia.com).
//!
//! The upstream API is cookie-gated and rate-limited. [`NseClient`] primes
//! the anti-bot cookies, throttles every call, retries once on `401`, and
//! persists cookies between runs. On top of the raw endpoints it compiles
//! option chains into ATM, max pain and put-call ratio, splits long date
//! ranges into per-call chunks, and rebuilds symbol records from page text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nse_rs::client::NseClient;
//!
//! #[tokio::main]
//! async fn main() -> nse_rs::error::Result<()> {
//!     let client = NseClient::new("./downloads")?;
//!     let chain = client.compiled_option_chain("NIFTY", None).await?;
//!     println!("ATM {} max pain {:?} PCR {}", chain.atm, chain.maxpain, chain.pcr);
//!     client.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod client;
pub mod constants;
pub mod cookies;
pub mod dates;
pub mod error;
pub mod session;
pub mod symbol;
pub mod throttle;
pub mod transport;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::NseClient;
/// Re-export the error type and Result alias.
pub use error::{NseError, Result};
