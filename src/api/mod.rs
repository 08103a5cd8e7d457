//! REST API endpoint implementations.
//!
//! Each sub-module adds high-level `async` methods to
//! [`NseClient`](crate::client::NseClient) via `impl` blocks. All methods go
//! through the client's session, so throttling, cookie priming and the
//! single 401 retry apply automatically.
//!
//! ## Usage
//!
//! ```no_run
//! use nse_rs::NseClient;
//!
//! # #[tokio::main]
//! # async fn main() -> nse_rs::Result<()> {
//! let client = NseClient::new("./downloads")?;
//! let chain = client.compiled_option_chain("NIFTY", None).await?;
//! println!("max pain {:?}, pcr {}", chain.maxpain, chain.pcr);
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`quote`] | 4 | Equity quote, trade info, metadata, market status |
//! | [`search`] | 1 | Symbol autocomplete |
//! | [`option_chain`] | 3 | Legacy / v3 chains, contract info, compiled views |
//! | [`historical`] | 3 | Equity history, VIX history, bulk deals |
//! | [`movers`] | 1 | Index constituents, gainers, losers |
//! | [`archives`] | 2 | Bhavcopy downloads |

pub mod archives;
pub mod historical;
pub mod movers;
pub mod option_chain;
pub mod quote;
pub mod search;
