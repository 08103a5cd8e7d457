//! Request and response types for the NSE public API.
//!
//! ## Organization
//!
//! - [`option_chain`]: Legacy and v3 option chain payloads, contract info
//! - [`market`]: Index constituents and price moves
//! - [`historical`]: Envelope for date-range reports

pub mod historical;
pub mod market;
pub mod option_chain;
