//! Pure computations over fetched data.
//!
//! Nothing in this module performs I/O; every function is reentrant and can
//! be used on payloads obtained elsewhere.
//!
//! - [`option_chain`]: chain normalization, ATM, max pain, PCR, essential view
//! - [`expiry`]: expiry parsing and selection
//! - [`movers`]: top gainers / losers

pub mod expiry;
pub mod movers;
pub mod option_chain;
