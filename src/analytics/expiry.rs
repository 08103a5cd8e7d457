//! Expiry discovery: parse, sort and pick the nearest expiry.

use chrono::NaiveDate;

use crate::constants::EXPIRY_DATE_FORMAT;
use crate::error::{NseError, Result};

/// Parse an upstream expiry such as `27-Nov-2025`.
pub fn parse_expiry(expiry: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(expiry.trim(), EXPIRY_DATE_FORMAT)
        .map_err(|err| NseError::InvalidArgument(format!("unrecognised expiry {expiry:?}: {err}")))
}

/// Expiries in ascending calendar order.
pub fn sort_expiries(expiries: &[String]) -> Result<Vec<String>> {
    let mut dated = expiries
        .iter()
        .map(|expiry| Ok((parse_expiry(expiry)?, expiry.clone())))
        .collect::<Result<Vec<_>>>()?;
    dated.sort_by_key(|(date, _)| *date);
    Ok(dated.into_iter().map(|(_, expiry)| expiry).collect())
}

/// The earliest expiry, or [`NseError::NoExpiry`] when the list is empty.
pub fn earliest_expiry(symbol: &str, expiries: &[String]) -> Result<String> {
    sort_expiries(expiries)?
        .into_iter()
        .next()
        .ok_or_else(|| NseError::NoExpiry(symbol.to_owned()))
}

/// Use `requested` when given, otherwise the earliest available expiry.
pub fn resolve_expiry(symbol: &str, requested: Option<&str>, expiries: &[String]) -> Result<String> {
    match requested {
        Some(expiry) => Ok(expiry.to_owned()),
        None => earliest_expiry(symbol, expiries),
    }
}
