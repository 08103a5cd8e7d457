//! Date-range validation and chunking for endpoints with per-call day quotas.
//!
//! Historical endpoints refuse ranges longer than a fixed number of days.
//! [`split`] turns an arbitrary inclusive `[from, to]` range into contiguous,
//! non-overlapping [`DateChunk`]s that each fit the quota; the endpoint
//! fetches them in order and concatenates the results.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{NseError, Result};

/// Inclusive `[from, to]` sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateChunk {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateChunk {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Fail with [`NseError::InvalidRange`] when `from` is after `to`.
pub fn validate_ordering(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(NseError::InvalidRange(format!(
            "from date {from} is after to date {to}"
        )));
    }
    Ok(())
}

/// Ordering check plus a hard cap: `to - from` may not exceed `max_days`.
pub fn validate_window(from: NaiveDate, to: NaiveDate, max_days: i64) -> Result<()> {
    validate_ordering(from, to)?;
    let span = (to - from).num_days();
    if span > max_days {
        return Err(NseError::InvalidRange(format!(
            "range {from}..{to} spans {span} days, limit is {max_days}"
        )));
    }
    Ok(())
}

/// Split `[from, to]` into ascending chunks of at most `chunk_days` days.
///
/// The first chunk starts at `from`, the last ends at `to`, and each chunk
/// starts the day after the previous one ends.
pub fn split(from: NaiveDate, to: NaiveDate, chunk_days: u32) -> Result<Vec<DateChunk>> {
    validate_ordering(from, to)?;
    if chunk_days == 0 {
        return Err(NseError::InvalidArgument(
            "chunk_days must be at least 1".into(),
        ));
    }

    let total_days = (to - from).num_days() as u64 + 1;
    let step = u64::from(chunk_days);
    let count = total_days.div_ceil(step);

    let mut chunks = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = from
            .checked_add_days(Days::new(i * step))
            .ok_or_else(|| NseError::InvalidRange(format!("chunk {i} overflows the calendar")))?;
        let end = start
            .checked_add_days(Days::new(step - 1))
            .map_or(to, |end| end.min(to));
        chunks.push(DateChunk { from: start, to: end });
    }

    tracing::trace!(%from, %to, chunk_days, chunks = chunks.len(), "split date range");
    Ok(chunks)
}
