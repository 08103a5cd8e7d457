//! Historical endpoints: equity prices, India VIX, bulk deals.
//!
//! Ranges longer than the endpoint's per-call quota are split with
//! [`dates::split`](crate::dates::split) and fetched chunk by chunk, oldest
//! first. A failing chunk aborts the whole call.

use chrono::NaiveDate;
use serde_json::Value;

use crate::client::NseClient;
use crate::constants::{QUERY_DATE_FORMAT, date_quotas};
use crate::dates::{self, DateChunk};
use crate::error::Result;
use crate::types::historical::DataEnvelope;

impl NseClient {
    /// Daily price history for an equity, e.g. series `"EQ"`.
    ///
    /// Fetched in chunks of 100 days.
    ///
    /// **Endpoint:** `GET /historical/cm/equity`
    pub async fn equity_history(
        &self,
        symbol: &str,
        series: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Value>> {
        let series = format!("[\"{series}\"]");
        let mut rows = Vec::new();
        for chunk in dates::split(from, to, date_quotas::EQUITY_HISTORY_DAYS)? {
            let (from, to) = query_dates(&chunk);
            let page: DataEnvelope = self
                .get_json(
                    "/historical/cm/equity",
                    &[
                        ("symbol", symbol),
                        ("series", series.as_str()),
                        ("from", from.as_str()),
                        ("to", to.as_str()),
                    ],
                )
                .await?;
            rows.extend(page.data);
        }
        Ok(rows)
    }

    /// India VIX history, fetched in chunks of one year.
    ///
    /// **Endpoint:** `GET /historical/vixhistory`
    pub async fn vix_history(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        for chunk in dates::split(from, to, date_quotas::VIX_HISTORY_DAYS)? {
            let (from, to) = query_dates(&chunk);
            let page: DataEnvelope = self
                .get_json(
                    "/historical/vixhistory",
                    &[("from", from.as_str()), ("to", to.as_str())],
                )
                .await?;
            rows.extend(page.data);
        }
        Ok(rows)
    }

    /// Bulk deals between two dates, at most one year apart.
    ///
    /// **Endpoint:** `GET /historical/bulk-deals`
    pub async fn bulk_deals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Value>> {
        dates::validate_window(from, to, date_quotas::DEALS_MAX_DAYS)?;
        let (from, to) = query_dates(&DateChunk { from, to });
        let page: DataEnvelope = self
            .get_json(
                "/historical/bulk-deals",
                &[("from", from.as_str()), ("to", to.as_str())],
            )
            .await?;
        Ok(page.data)
    }
}

fn query_dates(chunk: &DateChunk) -> (String, String) {
    (
        chunk.from.format(QUERY_DATE_FORMAT).to_string(),
        chunk.to.format(QUERY_DATE_FORMAT).to_string(),
    )
}
