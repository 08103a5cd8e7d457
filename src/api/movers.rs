//! Index constituent endpoints: constituents, top gainers and losers.

use crate::analytics::movers::{top_gainers, top_losers};
use crate::client::NseClient;
use crate::error::Result;
use crate::types::market::{IndexConstituents, StockRow};

impl NseClient {
    /// Constituents of an index such as `"NIFTY 50"`.
    ///
    /// **Endpoint:** `GET /equity-stockIndices`
    pub async fn index_constituents(&self, index: &str) -> Result<IndexConstituents> {
        self.get_json("/equity-stockIndices", &[("index", index)])
            .await
    }

    /// Up to `count` constituents with the largest percentage gain.
    pub async fn gainers(&self, index: &str, count: usize) -> Result<Vec<StockRow>> {
        let rows = self.constituent_rows(index).await?;
        Ok(top_gainers(&rows, count))
    }

    /// Up to `count` constituents with the largest percentage loss.
    pub async fn losers(&self, index: &str, count: usize) -> Result<Vec<StockRow>> {
        let rows = self.constituent_rows(index).await?;
        Ok(top_losers(&rows, count))
    }

    async fn constituent_rows(&self, index: &str) -> Result<Vec<StockRow>> {
        let constituents = self.index_constituents(index).await?;
        Ok(constituents
            .data
            .into_iter()
            .filter(|row| !row.is_index_row())
            .collect())
    }
}
