//! Quote endpoints: equity quote, trade info, metadata, market status.

use serde_json::Value;

use crate::client::NseClient;
use crate::error::Result;

impl NseClient {
    /// Price and order book snapshot for an equity.
    ///
    /// **Endpoint:** `GET /quote-equity`
    pub async fn equity_quote(&self, symbol: &str) -> Result<Value> {
        self.get_json("/quote-equity", &[("symbol", symbol)]).await
    }

    /// Delivery, market-cap and traded-value section of the equity quote.
    ///
    /// **Endpoint:** `GET /quote-equity?section=trade_info`
    pub async fn equity_trade_info(&self, symbol: &str) -> Result<Value> {
        self.get_json("/quote-equity", &[("symbol", symbol), ("section", "trade_info")])
            .await
    }

    /// Company name, ISIN, industry and listing flags.
    ///
    /// **Endpoint:** `GET /equity-meta-info`
    pub async fn equity_meta(&self, symbol: &str) -> Result<Value> {
        self.get_json("/equity-meta-info", &[("symbol", symbol)]).await
    }

    /// Open/closed state of each market segment.
    ///
    /// **Endpoint:** `GET /marketStatus`
    pub async fn market_status(&self) -> Result<Value> {
        self.get_json("/marketStatus", &[]).await
    }
}
