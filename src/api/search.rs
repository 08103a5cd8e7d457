//! Search endpoint: symbol autocomplete (throttled in the lookup class).

use serde_json::Value;

use crate::client::NseClient;
use crate::error::Result;

impl NseClient {
    /// Symbols and company names matching `query`.
    ///
    /// **Endpoint:** `GET /search/autocomplete`
    pub async fn autocomplete(&self, query: &str) -> Result<Value> {
        self.get_json("/search/autocomplete", &[("q", query)]).await
    }
}
