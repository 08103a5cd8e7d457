#![allow(missing_docs)]
//! Historical report types.

use serde::Deserialize;

/// `{ "data": [...] }` envelope shared by the historical and deal reports.
///
/// Rows are kept as raw JSON; the client does not interpret their columns.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T = serde_json::Value> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
