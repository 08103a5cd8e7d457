#![allow(missing_docs)]
//! Market types: index constituents and their price moves.

use serde::{Deserialize, Serialize};

use crate::types::option_chain::number_or_zero;

/// One row of `GET /equity-stockIndices`.
///
/// The first row of an index response describes the index itself and has
/// `priority == 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub symbol: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub open: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub day_high: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub day_low: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub previous_close: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub change: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub p_change: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_traded_volume: f64,
}

impl StockRow {
    /// Whether this row is the index summary rather than a constituent.
    pub fn is_index_row(&self) -> bool {
        self.priority == 1
    }
}

/// Response from `GET /equity-stockIndices`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConstituents {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub data: Vec<StockRow>,
}
