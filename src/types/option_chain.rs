#![allow(missing_docs)]
//! Option Chain types: legacy and v3 payloads, contract info, legs.
//!
//! The two upstream schemas differ in where the expiry lives (`expiryDate`
//! per row vs `expiryDates` per row plus a separate contract-info call) and
//! in which rows define the strike interval. Both are wrapped in
//! [`RawOptionChain`] and normalized once by
//! [`Chain::from_raw`](crate::analytics::option_chain::Chain::from_raw).

use serde::{Deserialize, Deserializer, Serialize};

/// Numbers that may arrive as `null`.
pub(crate) fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Option leg (per CE/PE)
// ---------------------------------------------------------------------------

/// Data for a single call or put at a given strike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeg {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub open_interest: f64,
    #[serde(default, alias = "changeinOpenInterest", deserialize_with = "number_or_zero")]
    pub change_in_open_interest: f64,
    #[serde(default, alias = "pchangeinOpenInterest", deserialize_with = "number_or_zero")]
    pub p_change_in_open_interest: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_traded_volume: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub implied_volatility: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub change: f64,
    #[serde(default, alias = "pchange", deserialize_with = "number_or_zero")]
    pub p_change: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_buy_quantity: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_sell_quantity: f64,
    #[serde(default, alias = "bidprice", deserialize_with = "number_or_zero")]
    pub bid_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub ask_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub underlying_value: f64,
}

// ---------------------------------------------------------------------------
// Legacy schema (`/option-chain-indices`, `/option-chain-equities`)
// ---------------------------------------------------------------------------

/// One strike row of the legacy schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRow {
    pub strike_price: f64,
    pub expiry_date: String,
    #[serde(rename = "CE", default)]
    pub ce: Option<OptionLeg>,
    #[serde(rename = "PE", default)]
    pub pe: Option<OptionLeg>,
}

/// The `records` envelope: every expiry, every strike.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRecords {
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    #[serde(default)]
    pub data: Vec<LegacyRow>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub underlying_value: f64,
}

/// The `filtered` envelope: the nearest expiry only, in upstream order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyFiltered {
    #[serde(default)]
    pub data: Vec<LegacyRow>,
}

/// Response from `GET /option-chain-indices` and `GET /option-chain-equities`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyOptionChain {
    pub records: LegacyRecords,
    #[serde(default)]
    pub filtered: LegacyFiltered,
}

// ---------------------------------------------------------------------------
// v3 schema (`/option-chain-v3`)
// ---------------------------------------------------------------------------

/// One strike row of the v3 schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Row {
    pub strike_price: f64,
    pub expiry_dates: String,
    #[serde(rename = "CE", default)]
    pub ce: Option<OptionLeg>,
    #[serde(rename = "PE", default)]
    pub pe: Option<OptionLeg>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Records {
    #[serde(default)]
    pub data: Vec<V3Row>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub underlying_value: f64,
}

/// Response from `GET /option-chain-v3`.
#[derive(Debug, Clone, Deserialize)]
pub struct V3OptionChain {
    pub records: V3Records,
}

/// Response from `GET /option-chain-contract-info`: the authoritative
/// expiry list for the v3 schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractInfo {
    #[serde(rename = "expiryDates", default)]
    pub expiry_dates: Vec<String>,
    #[serde(rename = "strikePrice", default)]
    pub strike_prices: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// A fetched option chain in either upstream schema.
#[derive(Debug, Clone)]
pub enum RawOptionChain {
    Legacy(LegacyOptionChain),
    V3 {
        chain: V3OptionChain,
        contract: ContractInfo,
    },
}
