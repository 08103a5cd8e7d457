//! Option Chain endpoints: legacy and v3 chains, contract info, compiled views.

use crate::analytics::expiry::{resolve_expiry, sort_expiries};
use crate::analytics::option_chain::{Chain, CompiledChain, EssentialChain, compile, essential_view};
use crate::client::NseClient;
use crate::constants::OPTION_INDICES;
use crate::error::Result;
use crate::types::option_chain::*;

/// Whether `symbol` is an index served by the index option endpoints.
pub fn is_option_index(symbol: &str) -> bool {
    OPTION_INDICES
        .iter()
        .any(|index| index.eq_ignore_ascii_case(symbol))
}

impl NseClient {
    /// Retrieve the full legacy option chain (every expiry) for an index or stock.
    ///
    /// **Endpoint:** `GET /option-chain-indices` or `GET /option-chain-equities`
    pub async fn option_chain_legacy(&self, symbol: &str) -> Result<LegacyOptionChain> {
        let path = if is_option_index(symbol) {
            "/option-chain-indices"
        } else {
            "/option-chain-equities"
        };
        self.get_json(path, &[("symbol", symbol)]).await
    }

    /// Retrieve the expiry and strike lists for an underlying.
    ///
    /// **Endpoint:** `GET /option-chain-contract-info`
    pub async fn contract_info(&self, symbol: &str) -> Result<ContractInfo> {
        self.get_json("/option-chain-contract-info", &[("symbol", symbol)])
            .await
    }

    /// Retrieve the v3 option chain for one expiry.
    ///
    /// **Endpoint:** `GET /option-chain-v3`
    pub async fn option_chain_v3(&self, symbol: &str, expiry: &str) -> Result<V3OptionChain> {
        let kind = if is_option_index(symbol) {
            "Indices"
        } else {
            "Equity"
        };
        self.get_json(
            "/option-chain-v3",
            &[("type", kind), ("symbol", symbol), ("expiry", expiry)],
        )
        .await
    }

    /// Available expiries for an underlying, earliest first.
    pub async fn expiry_dates(&self, symbol: &str) -> Result<Vec<String>> {
        let info = self.contract_info(symbol).await?;
        sort_expiries(&info.expiry_dates)
    }

    /// Fetch and normalize the v3 chain. Without an expiry, the earliest one
    /// from contract info is used.
    ///
    /// Returns the chain and the expiry it was fetched for.
    pub async fn option_chain(&self, symbol: &str, expiry: Option<&str>) -> Result<(Chain, String)> {
        let contract = self.contract_info(symbol).await?;
        let expiry = resolve_expiry(symbol, expiry, &contract.expiry_dates)?;
        let chain = self.option_chain_v3(symbol, &expiry).await?;
        Ok((Chain::from_raw(RawOptionChain::V3 { chain, contract }), expiry))
    }

    /// ATM, max pain, per-strike aggregates and PCR from the v3 chain.
    pub async fn compiled_option_chain(
        &self,
        symbol: &str,
        expiry: Option<&str>,
    ) -> Result<CompiledChain> {
        let (chain, expiry) = self.option_chain(symbol, expiry).await?;
        Ok(compile(&chain, &expiry))
    }

    /// Same metrics computed from the legacy chain.
    pub async fn compiled_option_chain_legacy(
        &self,
        symbol: &str,
        expiry: Option<&str>,
    ) -> Result<CompiledChain> {
        let raw = self.option_chain_legacy(symbol).await?;
        let chain = Chain::from_raw(RawOptionChain::Legacy(raw));
        let expiry = resolve_expiry(symbol, expiry, &chain.expiries)?;
        Ok(compile(&chain, &expiry))
    }

    /// Only the strikes within `strikes_each_side` intervals of ATM, with
    /// reduced legs.
    pub async fn essential_option_chain(
        &self,
        symbol: &str,
        expiry: Option<&str>,
        strikes_each_side: u32,
    ) -> Result<EssentialChain> {
        let (chain, expiry) = self.option_chain(symbol, expiry).await?;
        Ok(essential_view(&chain, &expiry, strikes_each_side))
    }
}
