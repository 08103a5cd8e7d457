//! Option chain compiler: ATM, max pain, per-strike aggregates and PCR.
//!
//! Raw payloads are first normalized into a canonical [`Chain`]; every
//! metric below is computed from that one shape, whichever schema the data
//! came from.
//!
//! Two ATM notions coexist:
//!
//! - [`atm_by_interval`] rounds the underlying to the nearest multiple of
//!   the strike interval and is used by [`compile`];
//! - [`nearest_listed_strike`] picks the listed strike closest to the
//!   underlying and anchors the [`essential_view`] window.

use serde::Serialize;

use crate::constants::FALLBACK_STRIKE_INTERVAL;
use crate::types::option_chain::{OptionLeg, RawOptionChain};

// ---------------------------------------------------------------------------
// Canonical chain
// ---------------------------------------------------------------------------

/// One strike of one expiry with its optional call and put legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainRow {
    pub strike_price: f64,
    pub expiry: String,
    #[serde(rename = "CE", skip_serializing_if = "Option::is_none")]
    pub ce: Option<OptionLeg>,
    #[serde(rename = "PE", skip_serializing_if = "Option::is_none")]
    pub pe: Option<OptionLeg>,
}

impl OptionChainRow {
    fn call_oi(&self) -> f64 {
        self.ce.as_ref().map_or(0.0, |leg| leg.open_interest)
    }

    fn put_oi(&self) -> f64 {
        self.pe.as_ref().map_or(0.0, |leg| leg.open_interest)
    }
}

/// Schema-independent option chain for one underlying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub timestamp: String,
    pub underlying: f64,
    /// Available expiries as reported upstream (not necessarily sorted).
    pub expiries: Vec<String>,
    /// Rows in upstream order.
    pub rows: Vec<OptionChainRow>,
    pub strike_interval: f64,
}

impl Chain {
    /// Normalize either upstream schema.
    ///
    /// The legacy schema takes its strike interval from the first two rows
    /// of the `filtered` block in upstream order; v3 uses the two smallest
    /// distinct strikes.
    pub fn from_raw(raw: RawOptionChain) -> Self {
        match raw {
            RawOptionChain::Legacy(legacy) => {
                let leading: Vec<f64> = if legacy.filtered.data.len() >= 2 {
                    legacy.filtered.data.iter().map(|row| row.strike_price).collect()
                } else {
                    legacy.records.data.iter().map(|row| row.strike_price).collect()
                };
                let rows = legacy
                    .records
                    .data
                    .into_iter()
                    .map(|row| OptionChainRow {
                        strike_price: row.strike_price,
                        expiry: row.expiry_date,
                        ce: row.ce,
                        pe: row.pe,
                    })
                    .collect();
                Self {
                    timestamp: legacy.records.timestamp,
                    underlying: legacy.records.underlying_value,
                    expiries: legacy.records.expiry_dates,
                    rows,
                    strike_interval: interval_from_upstream_order(&leading),
                }
            }
            RawOptionChain::V3 { chain, contract } => {
                let rows: Vec<OptionChainRow> = chain
                    .records
                    .data
                    .into_iter()
                    .map(|row| OptionChainRow {
                        strike_price: row.strike_price,
                        expiry: row.expiry_dates,
                        ce: row.ce,
                        pe: row.pe,
                    })
                    .collect();
                let strikes: Vec<f64> = rows.iter().map(|row| row.strike_price).collect();
                Self {
                    timestamp: chain.records.timestamp,
                    underlying: chain.records.underlying_value,
                    expiries: contract.expiry_dates,
                    strike_interval: infer_strike_interval(&strikes),
                    rows,
                }
            }
        }
    }

    /// Rows belonging to `expiry`, in upstream order.
    pub fn rows_for<'a>(&'a self, expiry: &'a str) -> impl Iterator<Item = &'a OptionChainRow> {
        self.rows.iter().filter(move |row| row.expiry == expiry)
    }
}

// ---------------------------------------------------------------------------
// Strike interval & ATM
// ---------------------------------------------------------------------------

/// Difference between the two smallest distinct strikes, or the fallback.
pub fn infer_strike_interval(strikes: &[f64]) -> f64 {
    let mut distinct: Vec<f64> = strikes.iter().copied().filter(|s| s.is_finite()).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    match distinct.as_slice() {
        [first, second, ..] => second - first,
        _ => FALLBACK_STRIKE_INTERVAL,
    }
}

/// Difference between the first two strikes as listed, or the fallback when
/// that difference is not positive.
pub fn interval_from_upstream_order(strikes: &[f64]) -> f64 {
    match strikes {
        [first, second, ..] if second - first > 0.0 => second - first,
        _ => FALLBACK_STRIKE_INTERVAL,
    }
}

/// Nearest multiple of `interval` to `underlying`.
pub fn atm_by_interval(underlying: f64, interval: f64) -> f64 {
    if interval <= 0.0 {
        return underlying;
    }
    interval * (underlying / interval).round()
}

/// Listed strike with the smallest distance to `underlying`; first wins on ties.
pub fn nearest_listed_strike(strikes: impl IntoIterator<Item = f64>, underlying: f64) -> Option<f64> {
    strikes.into_iter().fold(None, |best, strike| match best {
        Some(current) if (current - underlying).abs() <= (strike - underlying).abs() => Some(current),
        _ => Some(strike),
    })
}

// ---------------------------------------------------------------------------
// Max pain
// ---------------------------------------------------------------------------

/// Strike at which option writers pay out the least at expiry.
///
/// For every candidate strike `K` among the rows of `expiry`:
/// `pain(K) = Σ -(K-S)·callOI(S) for S < K  +  Σ (K-S)·putOI(S) for S > K`.
/// The candidate with the largest (closest to zero) pain wins; ties go to
/// the earlier row. Returns `None` when no row matches `expiry`.
pub fn max_pain(rows: &[OptionChainRow], expiry: &str) -> Option<f64> {
    let rows: Vec<&OptionChainRow> = rows.iter().filter(|row| row.expiry == expiry).collect();

    let mut best: Option<(f64, f64)> = None;
    for candidate in &rows {
        let strike = candidate.strike_price;
        let pain: f64 = rows
            .iter()
            .map(|row| {
                let diff = strike - row.strike_price;
                if diff > 0.0 {
                    -diff * row.call_oi()
                } else if diff < 0.0 {
                    diff * row.put_oi()
                } else {
                    0.0
                }
            })
            .sum();

        match best {
            Some((_, top)) if pain <= top => {}
            _ => best = Some((strike, pain)),
        }
    }
    best.map(|(strike, _)| strike)
}

// ---------------------------------------------------------------------------
// Compiled chain
// ---------------------------------------------------------------------------

/// Condensed view of one leg at one strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegSummary {
    pub last: f64,
    pub oi: f64,
    pub chg: f64,
    pub iv: f64,
}

impl From<&OptionLeg> for LegSummary {
    fn from(leg: &OptionLeg) -> Self {
        Self {
            last: leg.last_price,
            oi: leg.open_interest,
            chg: leg.change,
            iv: leg.implied_volatility,
        }
    }
}

/// Per-strike entry of a [`CompiledChain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeSummary {
    pub strike: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ce: Option<LegSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<LegSummary>,
    /// `put OI / call OI` to two decimals; `None` when either is zero.
    pub pcr: Option<f64>,
}

/// Derived metrics for one expiry. Built fresh from every fetched chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledChain {
    pub expiry: String,
    pub timestamp: String,
    pub underlying: f64,
    pub strike_interval: f64,
    pub atm: f64,
    pub maxpain: Option<f64>,
    pub max_coi: Option<f64>,
    pub max_poi: Option<f64>,
    pub coi_total: f64,
    pub poi_total: f64,
    /// `poi_total / coi_total` to two decimals; `0` when there is no call OI.
    pub pcr: f64,
    pub chain: Vec<StrikeSummary>,
}

/// Compile `chain` for `expiry`.
pub fn compile(chain: &Chain, expiry: &str) -> CompiledChain {
    let mut coi_total = 0.0;
    let mut poi_total = 0.0;
    let mut max_coi: Option<(f64, f64)> = None;
    let mut max_poi: Option<(f64, f64)> = None;
    let mut strikes = Vec::new();

    for row in chain.rows_for(expiry) {
        let coi = row.call_oi();
        let poi = row.put_oi();
        coi_total += coi;
        poi_total += poi;

        if coi > 0.0 && max_coi.is_none_or(|(_, top)| coi > top) {
            max_coi = Some((row.strike_price, coi));
        }
        if poi > 0.0 && max_poi.is_none_or(|(_, top)| poi > top) {
            max_poi = Some((row.strike_price, poi));
        }

        strikes.push(StrikeSummary {
            strike: row.strike_price,
            ce: row.ce.as_ref().map(LegSummary::from),
            pe: row.pe.as_ref().map(LegSummary::from),
            pcr: ratio(poi, coi),
        });
    }

    let compiled = CompiledChain {
        expiry: expiry.to_owned(),
        timestamp: chain.timestamp.clone(),
        underlying: chain.underlying,
        strike_interval: chain.strike_interval,
        atm: atm_by_interval(chain.underlying, chain.strike_interval),
        maxpain: max_pain(&chain.rows, expiry),
        max_coi: max_coi.map(|(strike, _)| strike),
        max_poi: max_poi.map(|(strike, _)| strike),
        coi_total,
        poi_total,
        pcr: ratio(poi_total, coi_total).unwrap_or(0.0),
        chain: strikes,
    };

    tracing::debug!(
        expiry,
        strikes = compiled.chain.len(),
        atm = compiled.atm,
        maxpain = ?compiled.maxpain,
        pcr = compiled.pcr,
        "compiled option chain"
    );
    compiled
}

/// `numerator / denominator` rounded to two decimals, or `None` if either is zero.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if numerator == 0.0 || denominator == 0.0 {
        return None;
    }
    Some(round2(numerator / denominator))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Essential view
// ---------------------------------------------------------------------------

/// A leg reduced to the fields most consumers need.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialLeg {
    pub last_price: f64,
    pub change: f64,
    pub p_change: f64,
    pub open_interest: f64,
    pub change_in_open_interest: f64,
    pub implied_volatility: f64,
    pub total_traded_volume: f64,
}

impl From<&OptionLeg> for EssentialLeg {
    fn from(leg: &OptionLeg) -> Self {
        Self {
            last_price: leg.last_price,
            change: leg.change,
            p_change: leg.p_change,
            open_interest: leg.open_interest,
            change_in_open_interest: leg.change_in_open_interest,
            implied_volatility: leg.implied_volatility,
            total_traded_volume: leg.total_traded_volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialRow {
    pub strike_price: f64,
    #[serde(rename = "CE", skip_serializing_if = "Option::is_none")]
    pub ce: Option<EssentialLeg>,
    #[serde(rename = "PE", skip_serializing_if = "Option::is_none")]
    pub pe: Option<EssentialLeg>,
}

/// The strikes around ATM with reduced legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialChain {
    pub expiry: String,
    pub timestamp: String,
    pub underlying: f64,
    pub strike_interval: f64,
    pub atm: f64,
    pub rows: Vec<EssentialRow>,
}

/// Rows of `expiry` within `strikes_each_side * interval` of the listed ATM strike.
pub fn essential_view(chain: &Chain, expiry: &str, strikes_each_side: u32) -> EssentialChain {
    let interval = chain.strike_interval;
    let atm = nearest_listed_strike(
        chain.rows_for(expiry).map(|row| row.strike_price),
        chain.underlying,
    )
    .unwrap_or_else(|| atm_by_interval(chain.underlying, interval));

    let width = f64::from(strikes_each_side) * interval;
    let tolerance = interval.abs() * 1e-9;
    let rows = chain
        .rows_for(expiry)
        .filter(|row| (row.strike_price - atm).abs() <= width + tolerance)
        .map(|row| EssentialRow {
            strike_price: row.strike_price,
            ce: row.ce.as_ref().map(EssentialLeg::from),
            pe: row.pe.as_ref().map(EssentialLeg::from),
        })
        .collect();

    EssentialChain {
        expiry: expiry.to_owned(),
        timestamp: chain.timestamp.clone(),
        underlying: chain.underlying,
        strike_interval: interval,
        atm,
        rows,
    }
}
