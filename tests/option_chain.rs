//! Option chain normalization and compiled metrics.

use serde_json::json;

use nse_rs::analytics::expiry::{earliest_expiry, parse_expiry, resolve_expiry, sort_expiries};
use nse_rs::analytics::option_chain::*;
use nse_rs::error::NseError;
use nse_rs::types::option_chain::*;

const EXPIRY: &str = "27-Nov-2025";

fn leg(oi: f64) -> OptionLeg {
    OptionLeg {
        open_interest: oi,
        last_price: 10.0,
        ..OptionLeg::default()
    }
}

fn row(strike: f64, ce_oi: Option<f64>, pe_oi: Option<f64>) -> OptionChainRow {
    OptionChainRow {
        strike_price: strike,
        expiry: EXPIRY.into(),
        ce: ce_oi.map(leg),
        pe: pe_oi.map(leg),
    }
}

fn chain(underlying: f64, rows: Vec<OptionChainRow>) -> Chain {
    let strikes: Vec<f64> = rows.iter().map(|r| r.strike_price).collect();
    Chain {
        timestamp: "19-Nov-2025 15:30:00".into(),
        underlying,
        expiries: vec![EXPIRY.into()],
        strike_interval: infer_strike_interval(&strikes),
        rows,
    }
}

// ===================================================================
// Max pain
// ===================================================================

#[test]
fn test_max_pain_symmetric_open_interest_lands_in_the_middle() {
    let rows = vec![
        row(100.0, Some(10.0), Some(0.0)),
        row(110.0, Some(5.0), Some(5.0)),
        row(120.0, Some(0.0), Some(15.0)),
    ];
    assert_eq!(max_pain(&rows, EXPIRY), Some(110.0));
}

#[test]
fn test_max_pain_ignores_other_expiries() {
    let mut rows = vec![
        row(100.0, Some(10.0), Some(0.0)),
        row(110.0, Some(5.0), Some(5.0)),
        row(120.0, Some(0.0), Some(15.0)),
    ];
    rows.push(OptionChainRow {
        expiry: "04-Dec-2025".into(),
        ..row(130.0, Some(0.0), Some(100_000.0))
    });
    assert_eq!(max_pain(&rows, EXPIRY), Some(110.0));
    assert_eq!(max_pain(&rows, "04-Dec-2025"), Some(130.0));
    assert_eq!(max_pain(&rows, "01-Jan-2030"), None);
}

#[test]
fn test_max_pain_tie_goes_to_first_row() {
    let rows = vec![row(200.0, None, None), row(100.0, None, None)];
    assert_eq!(max_pain(&rows, EXPIRY), Some(200.0));
}

// ===================================================================
// Interval & ATM
// ===================================================================

#[test]
fn test_interval_from_sorted_distinct_strikes() {
    assert_eq!(infer_strike_interval(&[150.0, 100.0, 100.0, 200.0, 50.0]), 50.0);
    assert_eq!(infer_strike_interval(&[24000.0]), 50.0);
    assert_eq!(infer_strike_interval(&[]), 50.0);
    assert_eq!(infer_strike_interval(&[105.0, 100.0]), 5.0);
}

#[test]
fn test_interval_from_upstream_order() {
    assert_eq!(interval_from_upstream_order(&[100.0, 120.0, 110.0]), 20.0);
    assert_eq!(interval_from_upstream_order(&[120.0, 100.0]), 50.0);
    assert_eq!(interval_from_upstream_order(&[100.0]), 50.0);
}

#[test]
fn test_atm_rounds_to_interval_multiple() {
    assert_eq!(atm_by_interval(24_137.4, 50.0), 24_150.0);
    assert_eq!(atm_by_interval(24_112.0, 50.0), 24_100.0);
    assert_eq!(atm_by_interval(104.0, 10.0), 100.0);
    assert_eq!(atm_by_interval(106.0, 10.0), 110.0);
}

#[test]
fn test_nearest_listed_strike() {
    let strikes = [100.0, 110.0, 125.0, 140.0];
    assert_eq!(nearest_listed_strike(strikes, 121.0), Some(125.0));
    assert_eq!(nearest_listed_strike(strikes, 105.0), Some(100.0));
    assert_eq!(nearest_listed_strike(std::iter::empty(), 105.0), None);
}

// ===================================================================
// Compile
// ===================================================================

#[test]
fn test_compile_totals_pcr_and_max_oi() {
    let compiled = compile(
        &chain(
            112.0,
            vec![
                row(100.0, Some(10.0), Some(4.0)),
                row(110.0, Some(30.0), Some(30.0)),
                row(120.0, Some(30.0), Some(6.0)),
            ],
        ),
        EXPIRY,
    );

    assert_eq!(compiled.strike_interval, 10.0);
    assert_eq!(compiled.atm, 110.0);
    assert_eq!(compiled.coi_total, 70.0);
    assert_eq!(compiled.poi_total, 40.0);
    assert_eq!(compiled.pcr, 0.57);
    assert_eq!(compiled.max_coi, Some(110.0), "first-seen wins on ties");
    assert_eq!(compiled.max_poi, Some(110.0));

    let pcrs: Vec<Option<f64>> = compiled.chain.iter().map(|s| s.pcr).collect();
    assert_eq!(pcrs, vec![Some(0.4), Some(1.0), Some(0.2)]);
    assert_eq!(compiled.chain[0].ce.unwrap().oi, 10.0);
    assert_eq!(compiled.chain[0].pe.unwrap().last, 10.0);
}

#[test]
fn test_pcr_guards_against_zero_call_open_interest() {
    let compiled = compile(
        &chain(
            100.0,
            vec![
                row(100.0, None, Some(50.0)),
                row(110.0, Some(0.0), Some(20.0)),
            ],
        ),
        EXPIRY,
    );

    assert_eq!(compiled.coi_total, 0.0);
    assert_eq!(compiled.pcr, 0.0);
    assert!(compiled.pcr.is_finite());
    assert!(compiled.chain.iter().all(|s| s.pcr.is_none()));
    assert_eq!(compiled.max_coi, None);
    assert_eq!(compiled.max_poi, Some(100.0));
}

#[test]
fn test_pcr_is_none_when_put_open_interest_is_zero() {
    let compiled = compile(
        &chain(
            100.0,
            vec![
                row(100.0, Some(10.0), Some(0.0)),
                row(110.0, Some(5.0), None),
            ],
        ),
        EXPIRY,
    );

    assert_eq!(compiled.coi_total, 15.0);
    assert_eq!(compiled.poi_total, 0.0);
    assert_eq!(compiled.pcr, 0.0);
    assert!(compiled.chain.iter().all(|s| s.pcr.is_none()));
    assert_eq!(compiled.max_coi, Some(100.0));
    assert_eq!(compiled.max_poi, None);
}

#[test]
fn test_compile_unknown_expiry_is_empty_not_nan() {
    let compiled = compile(&chain(100.0, vec![row(100.0, Some(1.0), Some(1.0))]), "01-Jan-2030");
    assert!(compiled.chain.is_empty());
    assert_eq!(compiled.pcr, 0.0);
    assert_eq!(compiled.maxpain, None);
}

// ===================================================================
// Essential view
// ===================================================================

#[test]
fn test_essential_view_keeps_window_around_listed_atm() {
    let rows: Vec<OptionChainRow> = (0..11)
        .map(|i| row(100.0 + 10.0 * f64::from(i), Some(1.0), Some(1.0)))
        .collect();
    let view = essential_view(&chain(151.0, rows), EXPIRY, 2);

    assert_eq!(view.atm, 150.0);
    let strikes: Vec<f64> = view.rows.iter().map(|r| r.strike_price).collect();
    assert_eq!(strikes, vec![130.0, 140.0, 150.0, 160.0, 170.0]);
    let ce = view.rows[0].ce.as_ref().unwrap();
    assert_eq!(ce.open_interest, 1.0);
    assert_eq!(ce.last_price, 10.0);
}

#[test]
fn test_essential_leg_serializes_reduced_fields_only() {
    let full = OptionLeg {
        identifier: Some("OPTIDXNIFTY27-11-2025CE24000.00".into()),
        total_buy_quantity: 900.0,
        last_price: 12.5,
        ..OptionLeg::default()
    };
    let value = serde_json::to_value(EssentialLeg::from(&full)).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 7);
    assert!(keys.contains(&"lastPrice"));
    assert!(keys.contains(&"changeInOpenInterest"));
    assert!(!keys.contains(&"identifier"));
}

// ===================================================================
// Schema normalization
// ===================================================================

fn legacy_payload() -> serde_json::Value {
    json!({
        "records": {
            "expiryDates": ["04-Dec-2025", "27-Nov-2025"],
            "timestamp": "19-Nov-2025 15:30:00",
            "underlyingValue": 112.0,
            "strikePrices": [100, 110, 120],
            "data": [
                {"strikePrice": 100, "expiryDate": "27-Nov-2025",
                 "CE": {"openInterest": 10, "changeinOpenInterest": 2, "lastPrice": 14.5, "pchange": 1.2},
                 "PE": {"openInterest": 0, "lastPrice": 0.5}},
                {"strikePrice": 120, "expiryDate": "27-Nov-2025",
                 "PE": {"openInterest": 15, "lastPrice": 9.0, "impliedVolatility": null}},
                {"strikePrice": 110, "expiryDate": "27-Nov-2025",
                 "CE": {"openInterest": 5}, "PE": {"openInterest": 5}},
                {"strikePrice": 110, "expiryDate": "04-Dec-2025",
                 "CE": {"openInterest": 99}}
            ]
        },
        "filtered": {
            "data": [
                {"strikePrice": 100, "expiryDate": "27-Nov-2025"},
                {"strikePrice": 120, "expiryDate": "27-Nov-2025"},
                {"strikePrice": 110, "expiryDate": "27-Nov-2025"}
            ],
            "CE": {"totOI": 15, "totVol": 0},
            "PE": {"totOI": 20, "totVol": 0}
        }
    })
}

fn v3_payload() -> serde_json::Value {
    json!({
        "records": {
            "timestamp": "19-Nov-2025 15:30:00",
            "underlyingValue": 112.0,
            "data": [
                {"strikePrice": 100, "expiryDates": "27-Nov-2025",
                 "CE": {"openInterest": 10, "changeinOpenInterest": 2, "lastPrice": 14.5, "pchange": 1.2},
                 "PE": {"openInterest": 0, "lastPrice": 0.5}},
                {"strikePrice": 120, "expiryDates": "27-Nov-2025",
                 "PE": {"openInterest": 15, "lastPrice": 9.0}},
                {"strikePrice": 110, "expiryDates": "27-Nov-2025",
                 "CE": {"openInterest": 5}, "PE": {"openInterest": 5}}
            ]
        },
        "filtered": {"data": []}
    })
}

#[test]
fn test_legacy_schema_normalizes_with_upstream_order_interval() {
    let raw: LegacyOptionChain = serde_json::from_value(legacy_payload()).unwrap();
    let chain = Chain::from_raw(RawOptionChain::Legacy(raw));

    assert_eq!(chain.underlying, 112.0);
    assert_eq!(chain.rows.len(), 4);
    assert_eq!(chain.strike_interval, 20.0);
    let ce = chain.rows[0].ce.as_ref().unwrap();
    assert_eq!(ce.change_in_open_interest, 2.0);
    assert_eq!(ce.p_change, 1.2);
    assert!(chain.rows[1].ce.is_none());
    assert_eq!(chain.rows[1].pe.as_ref().unwrap().implied_volatility, 0.0);

    let expiry = earliest_expiry("NIFTY", &chain.expiries).unwrap();
    assert_eq!(expiry, "27-Nov-2025");
    let compiled = compile(&chain, &expiry);
    // 110 and 120 tie; 120 comes first upstream.
    assert_eq!(compiled.maxpain, Some(120.0));
    assert_eq!(compiled.coi_total, 15.0);
    assert_eq!(compiled.poi_total, 20.0);
    assert_eq!(compiled.pcr, 1.33);
}

#[test]
fn test_v3_schema_normalizes_with_sorted_interval_and_contract_expiries() {
    let chain: V3OptionChain = serde_json::from_value(v3_payload()).unwrap();
    let contract: ContractInfo = serde_json::from_value(json!({
        "expiryDates": ["04-Dec-2025", "27-Nov-2025"],
        "strikePrice": ["100", "110", "120"]
    }))
    .unwrap();
    let chain = Chain::from_raw(RawOptionChain::V3 { chain, contract });

    assert_eq!(chain.strike_interval, 10.0);
    assert_eq!(chain.expiries.len(), 2);

    let compiled = compile(&chain, EXPIRY);
    assert_eq!(compiled.maxpain, Some(120.0));
    assert_eq!(compiled.atm, 110.0);
    assert_eq!(compiled.pcr, 1.33);
}

// ===================================================================
// Expiry discovery
// ===================================================================

#[test]
fn test_expiries_sort_by_calendar_date() {
    let raw: Vec<String> = ["30-Dec-2025", "04-Dec-2025", "27-Nov-2025", "26-Mar-2026"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(
        sort_expiries(&raw).unwrap(),
        vec!["27-Nov-2025", "04-Dec-2025", "30-Dec-2025", "26-Mar-2026"]
    );
    assert_eq!(
        parse_expiry("27-NOV-2025").unwrap(),
        chrono::NaiveDate::from_ymd_opt(2025, 11, 27).unwrap()
    );
}

#[test]
fn test_empty_expiry_list_is_no_expiry_error() {
    let err = earliest_expiry("NIFTY", &[]).unwrap_err();
    assert!(matches!(err, NseError::NoExpiry(ref s) if s == "NIFTY"), "got {err:?}");
}

#[test]
fn test_unparseable_expiry_is_invalid_argument() {
    let err = sort_expiries(&["2025-11-27".to_owned()]).unwrap_err();
    assert!(matches!(err, NseError::InvalidArgument(_)), "got {err:?}");
}

#[test]
fn test_requested_expiry_wins_over_discovery() {
    assert_eq!(
        resolve_expiry("NIFTY", Some("04-Dec-2025"), &[]).unwrap(),
        "04-Dec-2025"
    );
}
