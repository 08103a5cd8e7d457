//! Gainers / losers selection.

use nse_rs::analytics::movers::{top_gainers, top_losers};
use nse_rs::types::market::StockRow;

fn rows() -> Vec<StockRow> {
    [("A", -1.0), ("B", 2.0), ("C", 5.0), ("D", 3.0)]
        .into_iter()
        .map(|(symbol, p_change)| StockRow {
            symbol: symbol.into(),
            p_change,
            ..StockRow::default()
        })
        .collect()
}

fn symbols(rows: &[StockRow]) -> Vec<&str> {
    rows.iter().map(|row| row.symbol.as_str()).collect()
}

#[test]
fn test_top_gainers_descending_positive_only() {
    assert_eq!(symbols(&top_gainers(&rows(), 2)), ["C", "D"]);
    assert_eq!(symbols(&top_gainers(&rows(), 10)), ["C", "D", "B"]);
}

#[test]
fn test_top_losers_most_negative_first_negative_only() {
    assert_eq!(symbols(&top_losers(&rows(), 2)), ["A"]);

    let mut more = rows();
    more.push(StockRow {
        symbol: "E".into(),
        p_change: -4.5,
        ..StockRow::default()
    });
    assert_eq!(symbols(&top_losers(&more, 2)), ["E", "A"]);
}

#[test]
fn test_unchanged_rows_are_neither() {
    let flat = vec![StockRow {
        symbol: "F".into(),
        ..StockRow::default()
    }];
    assert!(top_gainers(&flat, 5).is_empty());
    assert!(top_losers(&flat, 5).is_empty());
}
