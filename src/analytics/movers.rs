//! Top gainers and losers by percentage change.

use crate::types::market::StockRow;

/// Up to `count` rows with a positive `p_change`, largest first.
pub fn top_gainers(rows: &[StockRow], count: usize) -> Vec<StockRow> {
    let mut gainers: Vec<StockRow> = rows.iter().filter(|row| row.p_change > 0.0).cloned().collect();
    gainers.sort_by(|a, b| b.p_change.total_cmp(&a.p_change));
    gainers.truncate(count);
    gainers
}

/// Up to `count` rows with a negative `p_change`, most negative first.
pub fn top_losers(rows: &[StockRow], count: usize) -> Vec<StockRow> {
    let mut losers: Vec<StockRow> = rows.iter().filter(|row| row.p_change < 0.0).cloned().collect();
    losers.sort_by(|a, b| a.p_change.total_cmp(&b.p_change));
    losers.truncate(count);
    losers
}
