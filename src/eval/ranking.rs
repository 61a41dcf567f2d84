use std::cmp::Ordering;

use super::results::PredictionRow;

/// Positions of the `n` rows with the largest actual yield, highest first.
///
/// Ties keep input order. NaN actuals rank below every number.
pub fn top_n_by_actual(rows: &[PredictionRow], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| descending_nan_last(rows[a].actual, rows[b].actual));
    order.truncate(n);
    order
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
