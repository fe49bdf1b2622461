use tracing::{debug, info};

use super::normalize::normalize;
use super::types::ColumnMatches;
use crate::excel::{CellValue, Table};

/// Columns whose values change on at least this share of rows are dropped
pub const DEFAULT_NOISE_THRESHOLD: f64 = 0.5;

static EMPTY: CellValue = CellValue::Empty;

/// Share of the first `min_len` data rows where the two columns disagree.
///
/// Rows are paired by position, which assumes row order is mostly stable
/// between snapshots.
pub fn change_ratio(prev: &Table, curr: &Table, prev_col: usize, curr_col: usize, min_len: usize) -> f64 {
    if min_len == 0 {
        return 0.0;
    }

    let diff_count = (0..min_len)
        .filter(|&row| {
            let p = prev.data_cell(row, prev_col).unwrap_or(&EMPTY);
            let c = curr.data_cell(row, curr_col).unwrap_or(&EMPTY);
            normalize(p) != normalize(c)
        })
        .count();

    diff_count as f64 / min_len as f64
}

/// Drop headers whose values churn too much to identify rows.
///
/// Only the first position of each header on each side is measured; a noisy
/// header is removed with all of its positions.
pub fn filter_noisy_columns(
    prev: &Table,
    curr: &Table,
    mut matches: ColumnMatches,
    threshold: f64,
) -> ColumnMatches {
    let min_len = prev.data_len().min(curr.data_len());
    if min_len == 0 {
        return matches;
    }

    debug!(min_len, columns = matches.len(), "checking for noisy columns");

    matches.retain(|header, column| {
        let (Some(&prev_col), Some(&curr_col)) = (column.prev.first(), column.curr.first()) else {
            return false;
        };

        let ratio = change_ratio(prev, curr, prev_col, curr_col, min_len);
        if ratio >= threshold {
            info!("Ignoring '{}': {:.0}% of rows changed", header, ratio * 100.0);
            false
        } else {
            true
        }
    });

    matches
}
