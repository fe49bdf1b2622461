use std::collections::HashMap;

use super::normalize::normalize;
use super::types::{ColumnMatch, ColumnMatches};
use crate::excel::Table;

/// Headers that are always present but carry no change signal
pub const DEFAULT_IGNORED_HEADERS: &[&str] = &["LOT #"];

/// Map each normalized header text in row 0 to the positions that carry it,
/// left to right. Blank and ignored headers are skipped.
pub fn build_header_map(table: &Table, ignored: &[String]) -> HashMap<String, Vec<usize>> {
    let mut map: HashMap<String, Vec<usize>> = HashMap::new();

    for (col, value) in table.header().iter().enumerate() {
        let header = normalize(value);
        if header.is_empty() || ignored.iter().any(|i| *i == header) {
            continue;
        }
        map.entry(header).or_default().push(col);
    }

    map
}

/// Match columns of two snapshots by header text.
///
/// Every position of a shared header is kept on both sides; no pairing is
/// assumed between duplicates.
pub fn reconcile_columns(prev: &Table, curr: &Table, ignored: &[String]) -> ColumnMatches {
    let prev_map = build_header_map(prev, ignored);
    let mut curr_map = build_header_map(curr, ignored);

    prev_map
        .into_iter()
        .filter_map(|(header, mut prev_positions)| {
            let mut curr_positions = curr_map.remove(&header)?;
            prev_positions.sort_unstable();
            curr_positions.sort_unstable();
            Some((
                header,
                ColumnMatch {
                    prev: prev_positions,
                    curr: curr_positions,
                },
            ))
        })
        .collect()
}
