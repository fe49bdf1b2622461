use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use super::noise::{filter_noisy_columns, DEFAULT_NOISE_THRESHOLD};
use super::reconcile::{reconcile_columns, DEFAULT_IGNORED_HEADERS};
use super::signature::generate_signatures;
use super::types::Side;
use crate::excel::Table;

/// Tunables for one detection run
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// Header texts never used for comparison
    pub ignored_headers: Vec<String>,
    /// Change ratio at or above which a column is treated as noise
    pub noise_threshold: f64,
}

impl Default for DetectOptions {
    fn default() -> Self {
        DetectOptions {
            ignored_headers: DEFAULT_IGNORED_HEADERS.iter().map(|h| h.to_string()).collect(),
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
        }
    }
}

/// Reasons no comparison could be made between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("no common columns found between sheets")]
    NoCommonColumns,
    #[error("all common columns were filtered out as noise")]
    AllColumnsNoisy,
}

/// Table rows (data index + 1) of `curr` whose signature does not occur in `prev`.
///
/// The result is ascending and may be empty.
pub fn detect_changes(
    prev: &Table,
    curr: &Table,
    options: &DetectOptions,
) -> Result<Vec<usize>, DetectError> {
    let matches = reconcile_columns(prev, curr, &options.ignored_headers);
    if matches.is_empty() {
        return Err(DetectError::NoCommonColumns);
    }
    debug!(columns = ?matches.sorted_headers(), "matched columns");

    let matches = filter_noisy_columns(prev, curr, matches, options.noise_threshold);
    if matches.is_empty() {
        return Err(DetectError::AllColumnsNoisy);
    }

    info!("Generating signatures from {} columns", matches.len());
    let prev_signatures: HashSet<String> = generate_signatures(prev, &matches, Side::Previous)
        .into_iter()
        .collect();
    let curr_signatures = generate_signatures(curr, &matches, Side::Current);

    let changed: Vec<usize> = curr_signatures
        .iter()
        .enumerate()
        .filter(|(_, signature)| !prev_signatures.contains(*signature))
        .map(|(index, _)| index + 1)
        .collect();

    info!("Found {} changed rows", changed.len());
    Ok(changed)
}

/// One-based spreadsheet row of a table row, given how many physical rows were
/// skipped above the header.
pub fn physical_row(table_row: usize, skip_rows: usize) -> u32 {
    (table_row + skip_rows + 1) as u32
}
