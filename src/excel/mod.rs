//! Excel module for reading snapshot sheets and highlighting changed rows.
//!
//! This module provides:
//! - Reading sheets into position-addressed tables (calamine)
//! - Highlighting whole rows and saving in place (umya-spreadsheet)
//! - Atomic file replacement and cleanup of orphaned temp files

use std::path::Path;

pub mod types;
pub mod reader;
pub mod writer;
pub mod atomic;

// Re-export commonly used types and functions
pub use types::*;
pub use reader::{compute_checksum, get_sheet_names, read_table, XlsxWorkbook};
pub use writer::{highlight_rows, XlsxHighlighter, DEFAULT_HIGHLIGHT_COLOR};
pub use atomic::{atomic_write, cleanup_orphaned_temp_files, TEMP_FILE_PREFIX};

/// Where snapshot tables come from.
pub trait WorkbookSource {
    /// Ordered sheet names of the workbook at `path`.
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>, ExcelError>;

    /// One sheet as a table whose row 0 is the header row.
    fn read_table(&self, path: &Path, sheet: &str) -> Result<Table, ExcelError>;

    /// Content checksum used to detect writes between the read and highlight passes.
    fn checksum(&self, path: &Path) -> Result<String, ExcelError>;
}

/// Marks rows of a sheet in place.
///
/// Implementations never fail the caller: problems are logged and reported in
/// the returned [`HighlightOutcome`].
pub trait Highlighter {
    /// `rows` are one-based physical spreadsheet rows.
    fn highlight(
        &self,
        path: &Path,
        sheet: &str,
        rows: &[u32],
        expected_checksum: Option<&str>,
    ) -> HighlightOutcome;
}
