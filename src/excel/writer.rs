use std::path::Path;
use tracing::{error, info, warn};
use umya_spreadsheet::{reader, writer, Spreadsheet};

use super::atomic::atomic_write;
use super::reader::compute_checksum;
use super::types::{ExcelError, HighlightOutcome, SkipReason};
use super::Highlighter;

/// Default highlight fill (RGB)
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "FFFF00";

/// Colors whole rows of an xlsx file and saves it atomically.
#[derive(Debug, Clone)]
pub struct XlsxHighlighter {
    argb: String,
}

impl XlsxHighlighter {
    /// `color` is `RRGGBB` or `AARRGGBB` hex.
    pub fn new(color: &str) -> Self {
        XlsxHighlighter { argb: to_argb(color) }
    }
}

impl Default for XlsxHighlighter {
    fn default() -> Self {
        XlsxHighlighter::new(DEFAULT_HIGHLIGHT_COLOR)
    }
}

impl Highlighter for XlsxHighlighter {
    fn highlight(
        &self,
        path: &Path,
        sheet: &str,
        rows: &[u32],
        expected_checksum: Option<&str>,
    ) -> HighlightOutcome {
        match highlight_rows(path, sheet, rows, &self.argb, expected_checksum) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error highlighting rows: {}", e);
                HighlightOutcome::Failed { message: e.to_string() }
            }
        }
    }
}

fn to_argb(color: &str) -> String {
    let hex = color.trim().trim_start_matches('#').to_ascii_uppercase();
    if hex.len() == 6 {
        format!("FF{}", hex)
    } else {
        hex
    }
}

/// Fill every cell of the given one-based physical rows in `sheet`, then save.
///
/// Returns `Skipped` without touching the file when the sheet is gone or the file
/// no longer matches `expected_checksum`.
pub fn highlight_rows(
    path: &Path,
    sheet: &str,
    rows: &[u32],
    argb: &str,
    expected_checksum: Option<&str>,
) -> Result<HighlightOutcome, ExcelError> {
    if !path.exists() {
        return Err(ExcelError::file_not_found(&path.display().to_string()));
    }

    if let Some(expected) = expected_checksum {
        let current = compute_checksum(path)?;
        if current != expected {
            warn!(
                "File '{}' was modified since it was read; not highlighting",
                path.display()
            );
            return Ok(HighlightOutcome::Skipped { reason: SkipReason::FileChanged });
        }
    }

    let mut book = reader::xlsx::read(path)
        .map_err(|e| ExcelError::invalid_format(format!("Failed to open workbook: {}", e)))?;

    if !fill_rows(&mut book, sheet, rows, argb) {
        warn!("Sheet '{}' not found for highlighting", sheet);
        return Ok(HighlightOutcome::Skipped { reason: SkipReason::SheetMissing });
    }

    info!("Highlighting {} rows in '{}'", rows.len(), sheet);

    atomic_write(path, |file| writer::xlsx::write_writer(&book, file))
        .map_err(|e| ExcelError::write_error(format!("Failed to save workbook: {}", e)))?;

    info!("File saved successfully with highlights");

    Ok(HighlightOutcome::Applied {
        rows: rows.len(),
        new_checksum: checksum_after_save(path),
    })
}

/// Checksum of a file that was just written, or `""` when it cannot be read.
/// The highlight is already committed at this point.
fn checksum_after_save(path: &Path) -> String {
    compute_checksum(path).unwrap_or_else(|e| {
        warn!("Highlights saved but checksum unavailable: {}", e);
        String::new()
    })
}

/// Apply a solid fill from column A to the sheet's last used column on each row.
/// Returns false when the sheet does not exist.
fn fill_rows(book: &mut Spreadsheet, sheet: &str, rows: &[u32], argb: &str) -> bool {
    let Some(worksheet) = book.get_sheet_by_name_mut(sheet) else {
        return false;
    };

    let last_col = worksheet.get_highest_column();
    for &row in rows {
        for col in 1..=last_col {
            worksheet
                .get_cell_mut((col, row))
                .get_style_mut()
                .set_background_color(argb);
        }
    }

    true
}
