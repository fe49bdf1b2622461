use crate::changes::{detect_changes, physical_row, select_sheets, DetectError, SheetSelection};
use crate::config::Config;
use crate::excel::{
    CellValue, ExcelError, ExcelErrorType, HighlightOutcome, Highlighter, WorkbookSource,
    XlsxHighlighter, XlsxWorkbook,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandErrorKind {
    NotFound,
    Internal,
}

#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn file_not_found() -> Self {
        CommandError {
            kind: CommandErrorKind::NotFound,
            message: "File not found".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError {
            kind: CommandErrorKind::Internal,
            message: message.into(),
        }
    }
}

impl From<ExcelError> for CommandError {
    fn from(e: ExcelError) -> Self {
        match e.error_type {
            ExcelErrorType::FileNotFound => CommandError::file_not_found(),
            _ => CommandError::internal(e.to_string()),
        }
    }
}

// ==================== Change Detection ====================

/// One row of the current snapshot that has no counterpart in the previous one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedRow {
    /// Position in the current table (header = 0)
    pub table_row: usize,
    /// One-based spreadsheet row that was highlighted
    pub physical_row: u32,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedRows {
    pub previous_sheet: String,
    pub current_sheet: String,
    pub rows: Vec<ChangedRow>,
    pub highlight: HighlightOutcome,
}

/// Why two snapshot sheets could not be picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionFailure {
    TooFew { found: usize },
    Unreadable { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChangeOutcome {
    FileNotFound,
    NoComparableSheets { reason: SelectionFailure },
    NoCommonColumns,
    AllColumnsNoisy,
    NoChanges { previous_sheet: String, current_sheet: String },
    Changed(ChangedRows),
}

impl ChangeOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOutcome::FileNotFound => "file_not_found",
            ChangeOutcome::NoComparableSheets { .. } => "no_comparable_sheets",
            ChangeOutcome::NoCommonColumns => "no_common_columns",
            ChangeOutcome::AllColumnsNoisy => "all_columns_noisy",
            ChangeOutcome::NoChanges { .. } => "no_changes",
            ChangeOutcome::Changed(_) => "changed",
        }
    }

    pub fn changes_found(&self) -> bool {
        matches!(self, ChangeOutcome::Changed(_))
    }

    pub fn changed_count(&self) -> usize {
        match self {
            ChangeOutcome::Changed(changed) => changed.rows.len(),
            _ => 0,
        }
    }
}

/// Compare the last two snapshot sheets of the workbook at `path` and highlight
/// the rows of the newer one that are new or altered.
///
/// Missing inputs are reported as outcomes; only read failures past sheet
/// selection are errors. Highlighting problems never fail the call.
pub fn get_changed_rows(
    path: &Path,
    config: &Config,
    source: &dyn WorkbookSource,
    highlighter: &dyn Highlighter,
) -> Result<ChangeOutcome, ExcelError> {
    if !path.exists() {
        warn!("File not found: {}", path.display());
        return Ok(ChangeOutcome::FileNotFound);
    }

    let names = match source.sheet_names(path) {
        Ok(names) => names,
        Err(e) => {
            warn!("Could not list sheets of {}: {}", path.display(), e);
            return Ok(unreadable(e));
        }
    };

    // Taken before the tables are read so the highlighter can detect writes in between.
    let checksum = if config.verify_checksum {
        match source.checksum(path) {
            Ok(checksum) => Some(checksum),
            Err(e) => {
                warn!("Could not checksum {}: {}", path.display(), e);
                return Ok(unreadable(e));
            }
        }
    } else {
        None
    };

    let (previous_sheet, current_sheet) = match select_sheets(&names) {
        SheetSelection::Selected { previous, current } => (previous, current),
        SheetSelection::TooFew { found } => {
            warn!("Not enough snapshot sheets to compare (found {})", found);
            return Ok(ChangeOutcome::NoComparableSheets {
                reason: SelectionFailure::TooFew { found },
            });
        }
    };

    info!("Comparing '{}' (previous) vs '{}' (current)", previous_sheet, current_sheet);

    let prev = source.read_table(path, &previous_sheet)?;
    let curr = source.read_table(path, &current_sheet)?;

    let changed = match detect_changes(&prev, &curr, &config.detect_options()) {
        Ok(changed) => changed,
        Err(DetectError::NoCommonColumns) => {
            warn!("No common columns found between sheets");
            return Ok(ChangeOutcome::NoCommonColumns);
        }
        Err(DetectError::AllColumnsNoisy) => {
            warn!("All common columns were filtered out as noise");
            return Ok(ChangeOutcome::AllColumnsNoisy);
        }
    };

    if changed.is_empty() {
        info!("No changes found");
        return Ok(ChangeOutcome::NoChanges {
            previous_sheet,
            current_sheet,
        });
    }

    let physical: Vec<u32> = changed
        .iter()
        .map(|&row| physical_row(row, config.skip_rows))
        .collect();

    let highlight = highlighter.highlight(path, &current_sheet, &physical, checksum.as_deref());
    if !highlight.is_applied() {
        warn!("Rows were detected but not highlighted: {:?}", highlight);
    }

    let rows = changed
        .iter()
        .zip(&physical)
        .map(|(&table_row, &physical_row)| ChangedRow {
            table_row,
            physical_row,
            cells: curr.row(table_row).map(<[CellValue]>::to_vec).unwrap_or_default(),
        })
        .collect();

    Ok(ChangeOutcome::Changed(ChangedRows {
        previous_sheet,
        current_sheet,
        rows,
        highlight,
    }))
}

fn unreadable(e: ExcelError) -> ChangeOutcome {
    ChangeOutcome::NoComparableSheets {
        reason: SelectionFailure::Unreadable { message: e.to_string() },
    }
}

/// Run detection against a file on disk with the xlsx reader and highlighter.
pub fn run_detection(path: &Path, config: &Config) -> Result<ChangeOutcome, ExcelError> {
    let source = XlsxWorkbook::new(config.skip_rows);
    let highlighter = XlsxHighlighter::new(&config.highlight_color);
    get_changed_rows(path, config, &source, &highlighter)
}

// ==================== Process File ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: String,
    pub message: String,
    pub changes_found: bool,
    pub processed_file: String,
    pub outcome: String,
    pub changed_rows: usize,
}

impl ProcessResponse {
    fn from_outcome(file_path: &str, outcome: &ChangeOutcome) -> Self {
        ProcessResponse {
            status: "success".to_string(),
            message: "Processing complete".to_string(),
            changes_found: outcome.changes_found(),
            processed_file: file_path.to_string(),
            outcome: outcome.kind().to_string(),
            changed_rows: outcome.changed_count(),
        }
    }
}

/// Handle one processing request on the blocking pool.
pub async fn process_file(
    request: ProcessRequest,
    config: Config,
) -> Result<ProcessResponse, CommandError> {
    let path = PathBuf::from(&request.file_path);
    if !path.exists() {
        return Err(CommandError::file_not_found());
    }

    info!("Received request to process: {}", request.file_path);

    let outcome = tokio::task::spawn_blocking(move || run_detection(&path, &config))
        .await
        .map_err(|e| CommandError::internal(format!("Task join error: {}", e)))??;

    if outcome == ChangeOutcome::FileNotFound {
        return Err(CommandError::file_not_found());
    }

    Ok(ProcessResponse::from_outcome(&request.file_path, &outcome))
}
