use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::types::*;
use super::WorkbookSource;

/// Reads snapshot sheets from xlsx/xls/ods files with calamine.
///
/// `skip_rows` leading physical rows are dropped before the header row, so a
/// sheet with a title line above its header uses `skip_rows = 1`.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    skip_rows: usize,
}

impl XlsxWorkbook {
    pub fn new(skip_rows: usize) -> Self {
        XlsxWorkbook { skip_rows }
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>, ExcelError> {
        get_sheet_names(path)
    }

    fn read_table(&self, path: &Path, sheet: &str) -> Result<Table, ExcelError> {
        read_table(path, sheet, self.skip_rows)
    }

    fn checksum(&self, path: &Path) -> Result<String, ExcelError> {
        compute_checksum(path)
    }
}

/// Get the ordered list of sheet names in a workbook
pub fn get_sheet_names(path: &Path) -> Result<Vec<String>, ExcelError> {
    let workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExcelError::invalid_format(format!("Failed to open workbook: {}", e)))?;

    Ok(workbook.sheet_names().to_vec())
}

/// Read one sheet into a [`Table`], skipping `skip_rows` leading physical rows.
pub fn read_table(path: &Path, sheet: &str, skip_rows: usize) -> Result<Table, ExcelError> {
    if !path.exists() {
        return Err(ExcelError::file_not_found(&path.display().to_string()));
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExcelError::invalid_format(format!("Failed to open workbook: {}", e)))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ExcelError::sheet_not_found(sheet));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ExcelError::read_error(format!("Failed to read sheet '{}': {}", sheet, e)))?;

    let rows = range_to_rows(&range, skip_rows);
    debug!(sheet, rows = rows.len(), "read sheet");

    Ok(Table::new(rows))
}

/// Convert a calamine range into rows addressed from cell A1.
///
/// calamine ranges start at the first used cell; leading empty rows and columns
/// are materialized so positions match the sheet's own row/column numbering.
fn range_to_rows(range: &Range<Data>, skip_rows: usize) -> Vec<Vec<CellValue>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    let first_row = skip_rows as u32;
    if first_row > end_row {
        return Vec::new();
    }

    (first_row..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| convert_cell_value(range.get_value((row, col))))
                .collect()
        })
        .collect()
}

/// Convert calamine Data to our CellValue
fn convert_cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(data) => match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
                Some(datetime) => CellValue::DateTime(datetime),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(CellValue::DateTime)
                .unwrap_or_else(|_| CellValue::String(s.clone())),
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        },
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to a date-time
fn excel_serial_to_datetime(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }

    let days = value.floor() as i64;
    let total_seconds = (value.fract() * 86400.0).round() as i64;

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(total_seconds)?)
}

/// Compute SHA-256 checksum of a file
pub fn compute_checksum(path: &Path) -> Result<String, ExcelError> {
    let mut file = File::open(path)
        .map_err(|e| ExcelError::read_error(format!("Failed to open file for checksum: {}", e)))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ExcelError::read_error(format!("Failed to read file for checksum: {}", e)))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
