#![allow(dead_code)]

use std::path::{Path, PathBuf};
use umya_spreadsheet::{new_file, writer, Spreadsheet};

pub const TITLE_ROW: u32 = 1;
pub const HEADER_ROW: u32 = 2;

/// Snapshot sheet laid out like the tracked workbooks: a title line, then the
/// header row, then data.
pub struct SnapshotSheet<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub rows: &'a [&'a [&'a str]],
}

/// Write a workbook holding the default "Sheet1" followed by `sheets`.
/// Cells that parse as numbers are stored as numbers.
pub fn write_workbook(dir: &Path, file_name: &str, sheets: &[SnapshotSheet]) -> PathBuf {
    let mut book = new_file();

    for snapshot in sheets {
        let _ = book.new_sheet(snapshot.name);
        let sheet = book
            .get_sheet_by_name_mut(snapshot.name)
            .expect("sheet was just created");

        sheet
            .get_cell_mut((1, TITLE_ROW))
            .set_value_string(format!("Snapshot {}", snapshot.name));

        for (col, header) in snapshot.headers.iter().enumerate() {
            sheet.get_cell_mut((col as u32 + 1, HEADER_ROW)).set_value_string(*header);
        }

        for (offset, row) in snapshot.rows.iter().enumerate() {
            let row_num = HEADER_ROW + 1 + offset as u32;
            for (col, value) in row.iter().enumerate() {
                let cell = sheet.get_cell_mut((col as u32 + 1, row_num));
                match value.parse::<f64>() {
                    Ok(number) => {
                        cell.set_value_number(number);
                    }
                    Err(_) => {
                        cell.set_value_string(*value);
                    }
                }
            }
        }
    }

    let path = dir.join(file_name);
    writer::xlsx::write(&book, &path).expect("fixture workbook written");
    path
}

pub fn open(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).expect("workbook readable")
}

/// ARGB fill of a cell, if any.
pub fn fill_of(book: &Spreadsheet, sheet: &str, col: u32, row: u32) -> Option<String> {
    book.get_sheet_by_name(sheet)?
        .get_cell((col, row))?
        .get_style()
        .get_background_color()
        .map(|color| color.get_argb().to_string())
}

pub fn value_of(book: &Spreadsheet, sheet: &str, col: u32, row: u32) -> String {
    book.get_sheet_by_name(sheet)
        .map(|s| s.get_value((col, row)))
        .unwrap_or_default()
}

pub const PREVIOUS_HEADERS: &[&str] = &["ORDER", "QTY", "LOT #"];
pub const PREVIOUS_ROWS: &[&[&str]] = &[&["A1", "10", "L1"], &["A2", "20", "L2"], &["A3", "30", "L3"]];

/// Columns reordered, one quantity edited, one row added, every lot number changed.
pub const CURRENT_HEADERS: &[&str] = &["QTY", "ORDER", "LOT #"];
pub const CURRENT_ROWS: &[&[&str]] = &[
    &["10", "A1", "X1"],
    &["25", "A2", "X2"],
    &["30", "A3", "X3"],
    &["40", "A4", "X4"],
];
