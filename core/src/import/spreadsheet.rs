//! Spreadsheet workbooks (xlsx, xls, ods). Only the first sheet is read; its first
//! row is the header.

use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};

use super::{ImportError, ParsedTable};

pub fn read(path: &Path) -> Result<ParsedTable, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|error| ImportError::Spreadsheet(error.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::Empty)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|error| ImportError::Spreadsheet(format!("sheet {sheet_name:?}: {error}")))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let headers = rows.next().ok_or(ImportError::Empty)?;
    if headers.iter().all(String::is_empty) {
        return Err(ImportError::Empty);
    }

    Ok(ParsedTable {
        headers,
        rows: rows.collect(),
    }
    .without_trailing_blank_rows())
}

/// Renders a cell the way a user would read it. Whole numbers lose their `.0`
/// so phone numbers and zip codes stored as numbers survive intact, and
/// date-formatted cells come out as ISO dates rather than serial numbers.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_owned(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => date_text(value),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.trim().to_owned(),
        other => other.to_string().trim().to_owned(),
    }
}

fn date_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return value.as_f64().to_string();
    }
    match value.as_datetime() {
        Some(datetime) if value.as_f64().fract() == 0.0 => datetime.format("%Y-%m-%d").to_string(),
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => value.as_f64().to_string(),
    }
}
