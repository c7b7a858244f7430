//! Comma, semicolon and tab separated text.

use csv::ReaderBuilder;

use super::{ImportError, ParsedTable};

const BOM: char = '\u{feff}';

/// Parses delimited text. Without an explicit `delimiter` the header line decides:
/// semicolons win when they outnumber commas (spreadsheet exports in locales
/// with a decimal comma), otherwise commas.
pub fn parse(text: &str, delimiter: Option<u8>) -> Result<ParsedTable, ImportError> {
    let text = text.trim_start_matches(BOM);
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(text));
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(ParsedTable { headers, rows }.without_trailing_blank_rows())
}

/// Counts candidate delimiters in the header record, ignoring quoted text.
fn sniff_delimiter(text: &str) -> u8 {
    let (mut commas, mut semicolons, mut tabs) = (0usize, 0usize, 0usize);
    let mut quoted = false;

    for c in text.chars() {
        match c {
            '"' => quoted = !quoted,
            '\n' if !quoted => break,
            _ if quoted => {}
            ',' => commas += 1,
            ';' => semicolons += 1,
            '\t' => tabs += 1,
            _ => {}
        }
    }

    if tabs > commas && tabs > semicolons {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}
