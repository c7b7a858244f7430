//! # Import Pipeline
//!
//! Turns a contacts file into backend records:
//!
//! 1. [`ImportFormat::from_path`] picks a parser by extension.
//! 2. The parser ([`delimited`], [`spreadsheet`], [`vcard`]) yields a [`ParsedTable`].
//! 3. [`mapping::ColumnMapping::auto`] resolves headers through the alias table and
//!    reports whether the user has to review the mapping.
//! 4. [`mapping::ColumnMapping::apply`] normalizes rows into contacts.
//! 5. [`submit::ImportService`] creates them in fixed-size concurrent batches and
//!    returns an [`submit::ImportSummary`].
//!
//! [`template`] renders the JSON/CSV description of the expected columns.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub mod delimited;
pub mod mapping;
pub mod spreadsheet;
pub mod submit;
pub mod template;
pub mod vcard;

pub use mapping::{ColumnMapping, ColumnTarget, MappingOutcome, PreparedImport, PreparedRow};
pub use submit::{ImportProgress, ImportService, ImportSummary, RowError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type: {0} (expected .csv, .tsv, .xlsx, .xls, .ods or .vcf)")]
    UnsupportedFormat(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("the file has no header row or no records")]
    Empty,
    #[error("malformed delimited file: {0}")]
    Delimited(#[from] csv::Error),
    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("malformed vCard: {0}")]
    VCard(String),
    #[error("unknown mapping target: {0}")]
    UnknownTarget(String),
    #[error("no column named {0:?} in the file")]
    UnknownColumn(String),
    #[error("failed to render template: {0}")]
    Template(String),
}

/// Supported input families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Comma/semicolon/tab separated text. `None` means sniff from the header line.
    Delimited { delimiter: Option<u8> },
    Spreadsheet,
    VCard,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(ImportFormat::Delimited { delimiter: None }),
            "tsv" | "tab" => Ok(ImportFormat::Delimited {
                delimiter: Some(b'\t'),
            }),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(ImportFormat::Spreadsheet),
            "vcf" | "vcard" => Ok(ImportFormat::VCard),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Header row plus data rows, every cell as trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Drops the all-blank rows at the end; spreadsheets and hand-edited CSVs
    /// tend to carry a few. Blank rows in between stay so record numbers keep
    /// pointing at the right data row.
    pub(crate) fn without_trailing_blank_rows(mut self) -> Self {
        while self.rows.last().is_some_and(|row| is_blank(row)) {
            self.rows.pop();
        }
        self
    }

    /// True when every cell of `row` is blank.
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows.get(row).is_none_or(|cells| is_blank(cells))
    }

    /// Value of `column` in `row`, empty when the row is shorter than the header.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Reads and parses `path` with the parser matching its extension.
pub fn read_table(path: &Path) -> Result<ParsedTable, ImportError> {
    let format = ImportFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "parsing import file");

    let table = match format {
        ImportFormat::Delimited { delimiter } => {
            let bytes = read_bytes(path)?;
            delimited::parse(&String::from_utf8_lossy(&bytes), delimiter)?
        }
        ImportFormat::Spreadsheet => spreadsheet::read(path)?,
        ImportFormat::VCard => {
            let bytes = read_bytes(path)?;
            vcard::parse(&String::from_utf8_lossy(&bytes))?
        }
    };

    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed {}",
        path.display()
    );
    Ok(table)
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ImportError> {
    fs::read(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("people.csv", ImportFormat::Delimited { delimiter: None })]
    #[case("people.TSV", ImportFormat::Delimited { delimiter: Some(b'\t') })]
    #[case("people.xlsx", ImportFormat::Spreadsheet)]
    #[case("people.ods", ImportFormat::Spreadsheet)]
    #[case("people.vcf", ImportFormat::VCard)]
    fn dispatches_on_extension(#[case] name: &str, #[case] expected: ImportFormat) {
        assert_eq!(ImportFormat::from_path(&PathBuf::from(name)).unwrap(), expected);
    }

    #[rstest]
    #[case("people.pdf")]
    #[case("people")]
    fn rejects_unknown_extensions(#[case] name: &str) {
        assert!(matches!(
            ImportFormat::from_path(&PathBuf::from(name)),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn read_table_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        assert!(matches!(read_table(&missing), Err(ImportError::Read { .. })));
    }

    #[test]
    fn read_table_parses_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "First Name,Email\nAda,ada@example.com\n,\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["First Name", "Email"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 1), "ada@example.com");
        assert_eq!(table.cell(0, 9), "");
    }
}
