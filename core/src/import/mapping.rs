//! Column mapping: which file column feeds which contact field.
//!
//! [`ColumnMapping::auto`] resolves every header through the alias table of
//! [`ContactField`]. When one or more headers stay unresolved the caller gets
//! [`MappingOutcome::NeedsReview`] and must let the user assign them before
//! applying the mapping.

use std::fmt;
use std::str::FromStr;

use contactbook_common::models::field::normalize;
use contactbook_common::models::{Contact, ContactField};
use tracing::debug;

use super::{ImportError, ParsedTable};

/// Header spellings that carry a whole name in one column.
pub(crate) const FULL_NAME_ALIASES: &[&str] = &["name", "fullname", "contactname", "displayname", "fn"];
const SKIP_KEYWORDS: &[&str] = &["skip", "ignore", "none", "-"];

/// Destination of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTarget {
    Field(ContactField),
    /// "First Last" in one cell, split on the first whitespace.
    FullName,
    /// Column is read but discarded.
    Skip,
}

impl fmt::Display for ColumnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTarget::Field(field) => write!(f, "{}", field.key()),
            ColumnTarget::FullName => f.write_str("full_name"),
            ColumnTarget::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for ColumnTarget {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        if SKIP_KEYWORDS.contains(&trimmed.as_str()) {
            return Ok(ColumnTarget::Skip);
        }
        normalize_header(s).ok_or_else(|| ImportError::UnknownTarget(s.to_owned()))
    }
}

/// Resolves a header to its target through the alias table. Blank headers and
/// unknown spellings resolve to `None`.
pub fn normalize_header(header: &str) -> Option<ColumnTarget> {
    let normalized = normalize(header);
    if normalized.is_empty() {
        return None;
    }
    if FULL_NAME_ALIASES.contains(&normalized.as_str()) {
        return Some(ColumnTarget::FullName);
    }
    ContactField::ALL
        .into_iter()
        .find(|field| {
            normalize(field.key()) == normalized
                || normalize(field.label()) == normalized
                || field.aliases().contains(&normalized.as_str())
        })
        .map(ColumnTarget::Field)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    headers: Vec<String>,
    targets: Vec<Option<ColumnTarget>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// Every header resolved; rows can be normalized right away.
    Complete(ColumnMapping),
    /// At least one header is unknown. `unmapped` holds the column indexes the
    /// user has to assign (or skip).
    NeedsReview {
        mapping: ColumnMapping,
        unmapped: Vec<usize>,
    },
}

impl MappingOutcome {
    pub fn needs_review(&self) -> bool {
        matches!(self, MappingOutcome::NeedsReview { .. })
    }

    pub fn into_mapping(self) -> ColumnMapping {
        match self {
            MappingOutcome::Complete(mapping) => mapping,
            MappingOutcome::NeedsReview { mapping, .. } => mapping,
        }
    }
}

/// One normalized record ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRow {
    /// 1-based position among the data rows of the file.
    pub record: usize,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedImport {
    pub rows: Vec<PreparedRow>,
    /// Records without a first name, last name or email.
    pub skipped: Vec<usize>,
}

impl ColumnMapping {
    pub fn auto(headers: &[String]) -> MappingOutcome {
        let mapping = Self {
            headers: headers.to_vec(),
            targets: headers.iter().map(|h| normalize_header(h)).collect(),
        };
        let unmapped = mapping.unmapped();
        debug!(columns = headers.len(), unmapped = unmapped.len(), "resolved headers");

        if unmapped.is_empty() {
            MappingOutcome::Complete(mapping)
        } else {
            MappingOutcome::NeedsReview { mapping, unmapped }
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn target(&self, column: usize) -> Option<ColumnTarget> {
        self.targets.get(column).copied().flatten()
    }

    pub fn unmapped(&self) -> Vec<usize> {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.is_none())
            .map(|(column, _)| column)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.targets.iter().all(Option::is_some)
    }

    pub fn assign(&mut self, column: usize, target: ColumnTarget) -> Result<(), ImportError> {
        let slot = self
            .targets
            .get_mut(column)
            .ok_or_else(|| ImportError::UnknownColumn(format!("#{}", column + 1)))?;
        *slot = Some(target);
        Ok(())
    }

    /// Assigns by header text. The exact header wins; otherwise headers are
    /// compared in normalized form.
    pub fn assign_header(&mut self, header: &str, target: ColumnTarget) -> Result<(), ImportError> {
        let wanted = normalize(header);
        let column = self
            .headers
            .iter()
            .position(|h| h == header)
            .or_else(|| self.headers.iter().position(|h| normalize(h) == wanted))
            .ok_or_else(|| ImportError::UnknownColumn(header.to_owned()))?;
        self.assign(column, target)
    }

    /// Every still-unresolved column is marked [`ColumnTarget::Skip`].
    pub fn skip_unmapped(&mut self) {
        for target in self.targets.iter_mut().filter(|t| t.is_none()) {
            *target = Some(ColumnTarget::Skip);
        }
    }

    /// Converts table rows to contacts. Unresolved columns are ignored.
    ///
    /// When several columns feed the same field the first non-empty value wins.
    /// A full-name column only fills first/last names that no dedicated column
    /// provided.
    pub fn apply(&self, table: &ParsedTable) -> PreparedImport {
        let mut prepared = PreparedImport::default();

        for (index, _) in table.rows.iter().enumerate() {
            let record = index + 1;
            if table.is_blank_row(index) {
                continue;
            }
            let contact = self.build_contact(table, index);
            if contact.has_identity() {
                prepared.rows.push(PreparedRow { record, contact });
            } else {
                debug!(record, "skipping record without name or email");
                prepared.skipped.push(record);
            }
        }
        prepared
    }

    fn build_contact(&self, table: &ParsedTable, row: usize) -> Contact {
        let mut contact = Contact::default();
        let mut full_name: Option<&str> = None;

        for (column, target) in self.targets.iter().enumerate() {
            let value = table.cell(row, column).trim();
            if value.is_empty() {
                continue;
            }
            match target {
                Some(ColumnTarget::Field(field)) => {
                    if field.get(&contact).is_none() {
                        field.set(&mut contact, Some(value.to_owned()));
                    }
                }
                Some(ColumnTarget::FullName) if full_name.is_none() => {
                    full_name = Some(value);
                }
                Some(ColumnTarget::FullName) => {}
                Some(ColumnTarget::Skip) | None => {}
            }
        }

        if let Some(name) = full_name {
            let (first, last) = split_full_name(name);
            if contact.first_name.is_none() {
                ContactField::FirstName.set(&mut contact, first);
            }
            if contact.last_name.is_none() {
                ContactField::LastName.set(&mut contact, last);
            }
        }
        contact
    }
}

/// Splits on the first run of whitespace: `"Mary Ann Smith"` → `("Mary", "Ann Smith")`.
pub fn split_full_name(name: &str) -> (Option<String>, Option<String>) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (Some(first.to_owned()), Some(rest.trim().to_owned())),
        None if name.is_empty() => (None, None),
        None => (Some(name.to_owned()), None),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
