//! vCard (`.vcf`) reader.
//!
//! Handles versions 2.1 to 4.0 as far as the address book needs: folded lines
//! are joined, property groups (`item1.EMAIL`) and parameters (`TYPE=work`) are
//! ignored, and text escapes are decoded. Each card becomes one table row whose
//! headers are canonical field keys, so vCard input never needs a manual mapping.

use contactbook_common::models::{Contact, ContactField};
use tracing::{debug, warn};

use super::mapping::split_full_name;
use super::{ImportError, ParsedTable};

/// Columns produced for every card.
const COLUMNS: [ContactField; 14] = [
    ContactField::FirstName,
    ContactField::LastName,
    ContactField::Email,
    ContactField::Phone,
    ContactField::Company,
    ContactField::JobTitle,
    ContactField::Address,
    ContactField::City,
    ContactField::State,
    ContactField::ZipCode,
    ContactField::Country,
    ContactField::Website,
    ContactField::Birthday,
    ContactField::Notes,
];

pub fn parse(text: &str) -> Result<ParsedTable, ImportError> {
    let mut cards: Vec<Contact> = Vec::new();
    let mut current: Option<Card> = None;
    let mut saw_begin = false;

    for line in unfold(text.trim_start_matches('\u{feff}')) {
        let Some(property) = Property::parse(&line) else {
            debug!(line = %line, "ignoring malformed vCard line");
            continue;
        };

        match property.name.as_str() {
            "BEGIN" if property.value.eq_ignore_ascii_case("VCARD") => {
                saw_begin = true;
                if let Some(open) = current.replace(Card::default()) {
                    warn!("vCard started before the previous one ended");
                    cards.push(open.finish());
                }
            }
            "END" if property.value.eq_ignore_ascii_case("VCARD") => {
                if let Some(card) = current.take() {
                    cards.push(card.finish());
                }
            }
            _ => {
                if let Some(card) = current.as_mut() {
                    card.apply(&property);
                }
            }
        }
    }

    if let Some(card) = current {
        warn!("last vCard has no END:VCARD, keeping it");
        cards.push(card.finish());
    }

    if !saw_begin {
        return Err(ImportError::VCard("no BEGIN:VCARD block found".into()));
    }

    let headers = COLUMNS.iter().map(|f| f.key().to_owned()).collect();
    let rows = cards
        .iter()
        .map(|contact| {
            COLUMNS
                .iter()
                .map(|field| field.get(contact).unwrap_or_default().to_owned())
                .collect()
        })
        .collect();

    Ok(ParsedTable { headers, rows }.without_trailing_blank_rows())
}

/// Joins continuation lines (those starting with a space or tab) onto the
/// previous line and drops blank lines.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        let continuation = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t'));
        if let (Some(continuation), Some(previous)) = (continuation, lines.last_mut()) {
            previous.push_str(continuation);
            continue;
        }
        if !raw.trim().is_empty() {
            lines.push(raw.to_owned());
        }
    }
    lines
}

#[derive(Debug)]
struct Property {
    name: String,
    value: String,
}

impl Property {
    fn parse(line: &str) -> Option<Self> {
        let colon = find_value_separator(line)?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);
        let name = head.split(';').next()?;
        let name = name.rsplit('.').next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            value: value.to_owned(),
        })
    }

    /// Unescaped single value.
    fn text(&self) -> Option<String> {
        let text = unescape(&self.value);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    /// Unescaped components of a structured value (`N`, `ADR`, `ORG`).
    fn components(&self) -> Vec<String> {
        split_unescaped(&self.value, ';')
            .iter()
            .map(|part| unescape(part).trim().to_owned())
            .collect()
    }
}

/// Position of the `:` separating parameters from the value. Colons inside
/// quoted parameter values do not count.
fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (index, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

fn split_unescaped(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in value.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&value[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, Default)]
struct Card {
    contact: Contact,
    formatted_name: Option<String>,
}

impl Card {
    fn apply(&mut self, property: &Property) {
        let contact = &mut self.contact;
        match property.name.as_str() {
            "N" => {
                let parts = property.components();
                set_once(contact, ContactField::LastName, parts.first().cloned());
                set_once(contact, ContactField::FirstName, parts.get(1).cloned());
            }
            "FN" => {
                if self.formatted_name.is_none() {
                    self.formatted_name = property.text();
                }
            }
            "EMAIL" => set_once(contact, ContactField::Email, property.text()),
            "TEL" => set_once(contact, ContactField::Phone, property.text()),
            "ORG" => {
                set_once(contact, ContactField::Company, property.components().first().cloned())
            }
            "TITLE" => set_once(contact, ContactField::JobTitle, property.text()),
            "URL" => set_once(contact, ContactField::Website, property.text()),
            "BDAY" => set_once(contact, ContactField::Birthday, property.text()),
            "NOTE" => set_once(contact, ContactField::Notes, property.text()),
            "ADR" => {
                // PO box; extended; street; locality; region; postal code; country
                let parts = property.components();
                let part = |index: usize| parts.get(index).cloned();
                set_once(contact, ContactField::Address, part(2));
                set_once(contact, ContactField::City, part(3));
                set_once(contact, ContactField::State, part(4));
                set_once(contact, ContactField::ZipCode, part(5));
                set_once(contact, ContactField::Country, part(6));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Contact {
        let missing_name = self.contact.first_name.is_none() && self.contact.last_name.is_none();
        if let (true, Some(formatted)) = (missing_name, self.formatted_name.as_deref()) {
            let (first, last) = split_full_name(formatted);
            ContactField::FirstName.set(&mut self.contact, first);
            ContactField::LastName.set(&mut self.contact, last);
        }
        self.contact
    }
}

/// Keeps the first occurrence of repeated properties (a card may list several
/// emails or phone numbers; the first is the preferred one in practice).
fn set_once(contact: &mut Contact, field: ContactField, value: Option<String>) {
    if field.get(contact).is_none() {
        field.set(contact, value);
    }
}
