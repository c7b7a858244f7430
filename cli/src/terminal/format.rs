use colored::*;
use contactbook_common::models::{Contact, ContactField, Group};
use contactbook_core::duplicates::{DuplicatePair, MatchReason};
use contactbook_core::import::ImportSummary;
use contactbook_core::merge::MergeProposal;

use crate::terminal::{colors, print};

pub type Detail = (String, ColoredString);

fn field_color(field: ContactField) -> Color {
    match field {
        ContactField::Email => colors::EMAIL,
        ContactField::Phone => colors::PHONE,
        ContactField::Company | ContactField::JobTitle => colors::COMPANY,
        _ => colors::TEXT_DEFAULT,
    }
}

/// Every non-empty field except the name, which goes in the tree head.
pub fn contact_details(contact: &Contact) -> Vec<Detail> {
    ContactField::ALL
        .into_iter()
        .filter(|f| !matches!(f, ContactField::FirstName | ContactField::LastName))
        .filter_map(|field| {
            let value = field.get(contact)?;
            let value = value.replace('\n', " ⏎ ");
            Some((field.label().to_string(), value.color(field_color(field))))
        })
        .collect()
}

/// Short form used in listings: email, phone and company only.
pub fn contact_summary(contact: &Contact) -> Vec<Detail> {
    [ContactField::Email, ContactField::Phone, ContactField::Company]
        .into_iter()
        .filter_map(|field| {
            let value = field.get(contact)?;
            Some((field.label().to_string(), value.color(field_color(field))))
        })
        .collect()
}

pub fn contact_tree(contact: &Contact, full: bool) {
    let id = contact
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "new".to_string());
    print::tree_head(id, &contact.display_name());
    let details = if full {
        contact_details(contact)
    } else {
        contact_summary(contact)
    };
    print::as_tree_one_level(details);
}

pub fn contact_line(contact: &Contact) -> String {
    let id = contact.id.map(|id| id.to_string()).unwrap_or_default();
    let email = contact.email.as_deref().unwrap_or("");
    format!(
        "{:>6}  {}  {}",
        id.color(colors::ACCENT),
        contact.display_name().color(colors::PRIMARY),
        email.color(colors::EMAIL)
    )
}

pub fn group_line(group: &Group) -> String {
    let count = group
        .contact_count
        .map(|count| format!(" ({count} contacts)"))
        .unwrap_or_default();
    let description = group
        .description
        .as_deref()
        .map(|d| format!(" {}", d.color(colors::SEPARATOR)))
        .unwrap_or_default();
    format!(
        "[{}] {}{}{}",
        group.id.to_string().color(colors::ACCENT),
        group.name.color(colors::GROUP).bold(),
        count,
        description
    )
}

pub fn merge_preview(proposal: &MergeProposal) {
    let conflicts = proposal.conflicts();
    print::tree_head(
        proposal.merged().id.unwrap_or_default(),
        &proposal.merged().display_name(),
    );
    let mut details: Vec<Detail> = contact_details(proposal.merged());
    for field in [ContactField::FirstName, ContactField::LastName] {
        if let Some(value) = field.get(proposal.merged()) {
            details.insert(0, (field.label().to_string(), value.normal()));
        }
    }
    print::as_tree_one_level(details);

    if conflicts.is_empty() {
        return;
    }
    print::print("");
    print::print_status("conflicting values (kept value first):");
    let rows: Vec<Detail> = conflicts
        .iter()
        .map(|conflict| {
            let chosen = conflict.chosen.as_deref().unwrap_or("");
            let dropped = if chosen == conflict.primary {
                &conflict.secondary
            } else {
                &conflict.primary
            };
            let value = format!(
                "{} {} {}",
                chosen.color(colors::NEW_VALUE),
                "|".color(colors::SEPARATOR),
                dropped.color(colors::OLD_VALUE)
            );
            (conflict.field.key().to_string(), value.normal())
        })
        .collect();
    print::as_tree_one_level(rows);
}

pub fn duplicate_line(pair: &DuplicatePair, contacts: &[Contact]) -> String {
    let name = |id: i64| {
        contacts
            .iter()
            .find(|c| c.id == Some(id))
            .map(Contact::display_name)
            .unwrap_or_default()
    };
    let reason = match pair.reason {
        MatchReason::Email => "same email",
        MatchReason::Name => "same name",
    };
    format!(
        "{} {} {} {} {}",
        format!("#{} {}", pair.primary, name(pair.primary)).color(colors::PRIMARY),
        "<>".color(colors::SEPARATOR),
        format!("#{} {}", pair.secondary, name(pair.secondary)).color(colors::PRIMARY),
        "·".color(colors::SEPARATOR),
        reason.color(colors::ACCENT)
    )
}

pub fn import_summary(summary: &ImportSummary) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Imported".into(), summary.imported.to_string().green().bold()),
        ("Failed".into(), failed_count(summary.failed)),
        ("Skipped".into(), summary.skipped.to_string().yellow()),
    ];
    if summary.not_attempted > 0 {
        details.push((
            "Not sent".into(),
            summary.not_attempted.to_string().red(),
        ));
    }
    details
}

fn failed_count(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().red().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_skip_empty_fields_and_names() {
        let contact = Contact {
            id: Some(1),
            first_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            notes: Some("line one\nline two".into()),
            ..Default::default()
        };
        let keys: Vec<String> = contact_details(&contact)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["Email", "Notes"]);
    }

    #[test]
    fn summary_mentions_unsent_records_only_when_present() {
        let summary = ImportSummary {
            imported: 3,
            ..Default::default()
        };
        assert_eq!(import_summary(&summary).len(), 3);

        let aborted = ImportSummary {
            not_attempted: 2,
            aborted: true,
            ..Default::default()
        };
        assert_eq!(import_summary(&aborted).len(), 4);
    }
}
