//! Duplicate candidates: contacts that likely describe the same person.

use std::collections::HashMap;

use contactbook_common::models::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    Email,
    Name,
}

/// Two saved contacts that look alike. `primary` is the older record (lower id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub primary: i64,
    pub secondary: i64,
    pub reason: MatchReason,
}

/// Pairs contacts sharing an email (case-insensitive) or, failing that, the
/// same full name ignoring case and spacing. Unsaved contacts are ignored.
pub fn find_duplicates(contacts: &[Contact]) -> Vec<DuplicatePair> {
    let mut by_email: HashMap<String, Vec<i64>> = HashMap::new();
    let mut by_name: HashMap<String, Vec<i64>> = HashMap::new();

    for contact in contacts {
        let Some(id) = contact.id else { continue };
        if let Some(email) = email_key(contact) {
            by_email.entry(email).or_default().push(id);
        }
        if let Some(name) = name_key(contact) {
            by_name.entry(name).or_default().push(id);
        }
    }

    let mut pairs = Vec::new();
    collect_pairs(by_email, MatchReason::Email, &mut pairs);
    collect_pairs(by_name, MatchReason::Name, &mut pairs);
    pairs.sort_by_key(|pair| (pair.primary, pair.secondary));
    pairs
}

fn collect_pairs(groups: HashMap<String, Vec<i64>>, reason: MatchReason, pairs: &mut Vec<DuplicatePair>) {
    for mut ids in groups.into_values() {
        ids.sort_unstable();
        ids.dedup();
        let Some((&primary, rest)) = ids.split_first() else { continue };
        for &secondary in rest {
            let known = pairs
                .iter()
                .any(|p| p.primary == primary && p.secondary == secondary);
            if !known {
                pairs.push(DuplicatePair {
                    primary,
                    secondary,
                    reason,
                });
            }
        }
    }
}

fn email_key(contact: &Contact) -> Option<String> {
    let email = contact.email.as_deref()?.trim();
    (!email.is_empty()).then(|| email.to_lowercase())
}

fn name_key(contact: &Contact) -> Option<String> {
    let name = contact.full_name()?;
    let key = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i64, first: &str, last: &str, email: &str) -> Contact {
        let text = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        Contact {
            id: Some(id),
            first_name: text(first),
            last_name: text(last),
            email: text(email),
            ..Default::default()
        }
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let contacts = vec![
            person(3, "Ada", "Lovelace", "ADA@example.com"),
            person(1, "Augusta", "King", "ada@example.com "),
            person(2, "Grace", "Hopper", "grace@example.com"),
        ];
        assert_eq!(
            find_duplicates(&contacts),
            vec![DuplicatePair {
                primary: 1,
                secondary: 3,
                reason: MatchReason::Email
            }]
        );
    }

    #[test]
    fn name_match_ignores_case_and_spacing() {
        let contacts = vec![
            person(1, "Grace", "Hopper", ""),
            person(2, "grace", " hopper", "g@navy.mil"),
        ];
        let pairs = find_duplicates(&contacts);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].reason, MatchReason::Name);
    }

    #[test]
    fn pair_matching_on_both_keys_is_reported_once() {
        let contacts = vec![
            person(1, "Ada", "Lovelace", "ada@example.com"),
            person(2, "Ada", "Lovelace", "ada@example.com"),
        ];
        let pairs = find_duplicates(&contacts);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].reason, MatchReason::Email);
    }

    #[test]
    fn distinct_contacts_have_no_pairs() {
        let contacts = vec![
            person(1, "Ada", "Lovelace", "ada@example.com"),
            person(2, "Grace", "Hopper", "grace@example.com"),
        ];
        assert!(find_duplicates(&contacts).is_empty());
    }
}
