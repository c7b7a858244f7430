//! Downloadable import templates.

use contactbook_common::models::ContactField;
use serde::Serialize;

use super::ImportError;

#[derive(Debug, Serialize)]
struct TemplateField {
    key: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    example: &'static str,
}

#[derive(Debug, Serialize)]
struct Template {
    fields: Vec<TemplateField>,
    full_name_aliases: &'static [&'static str],
    notes: &'static str,
}

fn example(field: ContactField) -> &'static str {
    match field {
        ContactField::FirstName => "Ada",
        ContactField::LastName => "Lovelace",
        ContactField::Email => "ada@example.com",
        ContactField::Phone => "+44 20 7946 0958",
        ContactField::Company => "Analytical Engines Ltd",
        ContactField::JobTitle => "Mathematician",
        ContactField::Address => "12 St James Square",
        ContactField::City => "London",
        ContactField::State => "Greater London",
        ContactField::ZipCode => "SW1Y 4JH",
        ContactField::Country => "United Kingdom",
        ContactField::Website => "https://example.com",
        ContactField::Linkedin => "https://linkedin.com/in/ada",
        ContactField::Twitter => "@ada",
        ContactField::Birthday => "1815-12-10",
        ContactField::Notes => "Met at the Babbage salon",
    }
}

/// Machine-readable description of the accepted columns.
pub fn json() -> Result<String, ImportError> {
    let template = Template {
        fields: ContactField::ALL
            .into_iter()
            .map(|field| TemplateField {
                key: field.key(),
                label: field.label(),
                aliases: field.aliases(),
                example: example(field),
            })
            .collect(),
        full_name_aliases: super::mapping::FULL_NAME_ALIASES,
        notes: "Each record needs a first name, last name or email. Header matching ignores case, spaces and punctuation.",
    };
    serde_json::to_string_pretty(&template).map_err(|e| ImportError::Template(e.to_string()))
}

/// Header row of field labels followed by one example record.
pub fn csv() -> Result<String, ImportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ContactField::ALL.iter().map(|f| f.label()))?;
    writer.write_record(ContactField::ALL.iter().map(|f| example(*f)))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Template(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Template(e.to_string()))
}
