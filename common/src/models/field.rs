//! # Contact Fields
//!
//! Enumerates the editable text fields of a [`Contact`] so that import, merge and
//! the CLI can address them by name instead of by struct member.

use std::fmt;
use std::str::FromStr;

use crate::models::Contact;

/// One editable text field of a [`Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    JobTitle,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Website,
    Linkedin,
    Twitter,
    Birthday,
    Notes,
}

impl ContactField {
    /// Every field, in the order used for templates and listings.
    pub const ALL: [ContactField; 16] = [
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
        ContactField::Linkedin,
        ContactField::Twitter,
        ContactField::Birthday,
        ContactField::Notes,
    ];

    /// Stable machine name, identical to the JSON key.
    pub fn key(self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Company => "company",
            ContactField::JobTitle => "job_title",
            ContactField::Address => "address",
            ContactField::City => "city",
            ContactField::State => "state",
            ContactField::ZipCode => "zip_code",
            ContactField::Country => "country",
            ContactField::Website => "website",
            ContactField::Linkedin => "linkedin",
            ContactField::Twitter => "twitter",
            ContactField::Birthday => "birthday",
            ContactField::Notes => "notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactField::FirstName => "First Name",
            ContactField::LastName => "Last Name",
            ContactField::Email => "Email",
            ContactField::Phone => "Phone",
            ContactField::Company => "Company",
            ContactField::JobTitle => "Job Title",
            ContactField::Address => "Address",
            ContactField::City => "City",
            ContactField::State => "State",
            ContactField::ZipCode => "Zip Code",
            ContactField::Country => "Country",
            ContactField::Website => "Website",
            ContactField::Linkedin => "LinkedIn",
            ContactField::Twitter => "Twitter",
            ContactField::Birthday => "Birthday",
            ContactField::Notes => "Notes",
        }
    }

    /// Header spellings recognised by the importer, already in normalized form
    /// (lowercase ASCII alphanumerics only). The key and label are implied.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ContactField::FirstName => &["first", "fname", "givenname", "forename", "given"],
            ContactField::LastName => &["last", "lname", "surname", "familyname", "family"],
            ContactField::Email => &["mail", "emailaddress", "email1", "primaryemail"],
            ContactField::Phone => &[
                "tel",
                "telephone",
                "phonenumber",
                "mobile",
                "mobilephone",
                "cell",
                "cellphone",
                "phone1",
            ],
            ContactField::Company => &["organization", "organisation", "org", "employer", "business"],
            ContactField::JobTitle => &["title", "position", "role", "jobrole", "designation"],
            ContactField::Address => &["street", "streetaddress", "address1", "addressline1"],
            ContactField::City => &["town", "locality"],
            ContactField::State => &["province", "region", "county"],
            ContactField::ZipCode => &["zip", "postalcode", "postcode", "postal"],
            ContactField::Country => &["nation", "countryregion"],
            ContactField::Website => &["url", "web", "homepage", "site", "webpage"],
            ContactField::Linkedin => &["linkedinurl", "linkedinprofile"],
            ContactField::Twitter => &["twitterhandle", "x", "xhandle"],
            ContactField::Birthday => &["dob", "dateofbirth", "bday", "birthdate"],
            ContactField::Notes => &["note", "comments", "comment", "description", "remarks"],
        }
    }

    pub fn get(self, contact: &Contact) -> Option<&str> {
        self.slot(contact).as_deref()
    }

    /// Stores `value`, treating blank input as clearing the field.
    pub fn set(self, contact: &mut Contact, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        *self.slot_mut(contact) = value;
    }

    fn slot(self, contact: &Contact) -> &Option<String> {
        match self {
            ContactField::FirstName => &contact.first_name,
            ContactField::LastName => &contact.last_name,
            ContactField::Email => &contact.email,
            ContactField::Phone => &contact.phone,
            ContactField::Company => &contact.company,
            ContactField::JobTitle => &contact.job_title,
            ContactField::Address => &contact.address,
            ContactField::City => &contact.city,
            ContactField::State => &contact.state,
            ContactField::ZipCode => &contact.zip_code,
            ContactField::Country => &contact.country,
            ContactField::Website => &contact.website,
            ContactField::Linkedin => &contact.linkedin,
            ContactField::Twitter => &contact.twitter,
            ContactField::Birthday => &contact.birthday,
            ContactField::Notes => &contact.notes,
        }
    }

    fn slot_mut(self, contact: &mut Contact) -> &mut Option<String> {
        match self {
            ContactField::FirstName => &mut contact.first_name,
            ContactField::LastName => &mut contact.last_name,
            ContactField::Email => &mut contact.email,
            ContactField::Phone => &mut contact.phone,
            ContactField::Company => &mut contact.company,
            ContactField::JobTitle => &mut contact.job_title,
            ContactField::Address => &mut contact.address,
            ContactField::City => &mut contact.city,
            ContactField::State => &mut contact.state,
            ContactField::ZipCode => &mut contact.zip_code,
            ContactField::Country => &mut contact.country,
            ContactField::Website => &mut contact.website,
            ContactField::Linkedin => &mut contact.linkedin,
            ContactField::Twitter => &mut contact.twitter,
            ContactField::Birthday => &mut contact.birthday,
            ContactField::Notes => &mut contact.notes,
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContactField {
    type Err = String;

    /// Accepts the key (`job_title`), the label (`Job Title`) or a known alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ContactField::ALL
            .into_iter()
            .find(|field| {
                normalize(field.key()) == wanted
                    || normalize(field.label()) == wanted
                    || field.aliases().contains(&wanted.as_str())
            })
            .ok_or_else(|| format!("unknown contact field: {s}"))
    }
}

/// Lowercases and strips everything but ASCII letters and digits, so
/// `"E-mail Address"` and `"email_address"` compare equal.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
