use serde::{Deserialize, Serialize};

/// A person record as stored by the backend.
///
/// Every text field is optional. The backend speaks snake_case JSON; camelCase
/// spellings are accepted on input because older endpoints still emit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, alias = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, alias = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, alias = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Contact {
    /// First and last name joined by a space, skipping whichever is missing.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Best label for listings: full name, then email, then a placeholder.
    pub fn display_name(&self) -> String {
        self.full_name()
            .or_else(|| non_empty(self.email.as_deref()).map(str::to_owned))
            .unwrap_or_else(|| String::from("(unnamed)"))
    }

    /// A contact is worth creating when it can be told apart from others:
    /// it needs a first name, a last name or an email.
    pub fn has_identity(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .into_iter()
            .any(|value| non_empty(value.as_deref()).is_some())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_skips_missing_parts() {
        let contact = Contact {
            first_name: Some("Ada".into()),
            last_name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(contact.full_name().as_deref(), Some("Ada"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let contact = Contact {
            email: Some("ada@example.com".into()),
            ..Default::default()
        };
        assert_eq!(contact.display_name(), "ada@example.com");
        assert!(contact.has_identity());
    }

    #[test]
    fn blank_contact_has_no_identity() {
        let contact = Contact {
            company: Some("Analytical Engines".into()),
            ..Default::default()
        };
        assert!(!contact.has_identity());
        assert_eq!(contact.display_name(), "(unnamed)");
    }

    #[test]
    fn accepts_camel_case_payloads() {
        let json = r#"{"id": 7, "firstName": "Grace", "last_name": "Hopper", "jobTitle": "Rear Admiral"}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.id, Some(7));
        assert_eq!(contact.first_name.as_deref(), Some("Grace"));
        assert_eq!(contact.job_title.as_deref(), Some("Rear Admiral"));
    }

    #[test]
    fn omits_empty_fields_when_serialized() {
        let contact = Contact {
            first_name: Some("Grace".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json, serde_json::json!({ "first_name": "Grace" }));
    }
}
