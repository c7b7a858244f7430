use serde::{Deserialize, Serialize};

/// A named collection of contacts. Membership is many-to-many and lives on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "contactCount", skip_serializing_if = "Option::is_none")]
    pub contact_count: Option<u64>,
}

/// Payload for creating or renaming a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
