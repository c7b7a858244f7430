use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordering of contact listings. Persisted as the user's preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    Newest,
    Oldest,
    Company,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::Company,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Company => "company",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "name" => Ok(SortOrder::NameAsc),
            other => SortOrder::ALL
                .into_iter()
                .find(|order| order.as_str() == other)
                .ok_or_else(|| {
                    let known: Vec<&str> = SortOrder::ALL.iter().map(|o| o.as_str()).collect();
                    format!("invalid sort order: {s} (expected one of {})", known.join(", "))
                }),
        }
    }
}
