use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Date format used in every rulebook document.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Literal marking a validity period with no end.
pub const OPEN_ENDED: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Editing {
    pub created: NaiveDate,
    pub modified: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Validity {
    pub from: NaiveDate,
    pub until: Until,
}

/// End of a validity period: a date, or `...` for "until further notice".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    Date(NaiveDate),
    Open,
}

impl std::fmt::Display for Until {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Until::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Until::Open => f.write_str(OPEN_ENDED),
        }
    }
}

impl Serialize for Until {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Logo {
    pub light: String,
    pub dark: String,
}
