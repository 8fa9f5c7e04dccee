use serde::{Deserialize, Serialize};

/// A row from a previously written job tracker. Either field may be missing;
/// rows with neither are ignored when rebuilding the seen set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PersistedRecord {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: Some(url.into()),
        }
    }
}
