//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_record_id, SyncRecord};

/// Maximum category name length in characters
pub const CATEGORY_NAME_MAX_LEN: usize = 50;

/// A category grouping websites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Advisory parent; hierarchy is shallow and not cycle-checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_visible() -> bool {
    true
}

impl Category {
    /// Create a new visible category
    ///
    /// The name is trimmed and truncated to [`CATEGORY_NAME_MAX_LEN`] characters.
    #[must_use]
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: new_record_id(),
            name: name.into().trim().chars().take(CATEGORY_NAME_MAX_LEN).collect(),
            description: None,
            color: None,
            icon: None,
            parent_id: None,
            sort_order,
            is_visible: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl SyncRecord for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}
