//! Website (bookmark) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_record_id, SyncRecord};

/// A bookmarked website
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    /// Unique identifier
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Weak reference to a [`Category`](super::Category)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub visit_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Website {
    /// Create a new website stamped with the current time
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_record_id(),
            name: name.into(),
            url: url.into(),
            description: None,
            icon: None,
            category_id: None,
            tags: Vec::new(),
            is_private: false,
            is_favorite: false,
            visit_count: 0,
            last_visited: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl SyncRecord for Website {
    fn id(&self) -> &str {
        &self.id
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_new() {
        let website = Website::new("Rust", "https://www.rust-lang.org");
        assert_eq!(website.name, "Rust");
        assert!(!website.id.is_empty());
        assert_eq!(website.created_at, website.updated_at);
        assert_eq!(website.visit_count, 0);
    }

    #[test]
    fn test_modified_at_falls_back_to_created_at() {
        let mut website = Website::new("Docs", "https://docs.rs");
        let created = website.created_at;
        website.updated_at = None;
        assert_eq!(website.modified_at(), created);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let website: Website = serde_json::from_str(
            r#"{"id":"a","name":"Example","url":"https://example.com","categoryId":"c1","isFavorite":true}"#,
        )
        .unwrap();
        assert_eq!(website.category_id.as_deref(), Some("c1"));
        assert!(website.is_favorite);
        assert!(website.tags.is_empty());
        assert_eq!(website.modified_at(), None);
    }
}
