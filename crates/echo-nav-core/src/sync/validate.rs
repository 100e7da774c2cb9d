//! Trust gate for remote config documents

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::SyncConfig;

fn has_text(object: &Map<String, Value>, field: &str) -> bool {
    object
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| !value.trim().is_empty())
}

fn check_records(records: &[Value], kind: &str, required: &[&str]) -> std::result::Result<(), String> {
    for (index, record) in records.iter().enumerate() {
        let Some(object) = record.as_object() else {
            return Err(format!("{kind}[{index}] is not an object"));
        };
        if let Some(field) = required.iter().find(|field| !has_text(object, field)) {
            return Err(format!("{kind}[{index}] is missing '{field}'"));
        }
    }
    Ok(())
}

/// Structurally check an arbitrary JSON value against the config shape.
///
/// Returns the reason for the first failure found. Never mutates `value`.
pub fn check_sync_config(value: &Value) -> std::result::Result<(), String> {
    let Some(root) = value.as_object() else {
        return Err("document is not an object".to_string());
    };

    let Some(websites) = root.get("websites").and_then(Value::as_array) else {
        return Err("'websites' must be an array".to_string());
    };
    let Some(categories) = root.get("categories").and_then(Value::as_array) else {
        return Err("'categories' must be an array".to_string());
    };
    if !root.get("settings").is_some_and(Value::is_object) {
        return Err("'settings' must be an object".to_string());
    }
    let Some(metadata) = root.get("metadata").and_then(Value::as_object) else {
        return Err("'metadata' must be an object".to_string());
    };

    check_records(websites, "websites", &["id", "name", "url"])?;
    check_records(categories, "categories", &["id", "name"])?;

    for field in ["version", "lastSync"] {
        if !has_text(metadata, field) {
            return Err(format!("metadata is missing '{field}'"));
        }
    }

    Ok(())
}

/// Boolean form of [`check_sync_config`]
pub fn is_valid_sync_config(value: &Value) -> bool {
    check_sync_config(value).is_ok()
}

/// Validate and deserialize an untrusted remote document.
///
/// Both structural failures and typed decoding failures (bad timestamps,
/// unknown setting values) surface as [`Error::InvalidConfig`]. Settings
/// missing from the document are filled with their defaults, matching the
/// snapshots built locally.
pub fn parse_sync_config(value: Value) -> Result<SyncConfig> {
    check_sync_config(&value).map_err(Error::InvalidConfig)?;
    let mut config: SyncConfig = serde_json::from_value(value)
        .map_err(|error| Error::InvalidConfig(error.to_string()))?;
    config.settings = config.settings.resolved();
    Ok(config)
}
