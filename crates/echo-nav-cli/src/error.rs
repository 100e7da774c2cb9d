use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] echo_nav_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Website name cannot be empty")]
    EmptyName,
    #[error("Invalid URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Sync is not configured. Run `echo-nav auth login --token <TOKEN>` or set GITHUB_TOKEN."
    )]
    SyncNotConfigured,
    #[error(
        "Sync conflict in {fields} ({conflict_type}). Re-run with --resolve local|remote|merge."
    )]
    UnresolvedConflict {
        conflict_type: String,
        fields: String,
    },
}
