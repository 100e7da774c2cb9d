use chrono::{DateTime, Utc};
use echo_nav_core::config::AutoSyncSettings;
use echo_nav_core::store::{LocalStore, RemoteStore};
use echo_nav_core::{SyncManager, SyncStatus};
use serde::Serialize;

use super::common::{format_relative_time, format_sync_timestamp, CliContext};
use crate::auth::{resolve_token, TokenSource};
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub profile: String,
    pub data_dir: String,
    pub authenticated: bool,
    pub token_source: Option<String>,
    pub gist_id: Option<String>,
    pub device_id: String,
    pub last_status: SyncStatus,
    pub last_message: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
    pub auto_sync: AutoSyncSettings,
    pub website_count: usize,
    pub category_count: usize,
}

pub async fn run_status(context: &CliContext, json: bool) -> Result<(), CliError> {
    let token_source = resolve_token(&context.profile_name)?.map(|(_, source)| source);
    let manager = context.open_offline_manager().await?;
    let mut report = build_status_report(&manager, token_source).await?;
    report.profile.clone_from(&context.profile_name);
    report.data_dir = context.data_dir.display().to_string();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_status_lines(&report, Utc::now()) {
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn build_status_report<L: LocalStore, R: RemoteStore>(
    manager: &SyncManager<L, R>,
    token_source: Option<TokenSource>,
) -> Result<StatusReport, CliError> {
    let latest = manager.history().latest();
    Ok(StatusReport {
        profile: String::new(),
        data_dir: String::new(),
        authenticated: token_source.is_some(),
        token_source: token_source.map(|source| source.as_str().to_string()),
        gist_id: manager.remote_handle().map(ToString::to_string),
        device_id: manager.identity().device_id.clone(),
        last_status: latest.map_or(SyncStatus::Idle, |entry| entry.status),
        last_message: latest.map(|entry| entry.message.clone()),
        last_sync: manager.last_sync_time(),
        auto_sync: manager.auto_sync(),
        website_count: manager.local().load_websites().await?.len(),
        category_count: manager.local().load_categories().await?.len(),
    })
}

pub fn format_status_lines(report: &StatusReport, now: DateTime<Utc>) -> Vec<String> {
    let auth = report.token_source.as_deref().map_or_else(
        || "not signed in".to_string(),
        |source| format!("token from {source}"),
    );
    let last_sync = report.last_sync.map_or_else(
        || "never".to_string(),
        |time| {
            format!(
                "{} ({})",
                format_sync_timestamp(time),
                format_relative_time(time, now)
            )
        },
    );
    let auto_sync = if report.auto_sync.enabled {
        format!("every {} min", report.auto_sync.interval_minutes)
    } else {
        "disabled".to_string()
    };

    let mut lines = vec![
        format!("Profile:    {}", report.profile),
        format!("Data dir:   {}", report.data_dir),
        format!("Auth:       {auth}"),
        format!(
            "Gist:       {}",
            report.gist_id.as_deref().unwrap_or("not linked")
        ),
        format!("Status:     {}", report.last_status),
        format!("Last sync:  {last_sync}"),
        format!("Auto-sync:  {auto_sync}"),
        format!(
            "Local data: {} websites, {} categories",
            report.website_count, report.category_count
        ),
    ];
    if let Some(message) = &report.last_message {
        lines.insert(5, format!("Message:    {message}"));
    }
    lines
}
