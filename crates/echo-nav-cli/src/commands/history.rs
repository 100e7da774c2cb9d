use chrono::{DateTime, Utc};
use echo_nav_core::sync::HistoryEntry;

use super::common::{format_diff, format_relative_time, CliContext};
use crate::error::CliError;

pub async fn run_history(
    context: &CliContext,
    limit: usize,
    json: bool,
    clear: bool,
) -> Result<(), CliError> {
    let mut manager = context.open_offline_manager().await?;

    if clear {
        manager.clear_history().await;
        println!("Sync history cleared");
        return Ok(());
    }

    let entries: Vec<&HistoryEntry> = manager.history().iter().take(limit).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No sync history yet");
    } else {
        for line in format_history_lines(&entries, Utc::now()) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_history_lines(entries: &[&HistoryEntry], now: DateTime<Utc>) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let changes = entry
                .changes
                .as_ref()
                .map(|diff| format!(" ({})", format_diff(diff)))
                .unwrap_or_default();
            format!(
                "{:<8} {:<9} {}{changes}",
                format_relative_time(entry.timestamp, now),
                entry.status.as_str(),
                entry.message
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use echo_nav_core::sync::ConfigDiff;
    use echo_nav_core::SyncStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn history_lines_include_change_summary() {
        let now = Utc::now();
        let mut uploaded = HistoryEntry::new(
            SyncStatus::Success,
            "Config uploaded",
            Some(ConfigDiff {
                websites_added: 2,
                settings_changed: true,
                ..ConfigDiff::default()
            }),
        );
        uploaded.timestamp = now - Duration::minutes(5);
        let failed = HistoryEntry::new(SyncStatus::Error, "Download failed: offline", None);

        let lines = format_history_lines(&[&failed, &uploaded], now);

        assert_eq!(lines[0], "just now error     Download failed: offline");
        assert_eq!(
            lines[1],
            "5m ago   success   Config uploaded (2 websites added, settings changed)"
        );
    }
}
