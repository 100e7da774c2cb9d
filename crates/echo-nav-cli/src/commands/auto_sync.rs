use echo_nav_core::config::AutoSyncSettings;

use super::common::CliContext;
use crate::error::CliError;

pub async fn run_auto_sync(
    context: &CliContext,
    enable: bool,
    disable: bool,
    interval: Option<u32>,
) -> Result<(), CliError> {
    let mut manager = context.open_offline_manager().await?;
    let current = manager.auto_sync();

    let settings = match requested_state(current, enable, disable, interval) {
        Some((enabled, interval)) => manager.set_auto_sync(enabled, interval).await,
        None => current,
    };

    println!("{}", describe(settings));
    Ok(())
}

/// `None` when the invocation only asks for the current settings
pub const fn requested_state(
    current: AutoSyncSettings,
    enable: bool,
    disable: bool,
    interval: Option<u32>,
) -> Option<(bool, Option<u32>)> {
    if enable {
        Some((true, interval))
    } else if disable {
        Some((false, interval))
    } else if interval.is_some() {
        Some((current.enabled, interval))
    } else {
        None
    }
}

pub fn describe(settings: AutoSyncSettings) -> String {
    if settings.enabled {
        format!(
            "Auto-sync enabled (every {} minutes)",
            settings.interval_minutes
        )
    } else {
        format!(
            "Auto-sync disabled (interval {} minutes)",
            settings.interval_minutes
        )
    }
}
