use echo_nav_core::util::normalize_text_option;

use crate::config_profiles::{normalize_api_base_url, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config_init(
    profile_name: Option<&str>,
    data_dir: Option<String>,
    api_base_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_init(&mut config, &profile_name, data_dir, api_base_url, no_activate)?;
    let path = config.save()?;
    println!("Saved profile '{profile_name}' to {}", path.display());
    Ok(())
}

pub fn apply_init(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    data_dir: Option<String>,
    api_base_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let api_base_url = normalize_text_option(api_base_url)
        .map(normalize_api_base_url)
        .transpose()?;

    let profile = config.profile_mut_or_default(profile_name);
    if let Some(data_dir) = normalize_text_option(data_dir) {
        profile.data_dir = Some(data_dir);
    }
    if let Some(api_base_url) = api_base_url {
        profile.gist_api_base_url = Some(api_base_url);
    }
    if !no_activate || config.active_profile.is_none() {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    println!("Profile: {profile_name}");
    println!(
        "Data dir: {}",
        profile
            .data_dir()
            .map_or_else(|| "(default)".to_string(), |dir| dir.display().to_string())
    );
    println!(
        "Gist API: {}",
        profile
            .gist_api_base_url()
            .unwrap_or_else(|| echo_nav_core::gist::DEFAULT_API_BASE_URL.to_string())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn init_creates_and_activates_profile() {
        let mut config = CliProfilesConfig::default();
        apply_init(
            &mut config,
            "work",
            Some(" /data/work ".to_string()),
            Some("https://ghe.example.com/api/v3/".to_string()),
            false,
        )
        .unwrap();

        assert_eq!(config.active_profile.as_deref(), Some("work"));
        let profile = config.profile("work").unwrap();
        assert_eq!(profile.data_dir.as_deref(), Some("/data/work"));
        assert_eq!(
            profile.gist_api_base_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
    }

    #[test]
    fn init_without_activate_keeps_current_profile() {
        let mut config = CliProfilesConfig {
            active_profile: Some("home".to_string()),
            ..CliProfilesConfig::default()
        };
        apply_init(&mut config, "work", None, None, true).unwrap();

        assert_eq!(config.active_profile.as_deref(), Some("home"));
        assert!(config.profile("work").is_some());
    }

    #[test]
    fn init_rejects_non_http_api_url() {
        let mut config = CliProfilesConfig::default();
        let result = apply_init(&mut config, "work", None, Some("ghe".to_string()), false);
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(config.profile("work").is_none());
    }
}
