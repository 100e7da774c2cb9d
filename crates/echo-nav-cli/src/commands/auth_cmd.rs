use super::common::CliContext;
use crate::auth::{clear_stored_token, mask_token, resolve_token, store_token};
use crate::error::CliError;

pub fn run_auth_login(context: &CliContext, token: &str) -> Result<(), CliError> {
    store_token(&context.profile_name, token)?;
    println!(
        "Stored GitHub token for profile '{}' in the system keychain",
        context.profile_name
    );
    Ok(())
}

pub fn run_auth_status(context: &CliContext) -> Result<(), CliError> {
    match resolve_token(&context.profile_name)? {
        Some((token, source)) => println!(
            "Profile '{}': token {} from {}",
            context.profile_name,
            mask_token(&token),
            source.as_str()
        ),
        None => println!(
            "Profile '{}': not signed in. Run `echo-nav auth login --token <TOKEN>`.",
            context.profile_name
        ),
    }
    Ok(())
}

pub fn run_auth_logout(context: &CliContext) -> Result<(), CliError> {
    clear_stored_token(&context.profile_name)?;
    println!("Removed stored token for profile '{}'", context.profile_name);
    Ok(())
}
