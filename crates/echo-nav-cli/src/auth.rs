//! GitHub token helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use echo_nav_core::util::normalize_text_option;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "echo-nav-cli";
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Where the active token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keychain,
}

impl TokenSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment (GITHUB_TOKEN)",
            Self::Keychain => "keychain",
        }
    }
}

#[derive(Clone)]
struct TokenStore {
    username: String,
}

impl TokenStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("github_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<String>, CliError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<String>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save(&self, token: &str) -> Result<(), CliError> {
        self.entry()?
            .set_password(token)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, token: &str) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.insert(self.username.clone(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<(), CliError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// `GITHUB_TOKEN` wins over the token stored for `profile_name`.
pub fn resolve_token(profile_name: &str) -> Result<Option<(String, TokenSource)>, CliError> {
    if let Some(token) = normalize_text_option(std::env::var(TOKEN_ENV).ok()) {
        return Ok(Some((token, TokenSource::Environment)));
    }
    load_stored_token(profile_name)
        .map(|token| token.map(|token| (token, TokenSource::Keychain)))
}

pub fn load_stored_token(profile_name: &str) -> Result<Option<String>, CliError> {
    Ok(normalize_text_option(TokenStore::new(profile_name).load()?))
}

pub fn store_token(profile_name: &str, token: &str) -> Result<(), CliError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CliError::Auth("Token cannot be empty".to_string()));
    }
    TokenStore::new(profile_name).save(token)
}

pub fn clear_stored_token(profile_name: &str) -> Result<(), CliError> {
    TokenStore::new(profile_name).clear()
}

/// Last four characters only
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_token_roundtrip_is_scoped_per_profile() {
        store_token("auth-test-a", " ghp_alpha ").unwrap();
        store_token("auth-test-b", "ghp_beta").unwrap();

        assert_eq!(
            load_stored_token("auth-test-a").unwrap().as_deref(),
            Some("ghp_alpha")
        );
        assert_eq!(
            load_stored_token("auth-test-b").unwrap().as_deref(),
            Some("ghp_beta")
        );

        clear_stored_token("auth-test-a").unwrap();
        assert_eq!(load_stored_token("auth-test-a").unwrap(), None);
        clear_stored_token("auth-test-a").unwrap();
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            store_token("auth-test-empty", "   "),
            Err(CliError::Auth(_))
        ));
    }

    #[test]
    fn mask_token_hides_all_but_tail() {
        assert_eq!(mask_token("ghp_1234567890"), "****7890");
        assert_eq!(mask_token("abc"), "****");
    }
}
