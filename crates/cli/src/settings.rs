//! Credentials read from the environment.
//!
//! All four variables are required and validated together before the engine
//! is touched, so a misconfigured run fails before creating anything.

use stack::{AccessToken, ConfigKey, ConfigMap, ConfigValue, OrganizationName};
use thiserror::Error;

pub const PULUMI_ACCESS_TOKEN: &str = "PULUMI_ACCESS_TOKEN";
pub const PULUMI_ORG_NAME: &str = "PULUMI_ORG_NAME";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_OWNER: &str = "GITHUB_OWNER";

/// Provider configuration keys set on every stack.
pub const GITHUB_TOKEN_KEY: &str = "github:token";
pub const GITHUB_OWNER_KEY: &str = "github:owner";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("environment variable {name} must be set")]
    Missing { name: &'static str },
}

/// Backend and provider credentials for one run.
#[derive(Clone)]
pub struct Credentials {
    pub access_token: AccessToken,
    pub organization: OrganizationName,
    github_token: String,
    github_owner: String,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credentials through `lookup`; empty values count as missing.
    ///
    /// Variables are checked in a fixed order and the first missing one is
    /// reported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(SettingsError::Missing { name })
        };

        let access_token = require(PULUMI_ACCESS_TOKEN)?;
        let organization = require(PULUMI_ORG_NAME)?;
        let github_token = require(GITHUB_TOKEN)?;
        let github_owner = require(GITHUB_OWNER)?;

        Ok(Self {
            access_token: AccessToken::new(access_token).ok_or(SettingsError::Missing {
                name: PULUMI_ACCESS_TOKEN,
            })?,
            organization: OrganizationName::new(organization).ok_or(SettingsError::Missing {
                name: PULUMI_ORG_NAME,
            })?,
            github_token,
            github_owner,
        })
    }

    /// The GitHub provider configuration: token and owner, both secret.
    pub fn provider_config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        if let Some(key) = ConfigKey::new(GITHUB_TOKEN_KEY) {
            config.insert(key, ConfigValue::secret(self.github_token.clone()));
        }
        if let Some(key) = ConfigKey::new(GITHUB_OWNER_KEY) {
            config.insert(key, ConfigValue::secret(self.github_owner.clone()));
        }
        config
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("organization", &self.organization)
            .field("github_token", &"<redacted>")
            .field("github_owner", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
