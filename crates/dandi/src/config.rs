//! Settings loaded from environment variables.
//!
//! Settings are read once and passed explicitly to the components that need
//! them; nothing here consults or mutates process-wide state afterwards.

use std::time::Duration;

use crate::error::{DandiError, Result};
use crate::schema::ValidationMode;

/// DOI prefix used when none is configured.
pub const DEFAULT_DOI_PREFIX: &str = "10.80507";

/// Registry request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// DOI registry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoiSettings {
    pub api_url: Option<String>,
    pub api_user: Option<String>,
    pub api_password: Option<String>,
    pub api_prefix: Option<String>,
    /// Register DOIs as findable instead of draft.
    pub publish: bool,
    pub timeout_secs: u64,
}

impl Default for DoiSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_user: None,
            api_password: None,
            api_prefix: None,
            publish: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DoiSettings {
    /// Registration is enabled as soon as any registry setting is present.
    pub fn is_configured(&self) -> bool {
        self.api_url.is_some()
            || self.api_user.is_some()
            || self.api_password.is_some()
            || self.api_prefix.is_some()
    }

    /// Configured prefix, or the fallback.
    pub fn prefix(&self) -> &str {
        self.api_prefix.as_deref().unwrap_or(DEFAULT_DOI_PREFIX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// All recognized settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub doi: DoiSettings,
    /// Accept `localhost` URLs in metadata (non-production only).
    pub allow_localhost_urls: bool,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// | Env Var                      | Default    |
    /// |------------------------------|------------|
    /// | `DANDI_DOI_API_URL`          | unset      |
    /// | `DANDI_DOI_API_USER`         | unset      |
    /// | `DANDI_DOI_API_PASSWORD`     | unset      |
    /// | `DANDI_DOI_API_PREFIX`       | `10.80507` |
    /// | `DANDI_DOI_PUBLISH`          | `false`    |
    /// | `DANDI_DOI_API_TIMEOUT`      | `30`       |
    /// | `DANDI_ALLOW_LOCALHOST_URLS` | `false`    |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get("DANDI_DOI_API_TIMEOUT") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(DandiError::Config(format!(
                        "DANDI_DOI_API_TIMEOUT must be a positive number of seconds, got '{}'",
                        raw
                    )));
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let doi = DoiSettings {
            api_url: get("DANDI_DOI_API_URL"),
            api_user: get("DANDI_DOI_API_USER"),
            api_password: get("DANDI_DOI_API_PASSWORD"),
            api_prefix: get("DANDI_DOI_API_PREFIX"),
            publish: parse_bool("DANDI_DOI_PUBLISH", get("DANDI_DOI_PUBLISH"))?,
            timeout_secs,
        };

        Ok(Self {
            doi,
            allow_localhost_urls: parse_bool(
                "DANDI_ALLOW_LOCALHOST_URLS",
                get("DANDI_ALLOW_LOCALHOST_URLS"),
            )?,
        })
    }

    /// Validation mode implied by these settings.
    pub fn validation_mode(&self) -> ValidationMode {
        ValidationMode {
            allow_localhost_urls: self.allow_localhost_urls,
        }
    }
}

fn parse_bool(key: &str, value: Option<String>) -> Result<bool> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(DandiError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}
