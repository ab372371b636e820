use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_AUTH_URL: &str = "https://auth.bugout.dev";
pub const DEFAULT_SPIRE_URL: &str = "https://spire.bugout.dev";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Settings for the diagnostics reporter.
///
/// Reporting is opt-in: without `enabled = true` and both credentials the
/// reporter never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub enabled: bool,
    pub access_token: Option<String>,
    pub journal_id: Option<String>,
    /// Authentication service endpoint. Validated with the rest of the config;
    /// submissions only need the bearer token and go to `spire_url`.
    pub auth_url: String,
    /// Entry submission service.
    pub spire_url: String,
    pub timeout_ms: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: None,
            journal_id: None,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            spire_url: DEFAULT_SPIRE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/** Raw TOML mapping for the [reporting] table. */
#[derive(Debug, Default, Deserialize)]
struct RawReporting {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    journal_id: Option<String>,
    #[serde(default)]
    auth_url: Option<String>,
    #[serde(default)]
    spire_url: Option<String>,
    #[serde(default)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    reporting: RawReporting,
}

impl ReporterConfig {
    /// Parse a configuration from a TOML string.
    ///
    /// Example TOML:
    /// [reporting]
    /// enabled = true
    /// access_token = "..."
    /// journal_id = "..."
    /// timeout_ms = 3000
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let r = raw.reporting;
        let defaults = Self::default();
        let cfg = ReporterConfig {
            enabled: r.enabled.unwrap_or(defaults.enabled),
            access_token: r.access_token.filter(|s| !s.is_empty()),
            journal_id: r.journal_id.filter(|s| !s.is_empty()),
            auth_url: r.auth_url.unwrap_or(defaults.auth_url),
            spire_url: r.spire_url.unwrap_or(defaults.spire_url),
            timeout_ms: r.timeout_ms.unwrap_or(defaults.timeout_ms),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Compute the default config file path.
    /// Uses $XDG_CONFIG_HOME/hub/reporting.toml or ~/.config/hub/reporting.toml.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("hub").join("reporting.toml"))
    }

    /// Load the default file if it exists, otherwise fall back to defaults.
    /// Environment overrides are applied in both cases.
    pub fn load_default() -> Result<Self, ConfigError> {
        let cfg = match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from_path(&path)?,
            _ => Self::default(),
        };
        cfg.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `HUB_REPORTING_*` overrides read through `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("HUB_REPORTING_ENABLED") {
            self.enabled = parse_flag(&v).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "HUB_REPORTING_ENABLED: expected a boolean, got '{v}'"
                ))
            })?;
        }
        if let Some(v) = lookup("HUB_REPORTING_ACCESS_TOKEN").filter(|v| !v.is_empty()) {
            self.access_token = Some(v);
        }
        if let Some(v) = lookup("HUB_REPORTING_JOURNAL_ID").filter(|v| !v.is_empty()) {
            self.journal_id = Some(v);
        }
        if let Some(v) = lookup("HUB_REPORTING_TIMEOUT_MS") {
            self.timeout_ms = v.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "HUB_REPORTING_TIMEOUT_MS: expected milliseconds, got '{v}'"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".into()));
        }
        for (name, url) in [("auth_url", &self.auth_url), ("spire_url", &self.spire_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) url, got '{url}'"
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Token and journal, when reporting is enabled and both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        match (&self.access_token, &self.journal_id) {
            (Some(token), Some(journal)) => Some((token.as_str(), journal.as_str())),
            _ => None,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
