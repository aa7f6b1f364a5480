//! Configuration for flagdex.
//!
//! One flat TOML table, layered by figment: built-in defaults, then the
//! config file, then `FLAGDEX_`-prefixed environment variables. A missing
//! file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flagdex_core::{DEFAULT_ENDPOINT, FilterMode, PLACEHOLDER_FLAG_URL};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Directory endpoint. Defaults to the public country directory.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// How search input is interpreted: "literal" or "pattern".
    #[serde(default)]
    pub filter_mode: FilterMode,

    /// Check flag URLs in the background and fall back to the placeholder.
    /// Checks run one at a time, each bounded by `timeout_secs` or 10s.
    #[serde(default = "default_probe_flags")]
    pub probe_flags: bool,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Image shown for flags that fail to load.
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            filter_mode: FilterMode::default(),
            probe_flags: default_probe_flags(),
            timeout_secs: None,
            placeholder_url: default_placeholder_url(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_probe_flags() -> bool {
    true
}
fn default_placeholder_url() -> String {
    PLACEHOLDER_FLAG_URL.into()
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject URLs that could never be fetched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("endpoint", &self.endpoint)?;
        check_http_url("placeholder_url", &self.placeholder_url)?;
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Render as TOML (used by `--print-config`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url: url::Url = value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "flagdex", "flagdex").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("flagdex");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load and validate the config from `path` + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLAGDEX_"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}
