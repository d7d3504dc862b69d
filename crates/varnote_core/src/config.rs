//! Plugin runtime configuration.
//!
//! # Responsibility
//! - Hold UI sizing, startup timing, debug-sample and logging options.
//! - Load options from host JSON or `VARNOTE_*` environment variables.
//!
//! # Invariants
//! - Every field has a default; partial inputs are merged over defaults.
//! - A config is only handed to the controller after `validate()`.

use crate::logging::{default_log_level, init_logging, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UI_WIDTH: u32 = 800;
pub const DEFAULT_UI_HEIGHT: u32 = 600;
pub const DEFAULT_INITIAL_LOAD_DELAY_MS: u64 = 100;
/// Reserved id prefix of debug sample records.
pub const DEFAULT_SAMPLE_ID_PREFIX: &str = "sample-";

const ENV_UI_WIDTH: &str = "VARNOTE_UI_WIDTH";
const ENV_UI_HEIGHT: &str = "VARNOTE_UI_HEIGHT";
const ENV_INITIAL_LOAD_DELAY_MS: &str = "VARNOTE_INITIAL_LOAD_DELAY_MS";
const ENV_SAMPLE_ID_PREFIX: &str = "VARNOTE_SAMPLE_ID_PREFIX";
const ENV_LOG_LEVEL: &str = "VARNOTE_LOG_LEVEL";
const ENV_LOG_DIR: &str = "VARNOTE_LOG_DIR";
const DEFAULT_LOG_DIR_NAME: &str = "varnote-logs";

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment value could not be parsed.
    InvalidValue { key: &'static str, value: String },
    /// Parsed config violates an invariant.
    Invalid(String),
    /// Host JSON could not be parsed.
    Parse(serde_json::Error),
    /// Logger backend refused the configured level or directory.
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Logging(message) => write!(f, "failed to start logging: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Plugin options shared by the controller and the host shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub ui_width: u32,
    pub ui_height: u32,
    /// Delay before the automatic first load after the UI is shown.
    pub initial_load_delay_ms: u64,
    pub sample_id_prefix: String,
    pub log_level: String,
    /// Absolute log directory; the system temp dir is used when unset.
    pub log_dir: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            ui_width: DEFAULT_UI_WIDTH,
            ui_height: DEFAULT_UI_HEIGHT,
            initial_load_delay_ms: DEFAULT_INITIAL_LOAD_DELAY_MS,
            sample_id_prefix: DEFAULT_SAMPLE_ID_PREFIX.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PluginConfig {
    /// Parses host-provided JSON, filling missing fields with defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `VARNOTE_*` process environment variables over defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads options through `lookup`; blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(value) = read(ENV_UI_WIDTH) {
            config.ui_width = parse_number(ENV_UI_WIDTH, &value)?;
        }
        if let Some(value) = read(ENV_UI_HEIGHT) {
            config.ui_height = parse_number(ENV_UI_HEIGHT, &value)?;
        }
        if let Some(value) = read(ENV_INITIAL_LOAD_DELAY_MS) {
            config.initial_load_delay_ms = parse_number(ENV_INITIAL_LOAD_DELAY_MS, &value)?;
        }
        if let Some(value) = read(ENV_SAMPLE_ID_PREFIX) {
            config.sample_id_prefix = value;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(value);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks field invariants.
    ///
    /// # Errors
    /// - Zero UI width or height.
    /// - Empty sample id prefix.
    /// - Log level outside `trace|debug|info|warn|error`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui_width == 0 || self.ui_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "ui size must be non-zero, got {}x{}",
                self.ui_width, self.ui_height
            )));
        }
        if self.sample_id_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sample id prefix cannot be empty".to_string(),
            ));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Directory rolling logs are written to.
    pub fn log_dir_or_default(&self) -> PathBuf {
        match self.log_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }

    /// Starts process logging at `log_level` in `log_dir_or_default()`.
    ///
    /// Idempotent for the same level and directory.
    pub fn start_logging(&self) -> Result<(), ConfigError> {
        let log_dir = self.log_dir_or_default();
        init_logging(&self.log_level, &log_dir.to_string_lossy()).map_err(ConfigError::Logging)
    }

    pub fn initial_load_delay(&self) -> Duration {
        Duration::from_millis(self.initial_load_delay_ms)
    }

    /// Whether `variable_id` belongs to a debug sample record.
    pub fn is_sample_id(&self, variable_id: &str) -> bool {
        variable_id.starts_with(self.sample_id_prefix.as_str())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PluginConfig};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_plugin_shell() {
        let config = PluginConfig::default();
        assert_eq!((config.ui_width, config.ui_height), (800, 600));
        assert_eq!(config.initial_load_delay(), Duration::from_millis(100));
        assert!(config.is_sample_id("sample-1"));
        assert!(!config.is_sample_id("VariableID:1:2"));
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn lookup_overrides_defaults_and_ignores_blank_values() {
        let config = PluginConfig::from_lookup(lookup_from(&[
            ("VARNOTE_UI_WIDTH", "1024"),
            ("VARNOTE_UI_HEIGHT", "  "),
            ("VARNOTE_LOG_LEVEL", "WARN"),
        ]))
        .expect("config from lookup");
        assert_eq!(config.ui_width, 1024);
        assert_eq!(config.ui_height, 600);
        assert_eq!(config.log_level, "WARN");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn log_dir_defaults_to_temp_and_follows_lookup() {
        let config = PluginConfig::default();
        assert_eq!(
            config.log_dir_or_default(),
            std::env::temp_dir().join("varnote-logs")
        );

        let config =
            PluginConfig::from_lookup(lookup_from(&[("VARNOTE_LOG_DIR", "/var/log/varnote")]))
                .expect("config from lookup");
        assert_eq!(
            config.log_dir_or_default(),
            std::path::PathBuf::from("/var/log/varnote")
        );
    }

    #[test]
    fn lookup_rejects_non_numeric_size() {
        let err = PluginConfig::from_lookup(lookup_from(&[("VARNOTE_UI_WIDTH", "wide")]))
            .expect_err("non-numeric width");
        assert!(matches!(err, ConfigError::InvalidValue { key: "VARNOTE_UI_WIDTH", .. }));
    }

    #[test]
    fn json_merges_over_defaults() {
        let config = PluginConfig::from_json(r#"{"uiHeight": 720, "sampleIdPrefix": "demo-"}"#)
            .expect("config from json");
        assert_eq!(config.ui_width, 800);
        assert_eq!(config.ui_height, 720);
        assert!(config.is_sample_id("demo-3"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = PluginConfig::default();
        config.ui_width = 0;
        assert!(config.validate().is_err());

        let mut config = PluginConfig::default();
        config.sample_id_prefix = " ".to_string();
        assert!(config.validate().is_err());

        let err = PluginConfig::from_json(r#"{"logLevel": "verbose"}"#).expect_err("bad level");
        assert!(err.to_string().contains("unsupported log level"));
    }
}
