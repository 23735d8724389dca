//! Configuration loading
//!
//! Bootstrap configuration lives in a small TOML file. Every key is optional;
//! anything missing falls back to the compiled defaults below.
//!
//! # Config file resolution
//!
//! 1. Command-line argument (highest priority)
//! 2. `OCF_CONFIG` environment variable
//! 3. `<user config dir>/ocf/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file never stops start-up: it is logged and defaults are used.
//! A file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "OCF_CONFIG";

/// Root of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Form controller timings and thresholds
    #[serde(default)]
    pub form: FormConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Form controller settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    /// Quiet period before a field is validated
    #[serde(default = "default_validation_debounce_ms")]
    pub validation_debounce_ms: u64,

    /// Quiet period before company suggestions are fetched
    #[serde(default = "default_suggestion_debounce_ms")]
    pub suggestion_debounce_ms: u64,

    /// Company name must be strictly longer than this to trigger a lookup
    #[serde(default = "default_suggestion_min_chars")]
    pub suggestion_min_chars: usize,

    /// Per-subscriber event buffer
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl FormConfig {
    pub fn validation_debounce(&self) -> Duration {
        Duration::from_millis(self.validation_debounce_ms)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validation_debounce_ms: default_validation_debounce_ms(),
            suggestion_debounce_ms: default_suggestion_debounce_ms(),
            suggestion_min_chars: default_suggestion_min_chars(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_validation_debounce_ms() -> u64 {
    300
}

fn default_suggestion_debounce_ms() -> u64 {
    500
}

fn default_suggestion_min_chars() -> usize {
    3
}

fn default_event_capacity() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content).map_err(|source| Error::TomlParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, path)
    }

    fn validate(&self) -> Result<()> {
        if self.form.event_capacity == 0 {
            return Err(Error::Config("form.event_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Locates and loads the config file following the priority order above
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Config file path to use, if any source names one that exists
    ///
    /// An explicit path (CLI or env) is returned even if it does not exist so
    /// the caller can report it.
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|path| path.exists())
    }

    /// Resolve and load the configuration
    ///
    /// Missing files degrade to defaults with a warning; parse errors are
    /// returned.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let Some(path) = self.config_path() else {
            info!("No config file found, using compiled defaults");
            return Ok(TomlConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                info!("Loading configuration from {}", path.display());
                TomlConfig::from_toml_str(&content, &path)
            }
            Err(e) => {
                warn!(
                    "Config file {} not readable ({}), using compiled defaults",
                    path.display(),
                    e
                );
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Default per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ocf").join("config.toml"))
}
