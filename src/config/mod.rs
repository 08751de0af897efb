//! Configuration loading with precedence handling.
//!
//! Resolution order is defaults, then config file, then environment
//! variables, then CLI arguments — later layers win.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Default page size when nothing overrides it.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Environment variable overriding the batch size.
pub const ENV_BATCH_SIZE: &str = "TDLV_BATCH_SIZE";

/// Environment variable overriding the log file path.
pub const ENV_LOG_FILE: &str = "TDLV_LOG_FILE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file was explicitly requested but does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the config file.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Config file contains invalid TOML.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to defaults.
/// Corresponds to `~/.config/tdlv/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Raw lines per page.
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Default case sensitivity of the text filter.
    #[serde(default)]
    pub ignore_case: Option<bool>,

    /// Path for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Raw lines per page.
    pub batch_size: usize,
    /// Default case sensitivity of the text filter.
    pub ignore_case: bool,
    /// Path for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            ignore_case: true,
            log_file_path: default_log_path(),
        }
    }
}

/// Platform-appropriate default log path, e.g.
/// `~/.local/state/tdlv/tdlv.log` on Linux.
///
/// Falls back to the current directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("tdlv").join("tdlv.log")
    } else {
        PathBuf::from("tdlv.log")
    }
}

/// Default config file location, `~/.config/tdlv/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tdlv").join("config.toml"))
}

/// Load a config file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist — absence is not an error,
/// defaults apply.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    Ok(Some(config))
}

/// Load configuration honoring an explicit `--config` path.
///
/// An explicit path must exist; the default location is optional.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] for a missing explicit path, or any
/// read/parse error from [`load_config_file`].
pub fn load_config_with_precedence(
    explicit_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            load_config_file(path)
        }
        None => match default_config_path() {
            Some(path) => load_config_file(path),
            None => Ok(None),
        },
    }
}

/// Merge an optional config file over the hardcoded defaults.
pub fn merge_config(file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();
    let Some(file) = file else {
        return defaults;
    };
    ResolvedConfig {
        batch_size: file.batch_size.unwrap_or(defaults.batch_size),
        ignore_case: file.ignore_case.unwrap_or(defaults.ignore_case),
        log_file_path: file.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides on top of `config`.
///
/// Unset or unparseable variables leave the value unchanged.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(ENV_BATCH_SIZE) {
        if let Ok(size) = raw.parse::<usize>() {
            if size > 0 {
                config.batch_size = size;
            }
        }
    }
    if let Ok(raw) = std::env::var(ENV_LOG_FILE) {
        if !raw.is_empty() {
            config.log_file_path = PathBuf::from(raw);
        }
    }
    config
}

/// Apply CLI argument overrides (the final layer).
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    batch_size: Option<usize>,
    case_sensitive: bool,
) -> ResolvedConfig {
    if let Some(size) = batch_size {
        config.batch_size = size.max(1);
    }
    if case_sensitive {
        config.ignore_case = false;
    }
    config
}
