//! Configuration types

use hardinfo_module_api::DependencyPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main HardInfo configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Runtime path overrides
    #[serde(default)]
    pub paths: PathsConfig,

    /// Module selection and loading
    #[serde(default)]
    pub modules: ModulesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Runtime path configuration
///
/// Unset directories are discovered from the installation prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Directory holding `benchmark.data` and other shared data
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Library directory; modules live in its `modules` subdirectory
    #[serde(default)]
    pub lib_dir: Option<PathBuf>,

    /// Skip relocation and use the compiled-in prefix directly
    #[serde(default)]
    pub try_hardcoded: bool,
}

/// Module loading configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModulesConfig {
    /// File names to load; empty loads every module
    #[serde(default)]
    pub load: Vec<String>,

    /// Handling of dependencies that are not loaded
    #[serde(default)]
    pub dependency_policy: DependencyPolicy,

    /// Whether a GUI shell is attached
    #[serde(default)]
    pub gui: bool,

    /// Pause between rescans in watch mode
    #[serde(default = "default_reload_interval", with = "humantime_serde")]
    pub reload_interval: Duration,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            load: Vec::new(),
            dependency_policy: DependencyPolicy::default(),
            gui: false,
            reload_interval: default_reload_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn default_reload_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_log_level() -> String {
    "warn".to_string()
}
