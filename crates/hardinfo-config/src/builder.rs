//! Configuration builder

use crate::types::{Config, LogFormat};
use hardinfo_core::Result;
use hardinfo_module_api::DependencyPolicy;
use std::path::PathBuf;

/// Builder for constructing configuration programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the library directory
    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.paths.lib_dir = Some(dir.into());
        self
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.paths.data_dir = Some(dir.into());
        self
    }

    /// Replace the module list; an empty list keeps the configured one
    pub fn modules(mut self, modules: Vec<String>) -> Self {
        if !modules.is_empty() {
            self.config.modules.load = modules;
        }
        self
    }

    /// Set the dependency policy
    pub fn dependency_policy(mut self, policy: DependencyPolicy) -> Self {
        self.config.modules.dependency_policy = policy;
        self
    }

    /// Set whether a GUI shell is attached
    pub fn gui(mut self, gui: bool) -> Self {
        self.config.modules.gui = gui;
        self
    }

    /// Set the log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Set the log format
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<Config> {
        crate::validator::validate_config(&self.config)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .lib_dir("/usr/lib/hardinfo")
            .modules(vec!["cpu.so".to_string()])
            .dependency_policy(DependencyPolicy::Autoload)
            .log_level("debug")
            .build()
            .unwrap();

        assert_eq!(config.paths.lib_dir, Some(PathBuf::from("/usr/lib/hardinfo")));
        assert_eq!(config.modules.load, vec!["cpu.so"]);
        assert_eq!(config.modules.dependency_policy, DependencyPolicy::Autoload);
    }

    #[test]
    fn test_empty_module_list_keeps_configured() {
        let mut base = Config::default();
        base.modules.load = vec!["mem.so".to_string()];

        let config = ConfigBuilder::from_config(base)
            .modules(Vec::new())
            .build()
            .unwrap();
        assert_eq!(config.modules.load, vec!["mem.so"]);
    }

    #[test]
    fn test_builder_validates() {
        let result = ConfigBuilder::new().log_level("").build();
        assert!(result.is_err());
    }
}
