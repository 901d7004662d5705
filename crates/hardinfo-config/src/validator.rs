//! Configuration validation

use crate::{Config, LoggingConfig, ModulesConfig, PathsConfig};
use hardinfo_core::{Error, Result};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_paths(&config.paths)?;
    validate_modules(&config.modules)?;
    validate_logging(&config.logging)?;

    Ok(())
}

fn validate_paths(paths: &PathsConfig) -> Result<()> {
    for (key, dir) in [("data_dir", &paths.data_dir), ("lib_dir", &paths.lib_dir)] {
        let Some(dir) = dir else {
            continue;
        };

        if dir.as_os_str().is_empty() {
            return Err(Error::config(format!("paths.{key} cannot be empty")));
        }

        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "paths.{key} is not a directory");
        }
    }

    Ok(())
}

fn validate_modules(modules: &ModulesConfig) -> Result<()> {
    for name in &modules.load {
        if name.is_empty() {
            return Err(Error::config("module names cannot be empty"));
        }

        if name.contains('/') {
            return Err(Error::config(format!(
                "module '{name}' must be a file name inside the modules directory"
            )));
        }
    }

    if modules.reload_interval.is_zero() {
        return Err(Error::config("modules.reload_interval must be > 0"));
    }

    if modules.reload_interval.as_secs() > 300 {
        tracing::warn!("modules.reload_interval is very high (>5 minutes)");
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<()> {
    let level = logging.level.trim();

    if level.is_empty() {
        return Err(Error::config("logging.level cannot be empty"));
    }

    // Anything with a target or a list is passed to the filter as is
    let directive = level.contains('=') || level.contains(',');
    if !directive && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(Error::config(format!(
            "Invalid log level: {level} (must be one of {})",
            LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}
