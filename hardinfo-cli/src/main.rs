//! HardInfo CLI

mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hardinfo_config::{find_config, load_config, Config, ConfigBuilder, LogFormat, LoggingConfig};
use hardinfo_core::paths::{ensure_config_dir, RuntimePaths};
use hardinfo_module_runtime::{
    DependencyPolicy, DynamicOpener, ModuleManager, ModuleRuntimeError, ModuleSettings,
};
use prompt::TerminalPrompt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hardinfo")]
#[command(about = "System information and benchmark tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "HARDINFO_CONFIG")]
    config: Option<PathBuf>,

    /// Only load this module (repeatable)
    #[arg(short = 'm', long = "load-module", value_name = "FILE", global = true)]
    load_module: Vec<String>,

    /// Load module dependencies without asking
    #[arg(short, long, global = true)]
    autoload_deps: bool,

    /// Ask before loading a module dependency
    #[arg(long, global = true, conflicts_with = "autoload_deps")]
    interactive: bool,

    /// Library directory holding the modules subdirectory
    #[arg(long, global = true, env = "HARDINFO_LIB_DIR")]
    lib_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded modules
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call an exported method (`module::method`)
    Call {
        /// Method key
        key: String,

        /// Optional parameter
        param: Option<String>,
    },

    /// Scan a module and print its entries
    Scan {
        /// Module file or display name
        module: String,

        /// Only this entry number
        #[arg(short, long)]
        entry: Option<usize>,

        /// Force a refresh
        #[arg(short, long)]
        reload: bool,

        /// Keep rescanning at the configured interval
        #[arg(short, long)]
        watch: bool,

        /// Stop watching after this many rounds
        #[arg(short = 'n', long, requires = "watch")]
        count: Option<u32>,
    },

    /// Show information about a module
    About {
        /// Module file or display name
        module: String,
    },

    /// Show version information
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("HardInfo");
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
        return Ok(());
    }

    let config = load_settings(&cli)?;
    init_tracing(&config.logging)?;

    let paths = runtime_paths(&config)?;
    tracing::debug!(
        data = %paths.data.display(),
        lib = %paths.lib.display(),
        "Runtime paths"
    );

    let mut manager = build_manager(&config, &paths);

    if let Err(e) = manager.load_selected(&config.modules.load) {
        if e.is_fatal() {
            tracing::debug!(error = ?e, "Cannot load modules");
            eprintln!("{e}");
            std::process::exit(1);
        }
        return Err(e.into());
    }

    let result = commands::run(cli.command, &manager, &config).await;
    manager.unload_all();
    result
}

/// Read the configuration file and apply command line overrides
fn load_settings(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => ensure_config_dir().ok().and_then(|dir| find_config(&dir)),
    };

    let config = match path {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    let mut builder = ConfigBuilder::from_config(config).modules(cli.load_module.clone());

    if cli.autoload_deps {
        builder = builder.dependency_policy(DependencyPolicy::Autoload);
    } else if cli.interactive {
        builder = builder.dependency_policy(DependencyPolicy::Prompt);
    }

    if let Some(dir) = &cli.lib_dir {
        builder = builder.lib_dir(dir);
    }

    if let Some(level) = &cli.log_level {
        builder = builder.log_level(level);
    }

    Ok(builder.build()?)
}

/// Configured directories win over discovery
fn runtime_paths(config: &Config) -> Result<RuntimePaths> {
    let paths = &config.paths;

    if let (Some(data), Some(lib)) = (&paths.data_dir, &paths.lib_dir) {
        return Ok(RuntimePaths::new(data, lib));
    }

    match (RuntimePaths::discover(paths.try_hardcoded), &paths.lib_dir) {
        (Ok(mut found), lib) => {
            if let Some(data) = &paths.data_dir {
                found.data = data.clone();
            }
            if let Some(lib) = lib {
                found.lib = lib.clone();
            }
            Ok(found)
        }
        (Err(e), Some(lib)) => {
            tracing::warn!(error = %e, "Using configured library directory without runtime data");
            let data = paths
                .data_dir
                .clone()
                .unwrap_or_else(|| RuntimePaths::hardcoded().data);
            Ok(RuntimePaths::new(data, lib))
        }
        (Err(e), None) => Err(e.into()),
    }
}

fn build_manager(config: &Config, paths: &RuntimePaths) -> ModuleManager {
    let policy = config.modules.dependency_policy;
    let settings = ModuleSettings::new(paths.modules_dir())
        .policy(policy)
        .gui_running(config.modules.gui);

    let manager = ModuleManager::new(Rc::new(DynamicOpener), settings);

    // Without a terminal nobody can answer, missing dependencies are errors
    if policy == DependencyPolicy::Prompt && std::io::stdin().is_terminal() {
        manager.with_prompt(Box::new(TerminalPrompt::stdio()))
    } else {
        manager
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(logging.level.to_lowercase())?,
    };

    let (text, json) = match logging.format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();

    Ok(())
}

/// Map a module file or display name to its file name
fn module_file_name(manager: &ModuleManager, module: &str) -> Result<String, ModuleRuntimeError> {
    if manager.find_module(module).is_some() {
        return Ok(module.to_string());
    }

    manager
        .modules()
        .iter()
        .find(|m| m.name().eq_ignore_ascii_case(module))
        .map(|m| m.file_name().to_string())
        .ok_or_else(|| ModuleRuntimeError::not_found(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "hardinfo", "-m", "cpu.so", "-m", "mem.so", "-a", "list", "--json",
        ])
        .unwrap();

        assert_eq!(cli.load_module, vec!["cpu.so", "mem.so"]);
        assert!(cli.autoload_deps);
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn test_autoload_conflicts_with_interactive() {
        let result = Cli::try_parse_from(["hardinfo", "-a", "--interactive", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_has_no_short_flag() {
        assert!(Cli::try_parse_from(["hardinfo", "-l", "debug", "list"]).is_err());

        let cli = Cli::try_parse_from(["hardinfo", "list", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_count_requires_watch() {
        assert!(Cli::try_parse_from(["hardinfo", "scan", "cpu.so", "-n", "2"]).is_err());

        let cli = Cli::try_parse_from(["hardinfo", "scan", "cpu.so", "-w", "-n", "2"]).unwrap();
        match cli.command {
            Commands::Scan { module, watch, count, .. } => {
                assert_eq!(module, "cpu.so");
                assert!(watch);
                assert_eq!(count, Some(2));
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[modules]\ndependency_policy = \"fail\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "hardinfo",
            "-c",
            path.to_str().unwrap(),
            "-a",
            "--log-level",
            "debug",
            "list",
        ])
        .unwrap();
        let config = load_settings(&cli).unwrap();

        assert_eq!(config.modules.dependency_policy, DependencyPolicy::Autoload);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_configured_paths_skip_discovery() {
        let mut config = Config::default();
        config.paths.data_dir = Some(PathBuf::from("/srv/data"));
        config.paths.lib_dir = Some(PathBuf::from("/srv/lib"));

        let paths = runtime_paths(&config).unwrap();
        assert_eq!(paths.modules_dir(), PathBuf::from("/srv/lib/modules"));
    }
}
