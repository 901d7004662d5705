//! Subcommand handlers

use crate::{module_file_name, Commands};
use anyhow::{bail, Result};
use hardinfo_config::Config;
use hardinfo_module_runtime::{LoadedModule, ModuleAbout, ModuleManager, ModuleStats};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct ModuleSummary<'a> {
    file_name: &'a str,
    name: &'a str,
    weight: i32,
    dependencies: &'a [String],
    entries: Vec<&'a str>,
    methods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    about: Option<&'a ModuleAbout>,
}

impl<'a> From<&'a LoadedModule> for ModuleSummary<'a> {
    fn from(module: &'a LoadedModule) -> Self {
        Self {
            file_name: module.file_name(),
            name: module.name(),
            weight: module.weight(),
            dependencies: module.dependencies(),
            entries: module.entries().iter().map(|e| e.name()).collect(),
            methods: module.method_count(),
            about: module.about(),
        }
    }
}

#[derive(Serialize)]
struct Listing<'a> {
    modules: Vec<ModuleSummary<'a>>,
    stats: ModuleStats,
}

pub(crate) async fn run(command: Commands, manager: &ModuleManager, config: &Config) -> Result<()> {
    let mut out = io::stdout().lock();

    match command {
        Commands::List { json } => list(&mut out, manager, json),
        Commands::Call { key, param } => call(&mut out, manager, &key, param.as_deref()),
        Commands::About { module } => about(&mut out, manager, &module),
        Commands::Scan {
            module,
            entry,
            reload,
            watch,
            count,
        } => {
            let file_name = module_file_name(manager, &module)?;
            let rounds = if watch { count } else { Some(1) };

            let mut round = 0;
            loop {
                scan(&mut out, manager, &file_name, entry, reload || round > 0)?;
                round += 1;

                if rounds.is_some_and(|rounds| round >= rounds) {
                    break;
                }
                tokio::time::sleep(config.modules.reload_interval).await;
            }
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn list(out: &mut impl Write, manager: &ModuleManager, json: bool) -> Result<()> {
    let modules: Vec<_> = manager.modules().iter().map(ModuleSummary::from).collect();

    if json {
        let listing = Listing {
            modules,
            stats: manager.stats(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    writeln!(out, "{:<20} {:<16} {:>6}  Description", "Module", "File", "Weight")?;
    for module in &modules {
        let description = module
            .about
            .and_then(|about| about.description.as_deref())
            .unwrap_or("");
        writeln!(
            out,
            "{:<20} {:<16} {:>6}  {}",
            module.name, module.file_name, module.weight, description
        )?;
    }

    let stats = manager.stats();
    writeln!(
        out,
        "\n{} modules, {} entries, {} methods",
        stats.modules, stats.entries, stats.methods
    )?;

    Ok(())
}

fn call(out: &mut impl Write, manager: &ModuleManager, key: &str, param: Option<&str>) -> Result<()> {
    if !manager.methods().contains(key) {
        bail!("Method \"{key}\" is not registered");
    }

    let value = match param {
        Some(param) => manager.call_method_param(key, param),
        None => manager.call_method(key),
    };

    match value {
        Some(value) => writeln!(out, "{value}")?,
        None => tracing::warn!(key, "Method returned nothing"),
    }

    Ok(())
}

fn about(out: &mut impl Write, manager: &ModuleManager, module: &str) -> Result<()> {
    let file_name = module_file_name(manager, module)?;
    let Some(module) = manager.find_module(&file_name) else {
        bail!("Module \"{file_name}\" is not loaded");
    };

    writeln!(out, "{} ({})", module.name(), module.file_name())?;

    if let Some(about) = module.about() {
        for (label, value) in [
            ("Description", &about.description),
            ("Author", &about.author),
            ("Version", &about.version),
            ("License", &about.license),
        ] {
            if let Some(value) = value {
                writeln!(out, "  {label}: {value}")?;
            }
        }
    }

    if !module.dependencies().is_empty() {
        writeln!(out, "  Depends on: {}", module.dependencies().join(", "))?;
    }

    Ok(())
}

fn scan(
    out: &mut impl Write,
    manager: &ModuleManager,
    file_name: &str,
    only: Option<usize>,
    reload: bool,
) -> Result<()> {
    let entries = match only {
        Some(number) => std::slice::from_ref(manager.entry(file_name, number)?),
        None => {
            if !reload {
                manager.scan_all(file_name)?;
            }
            manager
                .find_module(file_name)
                .map(LoadedModule::entries)
                .unwrap_or_default()
        }
    };

    for entry in entries {
        if reload {
            entry.reload();
        } else if only.is_some() {
            entry.scan();
        }

        writeln!(out, "[{}]", entry.name())?;
        if let Some(report) = entry.function() {
            writeln!(out, "{report}")?;
        }
        if let Some(note) = entry.note() {
            writeln!(out, "Note: {note}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}
