//! Loading a real shared object through the dynamic backend

#![cfg(all(target_os = "linux", feature = "dynamic-loading"))]

use hardinfo_module_runtime::prelude::*;
use hardinfo_module_runtime::DynamicOpener;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tempfile::TempDir;

/// Most recently built `example-system` object in the target directory
fn built_object() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    let prefix = format!("{DLL_PREFIX}example_system");

    let mut found: Vec<(SystemTime, PathBuf)> = [deps, deps.parent().unwrap()]
        .into_iter()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX))
        })
        .filter_map(|path| Some((fs::metadata(&path).ok()?.modified().ok()?, path)))
        .collect();

    found.sort();
    found
        .pop()
        .map(|(_, path)| path)
        .unwrap_or_else(|| panic!("no {prefix}*{DLL_SUFFIX} next to {}", deps.display()))
}

fn install(dir: &Path) {
    fs::copy(built_object(), dir.join(format!("system{DLL_SUFFIX}"))).unwrap();
}

fn setup() -> (TempDir, ModuleManager) {
    let dir = tempfile::tempdir().unwrap();
    install(dir.path());

    let manager = ModuleManager::new(
        Rc::new(DynamicOpener),
        ModuleSettings::new(dir.path()).policy(DependencyPolicy::Fail),
    );
    (dir, manager)
}

fn file_name() -> String {
    format!("system{DLL_SUFFIX}")
}

#[test]
fn test_shared_object_capabilities() {
    let (_dir, mut manager) = setup();
    manager.load_all().unwrap();

    let module = manager.find_module(&file_name()).unwrap();
    assert_eq!(module.name(), "System");
    assert_eq!(module.weight(), 50);
    assert!(module.dependencies().is_empty());

    let entries: Vec<&str> = module.entries().iter().map(ModuleEntry::name).collect();
    assert_eq!(entries, vec!["Uptime", "Memory", "Kernel"]);
    assert_eq!(module.entries()[2].icon(), Some("os.png"));

    assert_eq!(
        manager.methods().keys(),
        vec!["system::getKernel", "system::getMemoryTotal", "system::getUptime"]
    );

    let about = manager.module_about(&file_name()).unwrap();
    assert_eq!(about.author.as_deref(), Some("HardInfo Developers"));
    assert_eq!(about.license.as_deref(), Some("GPL-2.0-only"));
}

#[test]
fn test_methods_and_entries_call_into_object() {
    let (_dir, mut manager) = setup();
    manager.load_all().unwrap();

    let kernel = fs::read_to_string("/proc/sys/kernel/osrelease").unwrap();
    assert_eq!(
        manager.call_method("system::getKernel").as_deref(),
        Some(kernel.trim())
    );
    assert_eq!(
        manager.call_method_param("system::getKernel", "ignored").as_deref(),
        Some(kernel.trim())
    );

    let entry = manager.entry(&file_name(), 2).unwrap();
    entry.reload();
    assert_eq!(entry.function().as_deref(), Some(kernel.trim()));
}

#[test]
fn test_reload_reopens_object() {
    let (_dir, mut manager) = setup();
    manager.load_all().unwrap();

    // The first set is closed before the object is opened again
    manager.load_all().unwrap();
    assert!(manager.call_method("system::getUptime").is_some());
}

#[test]
fn test_unload_leaves_nothing_registered() {
    let (_dir, mut manager) = setup();
    manager.load_all().unwrap();
    assert_eq!(manager.methods().len(), 3);

    manager.unload_all();

    assert!(manager.modules().is_empty());
    assert!(manager.methods().is_empty());
    assert_eq!(manager.call_method("system::getKernel"), None);
}
