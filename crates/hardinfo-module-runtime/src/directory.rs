//! Modules directory scanning

use crate::error::{ModuleRuntimeError, Result};
use crate::loader::ModuleLoader;
use crate::methods::MethodRegistry;
use crate::module::LoadedModule;
use crate::resolver::DependencyResolver;
use std::fs;
use tracing::{debug, info, warn};

/// Produces the ordered list of modules from the modules directory
#[derive(Debug)]
pub struct ModuleDirectory<'a> {
    loader: &'a ModuleLoader,
    resolver: DependencyResolver<'a>,
}

impl<'a> ModuleDirectory<'a> {
    /// Create a directory loader
    pub fn new(loader: &'a ModuleLoader, resolver: DependencyResolver<'a>) -> Self {
        Self { loader, resolver }
    }

    /// Candidate file names carrying the opener's suffix, sorted by name
    ///
    /// A missing or unreadable directory yields no candidates.
    pub fn candidates(&self) -> Vec<String> {
        let dir = self.loader.modules_dir();
        let suffix = self.loader.opener().suffix();

        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Cannot read modules directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(suffix))
            .collect();
        names.sort();
        names
    }

    /// Load every module in the directory
    pub fn load_all(&self, methods: &mut MethodRegistry) -> Result<Vec<LoadedModule>> {
        self.load(None, methods)
    }

    /// Load the named modules; an empty list loads everything
    pub fn load_selected(
        &self,
        file_names: &[String],
        methods: &mut MethodRegistry,
    ) -> Result<Vec<LoadedModule>> {
        self.load(Some(file_names), methods)
    }

    /// Load every candidate, or only those named in `filter`
    ///
    /// An absent or empty filter loads everything. Files that fail to load
    /// are skipped. Dependencies are resolved before the list is sorted by
    /// ascending weight; modules of equal weight keep their order.
    pub fn load(
        &self,
        filter: Option<&[String]>,
        methods: &mut MethodRegistry,
    ) -> Result<Vec<LoadedModule>> {
        let filter = filter.filter(|names| !names.is_empty());

        let mut modules = Vec::new();
        for file_name in self.candidates() {
            if let Some(names) = filter {
                if !names.iter().any(|name| *name == file_name) {
                    debug!(module = %file_name, "Module not selected");
                    continue;
                }
            }

            if let Ok(module) = self.loader.load(&file_name, methods) {
                modules.push(module);
            }
        }

        if modules.is_empty() {
            return Err(match filter {
                Some(_) => ModuleRuntimeError::NoModulesSelected,
                None => ModuleRuntimeError::NoModules {
                    path: self.loader.modules_dir().to_path_buf(),
                },
            });
        }

        let mut modules = self.resolver.resolve(modules, methods)?;
        modules.sort_by_key(LoadedModule::weight);

        info!(count = modules.len(), "Modules loaded");
        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::DependencyPolicy;
    use hardinfo_module_api::testing::{MockModule, StaticOpener};
    use std::rc::Rc;

    #[test]
    fn test_candidates_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["mem.so", "cpu.so", "README", "cpu.so.bak"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let loader = ModuleLoader::new(Rc::new(StaticOpener::new()), dir.path());
        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Fail);
        let directory = ModuleDirectory::new(&loader, resolver);

        assert_eq!(directory.candidates(), vec!["cpu.so", "mem.so"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("modules");

        let loader = ModuleLoader::new(Rc::new(StaticOpener::new()), &missing);
        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Fail);
        let directory = ModuleDirectory::new(&loader, resolver);

        assert!(directory.candidates().is_empty());
        let err = directory.load_all(&mut MethodRegistry::new()).unwrap_err();
        assert!(matches!(err, ModuleRuntimeError::NoModules { path } if path == missing));
    }

    #[test]
    fn test_filter_selects_modules() {
        let dir = tempfile::tempdir().unwrap();
        let opener = StaticOpener::new()
            .with_module("cpu.so", MockModule::new("Processor"))
            .with_module("mem.so", MockModule::new("Memory"));
        opener.materialize(dir.path()).unwrap();
        let opener = Rc::new(opener);

        let loader = ModuleLoader::new(opener.clone(), dir.path());
        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Fail);
        let directory = ModuleDirectory::new(&loader, resolver);

        let filter = vec!["mem.so".to_string()];
        let modules = directory
            .load(Some(filter.as_slice()), &mut MethodRegistry::new())
            .unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name(), "Memory");
        assert_eq!(opener.open_count("cpu.so"), 0);

        let empty: Vec<String> = Vec::new();
        let modules = directory
            .load(Some(empty.as_slice()), &mut MethodRegistry::new())
            .unwrap();
        assert_eq!(modules.len(), 2);
    }

    #[test]
    fn test_missing_dependency_leaves_no_methods() {
        let dir = tempfile::tempdir().unwrap();
        let opener = StaticOpener::new()
            .with_module(
                "mem.so",
                MockModule::new("Memory").method("getMem").depends_on("cpu.so"),
            )
            .with_module("cpu.so", MockModule::new("Processor").method("getCPUDesc"));
        opener.materialize(dir.path()).unwrap();

        let loader = ModuleLoader::new(Rc::new(opener), dir.path());
        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Fail);
        let directory = ModuleDirectory::new(&loader, resolver);

        let mut methods = MethodRegistry::new();
        let filter = vec!["mem.so".to_string()];
        let err = directory
            .load(Some(filter.as_slice()), &mut methods)
            .unwrap_err();

        assert!(matches!(err, ModuleRuntimeError::DependencyMissing { .. }));
        assert!(methods.is_empty());
    }

    #[test]
    fn test_filter_matching_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let opener = StaticOpener::new().with_module("cpu.so", MockModule::new("Processor"));
        opener.materialize(dir.path()).unwrap();

        let loader = ModuleLoader::new(Rc::new(opener), dir.path());
        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Fail);
        let directory = ModuleDirectory::new(&loader, resolver);

        let filter = vec!["nonexistent.so".to_string()];
        let err = directory
            .load(Some(filter.as_slice()), &mut MethodRegistry::new())
            .unwrap_err();
        assert!(matches!(err, ModuleRuntimeError::NoModulesSelected));
    }
}
