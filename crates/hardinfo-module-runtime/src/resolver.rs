//! Dependency resolution between loaded modules
//!
//! Every module may declare the file names of modules it needs. The
//! resolver walks the loaded set until every declared dependency is part of
//! it, loading what is missing according to the [`DependencyPolicy`].

use crate::error::{ModuleRuntimeError, Result};
use crate::loader::ModuleLoader;
use crate::methods::MethodRegistry;
use crate::module::LoadedModule;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{info, warn};

pub use hardinfo_module_api::DependencyPolicy;

/// Asks the user whether a missing dependency may be loaded
#[cfg_attr(test, mockall::automock)]
pub trait DependencyPrompt {
    /// `module` is the display name of the dependent module, `dependency`
    /// the file name of the missing one
    fn confirm(&self, module: &str, dependency: &str) -> bool;
}

/// Completes a set of loaded modules with their dependencies
pub struct DependencyResolver<'a> {
    loader: &'a ModuleLoader,
    policy: DependencyPolicy,
    prompt: Option<&'a dyn DependencyPrompt>,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver loading through `loader`
    pub fn new(loader: &'a ModuleLoader, policy: DependencyPolicy) -> Self {
        Self {
            loader,
            policy,
            prompt: None,
        }
    }

    /// Use `prompt` for [`DependencyPolicy::Prompt`]
    pub fn with_prompt(mut self, prompt: Option<&'a dyn DependencyPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Resolve dependencies of `modules`
    ///
    /// Autoloaded dependencies are appended; dependencies loaded after a
    /// confirmation are prepended. Each file is loaded at most once, so
    /// cyclic declarations terminate. On failure every module of the set is
    /// released and its methods are unregistered from `methods`.
    pub fn resolve(
        &self,
        modules: Vec<LoadedModule>,
        methods: &mut MethodRegistry,
    ) -> Result<Vec<LoadedModule>> {
        let mut modules: VecDeque<LoadedModule> = modules.into();

        if let Err(e) = self.complete(&mut modules, methods) {
            for module in modules.drain(..) {
                methods.unregister_module(&module.file_name);
            }
            return Err(e);
        }

        let modules: Vec<LoadedModule> = modules.into();
        if let Some(cycle) = find_cycle(&modules) {
            warn!(cycle = %cycle.join(" -> "), "Dependency cycle between modules");
        }

        Ok(modules)
    }

    fn complete(
        &self,
        modules: &mut VecDeque<LoadedModule>,
        methods: &mut MethodRegistry,
    ) -> Result<()> {
        let mut pending: VecDeque<String> =
            modules.iter().map(|m| m.file_name.clone()).collect();
        let mut known: HashSet<String> = pending.iter().cloned().collect();

        while let Some(file_name) = pending.pop_front() {
            let Some(module) = modules.iter().find(|m| m.file_name == file_name) else {
                continue;
            };
            let name = module.name.clone();
            let dependencies = module.dependencies.clone();

            for dependency in dependencies {
                if known.contains(&dependency) {
                    continue;
                }

                let prepend = match self.policy {
                    DependencyPolicy::Autoload => false,
                    DependencyPolicy::Prompt => match self.prompt {
                        Some(prompt) if prompt.confirm(&name, &dependency) => true,
                        Some(_) => {
                            return Err(ModuleRuntimeError::dependency_declined(
                                &name,
                                &dependency,
                            ))
                        }
                        None => {
                            return Err(ModuleRuntimeError::dependency_missing(
                                &name,
                                &dependency,
                            ))
                        }
                    },
                    DependencyPolicy::Fail => {
                        return Err(ModuleRuntimeError::dependency_missing(&name, &dependency))
                    }
                };

                let loaded = self.loader.load(&dependency, methods).map_err(|source| {
                    ModuleRuntimeError::DependencyUnavailable {
                        module: name.clone(),
                        dependency: dependency.clone(),
                        source,
                    }
                })?;

                info!(module = %name, dependency = %dependency, "Dependency loaded");

                known.insert(dependency.clone());
                pending.push_back(dependency);
                if prepend {
                    modules.push_front(loaded);
                } else {
                    modules.push_back(loaded);
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for DependencyResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("loader", &self.loader)
            .field("policy", &self.policy)
            .field("prompt", &self.prompt.is_some())
            .finish()
    }
}

/// First dependency cycle among `modules`, as a closed path of file names
pub(crate) fn find_cycle(modules: &[LoadedModule]) -> Option<Vec<String>> {
    let graph: HashMap<&str, &[String]> = modules
        .iter()
        .map(|m| (m.file_name.as_str(), m.dependencies.as_slice()))
        .collect();

    let mut visited = HashSet::new();
    for module in modules {
        let mut stack = Vec::new();
        if let Some(cycle) = visit(&graph, &module.file_name, &mut visited, &mut stack) {
            return Some(cycle);
        }
    }
    None
}

fn visit<'g>(
    graph: &HashMap<&'g str, &'g [String]>,
    current: &'g str,
    visited: &mut HashSet<&'g str>,
    stack: &mut Vec<&'g str>,
) -> Option<Vec<String>> {
    if let Some(position) = stack.iter().position(|name| *name == current) {
        let mut cycle: Vec<String> = stack[position..].iter().map(|s| s.to_string()).collect();
        cycle.push(current.to_string());
        return Some(cycle);
    }
    if !visited.insert(current) {
        return None;
    }

    stack.push(current);
    if let Some(dependencies) = graph.get(current) {
        for dependency in dependencies.iter() {
            if let Some((name, _)) = graph.get_key_value(dependency.as_str()) {
                if let Some(cycle) = visit(graph, *name, visited, stack) {
                    return Some(cycle);
                }
            }
        }
    }
    stack.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardinfo_module_api::testing::{MockModule, StaticOpener};
    use std::rc::Rc;

    fn setup(opener: StaticOpener) -> (Rc<StaticOpener>, ModuleLoader) {
        let opener = Rc::new(opener);
        let loader = ModuleLoader::new(opener.clone(), "/modules");
        (opener, loader)
    }

    fn file_names(modules: &[LoadedModule]) -> Vec<&str> {
        modules.iter().map(LoadedModule::file_name).collect()
    }

    #[test]
    fn test_autoload_appends() {
        let (opener, loader) = setup(
            StaticOpener::new()
                .with_module("mem.so", MockModule::new("Memory").depends_on("cpu.so"))
                .with_module("cpu.so", MockModule::new("Processor")),
        );
        let mut methods = MethodRegistry::new();
        let mem = loader.load("mem.so", &mut methods).unwrap();

        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Autoload);
        let modules = resolver.resolve(vec![mem], &mut methods).unwrap();

        assert_eq!(file_names(&modules), vec!["mem.so", "cpu.so"]);
        assert_eq!(opener.open_count("cpu.so"), 1);
    }

    #[test]
    fn test_confirmed_dependency_is_prepended() {
        let (_, loader) = setup(
            StaticOpener::new()
                .with_module("mem.so", MockModule::new("Memory").depends_on("cpu.so"))
                .with_module("cpu.so", MockModule::new("Processor")),
        );
        let mut methods = MethodRegistry::new();
        let mem = loader.load("mem.so", &mut methods).unwrap();

        let mut prompt = MockDependencyPrompt::new();
        prompt
            .expect_confirm()
            .withf(|module: &str, dependency: &str| module == "Memory" && dependency == "cpu.so")
            .times(1)
            .return_const(true);

        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Prompt)
            .with_prompt(Some(&prompt));
        let modules = resolver.resolve(vec![mem], &mut methods).unwrap();

        assert_eq!(file_names(&modules), vec!["cpu.so", "mem.so"]);
    }

    #[test]
    fn test_declined_dependency_is_fatal() {
        let (opener, loader) = setup(
            StaticOpener::new()
                .with_module("mem.so", MockModule::new("Memory").depends_on("cpu.so"))
                .with_module("cpu.so", MockModule::new("Processor")),
        );
        let mut methods = MethodRegistry::new();
        let mem = loader.load("mem.so", &mut methods).unwrap();

        let mut prompt = MockDependencyPrompt::new();
        prompt.expect_confirm().times(1).return_const(false);

        let resolver = DependencyResolver::new(&loader, DependencyPolicy::Prompt)
            .with_prompt(Some(&prompt));
        let err = resolver.resolve(vec![mem], &mut methods).unwrap_err();

        assert!(matches!(err, ModuleRuntimeError::DependencyDeclined { .. }));
        assert_eq!(opener.open_count("cpu.so"), 0);
    }

    #[test]
    fn test_headless_without_autoload_is_fatal() {
        let (_, loader) = setup(
            StaticOpener::new()
                .with_module("mem.so", MockModule::new("Memory").depends_on("cpu.so")),
        );
        let mut methods = MethodRegistry::new();

        for policy in [DependencyPolicy::Prompt, DependencyPolicy::Fail] {
            let mem = loader.load("mem.so", &mut methods).unwrap();
            let err = DependencyResolver::new(&loader, policy)
                .resolve(vec![mem], &mut methods)
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Module \"Memory\" depends on module \"cpu.so\"."
            );
        }
    }

    #[test]
    fn test_unloadable_dependency() {
        let (opener, loader) = setup(
            StaticOpener::new()
                .with_module(
                    "mem.so",
                    MockModule::new("Memory")
                        .method("getMem")
                        .depends_on("cpu.so")
                        .depends_on("gone.so"),
                )
                .with_module("cpu.so", MockModule::new("Processor").method("getCPUDesc")),
        );
        let mut methods = MethodRegistry::new();
        let mem = loader.load("mem.so", &mut methods).unwrap();

        let err = DependencyResolver::new(&loader, DependencyPolicy::Autoload)
            .resolve(vec![mem], &mut methods)
            .unwrap_err();
        assert!(matches!(err, ModuleRuntimeError::DependencyUnavailable { .. }));

        // cpu.so was loaded before gone.so failed; nothing of the set survives
        assert_eq!(opener.open_count("cpu.so"), 1);
        assert!(methods.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let (opener, loader) = setup(
            StaticOpener::new()
                .with_module("a.so", MockModule::new("A").depends_on("b.so"))
                .with_module("b.so", MockModule::new("B").depends_on("a.so")),
        );
        let mut methods = MethodRegistry::new();
        let a = loader.load("a.so", &mut methods).unwrap();

        let modules = DependencyResolver::new(&loader, DependencyPolicy::Autoload)
            .resolve(vec![a], &mut methods)
            .unwrap();

        assert_eq!(file_names(&modules), vec!["a.so", "b.so"]);
        assert_eq!(opener.open_count("a.so"), 1);
        assert_eq!(opener.open_count("b.so"), 1);
        assert_eq!(
            find_cycle(&modules),
            Some(vec!["a.so".to_string(), "b.so".to_string(), "a.so".to_string()])
        );
    }

    #[test]
    fn test_no_cycle() {
        let (_, loader) = setup(
            StaticOpener::new()
                .with_module("a.so", MockModule::new("A").depends_on("b.so"))
                .with_module("b.so", MockModule::new("B")),
        );
        let mut methods = MethodRegistry::new();
        let a = loader.load("a.so", &mut methods).unwrap();
        let modules = DependencyResolver::new(&loader, DependencyPolicy::Autoload)
            .resolve(vec![a], &mut methods)
            .unwrap();

        assert_eq!(find_cycle(&modules), None);
    }
}
