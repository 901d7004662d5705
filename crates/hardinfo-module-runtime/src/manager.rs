//! Module manager for high-level module operations

use crate::directory::ModuleDirectory;
use crate::error::{ModuleRuntimeError, Result};
use crate::loader::ModuleLoader;
use crate::methods::MethodRegistry;
use crate::module::{LoadedModule, ModuleEntry};
use crate::resolver::{DependencyPolicy, DependencyPrompt, DependencyResolver};
use crate::shell::{HeadlessShell, ShellCollaborator};
use hardinfo_module_api::{ModuleAbout, ModuleOpener};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Settings for a [`ModuleManager`]
#[derive(Debug, Clone)]
pub struct ModuleSettings {
    /// Directory modules are loaded from
    pub modules_dir: PathBuf,

    /// Whether a GUI is running; enables module icons
    pub gui_running: bool,

    /// Handling of missing dependencies
    pub policy: DependencyPolicy,
}

impl ModuleSettings {
    /// Settings for `modules_dir` with the default policy
    pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            gui_running: false,
            policy: DependencyPolicy::default(),
        }
    }

    /// Set the dependency policy
    pub fn policy(mut self, policy: DependencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set whether a GUI is running
    pub fn gui_running(mut self, gui_running: bool) -> Self {
        self.gui_running = gui_running;
        self
    }
}

/// Counts over the loaded module set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    /// Loaded modules
    pub modules: usize,

    /// Entries across all modules
    pub entries: usize,

    /// Registered methods
    pub methods: usize,
}

/// Owns the loaded modules and the method registry
///
/// Loading replaces the current set wholesale. [`ModuleManager::unload_all`]
/// releases every module and tells the shell to drop its module state.
pub struct ModuleManager {
    loader: ModuleLoader,
    policy: DependencyPolicy,
    prompt: Option<Box<dyn DependencyPrompt>>,
    shell: Box<dyn ShellCollaborator>,
    methods: MethodRegistry,
    modules: Vec<LoadedModule>,
    selected: Option<(String, usize)>,
}

impl ModuleManager {
    /// Create a manager opening modules through `opener`
    pub fn new(opener: Rc<dyn ModuleOpener>, settings: ModuleSettings) -> Self {
        let loader =
            ModuleLoader::new(opener, settings.modules_dir).gui_running(settings.gui_running);

        Self {
            loader,
            policy: settings.policy,
            prompt: None,
            shell: Box::new(HeadlessShell),
            methods: MethodRegistry::new(),
            modules: Vec::new(),
            selected: None,
        }
    }

    /// Ask `prompt` before loading missing dependencies
    pub fn with_prompt(mut self, prompt: Box<dyn DependencyPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Report to `shell` instead of the log
    pub fn with_shell(mut self, shell: Box<dyn ShellCollaborator>) -> Self {
        self.shell = shell;
        self
    }

    /// Load every module in the modules directory
    pub fn load_all(&mut self) -> Result<&[LoadedModule]> {
        self.load(None)
    }

    /// Load the named modules; an empty list loads everything
    pub fn load_selected(&mut self, file_names: &[String]) -> Result<&[LoadedModule]> {
        self.load(Some(file_names))
    }

    fn load(&mut self, filter: Option<&[String]>) -> Result<&[LoadedModule]> {
        if !self.modules.is_empty() {
            self.unload_all();
        }

        let resolver = DependencyResolver::new(&self.loader, self.policy)
            .with_prompt(self.prompt.as_deref());
        let directory = ModuleDirectory::new(&self.loader, resolver);

        self.modules = directory.load(filter, &mut self.methods)?;
        Ok(&self.modules)
    }

    /// Release every module
    ///
    /// Methods are unregistered and entries dropped before each module's
    /// handle is closed.
    pub fn unload_all(&mut self) {
        let count = self.modules.len();

        for module in self.modules.drain(..) {
            self.methods.unregister_module(&module.file_name);
            drop(module);
        }
        self.selected = None;

        self.shell.remove_ui_merges();
        self.shell.clear_sync_entries();
        self.shell.clear_timeouts();
        self.shell.clear_tree_models();
        self.shell.reset_title();

        info!(count, "Modules unloaded");
    }

    /// Loaded modules, ordered by weight
    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    /// Loaded module by file name
    pub fn find_module(&self, file_name: &str) -> Option<&LoadedModule> {
        self.modules.iter().find(|m| m.file_name == file_name)
    }

    fn module(&self, file_name: &str) -> Result<&LoadedModule> {
        self.find_module(file_name)
            .ok_or_else(|| ModuleRuntimeError::not_found(file_name))
    }

    /// Entry `number` of the module at `file_name`
    pub fn entry(&self, file_name: &str, number: usize) -> Result<&ModuleEntry> {
        self.module(file_name)?
            .entry(number)
            .ok_or_else(|| ModuleRuntimeError::EntryNotFound {
                module: file_name.to_string(),
                entry: number,
            })
    }

    /// Mutable entry `number` of the module at `file_name`
    pub fn entry_mut(&mut self, file_name: &str, number: usize) -> Result<&mut ModuleEntry> {
        self.modules
            .iter_mut()
            .find(|m| m.file_name == file_name)
            .ok_or_else(|| ModuleRuntimeError::not_found(file_name))?
            .entry_mut(number)
            .ok_or_else(|| ModuleRuntimeError::EntryNotFound {
                module: file_name.to_string(),
                entry: number,
            })
    }

    /// The method registry
    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Call `"<module>::<method>"` without a parameter
    pub fn call_method(&self, key: &str) -> Option<String> {
        self.methods.call(key)
    }

    /// Call `"<module>::<method>"` with a parameter
    pub fn call_method_param(&self, key: &str, param: &str) -> Option<String> {
        self.methods.call_with_param(key, param)
    }

    /// About information of a loaded module
    pub fn module_about(&self, file_name: &str) -> Option<&ModuleAbout> {
        self.find_module(file_name).and_then(LoadedModule::about)
    }

    /// Scan every entry of a module
    pub fn scan_all(&self, file_name: &str) -> Result<()> {
        self.scan_all_except(file_name, None)
    }

    /// Scan every entry of a module except entry `except`
    ///
    /// The module view is disabled while scanning and a status line is
    /// shown per entry.
    pub fn scan_all_except(&self, file_name: &str, except: Option<usize>) -> Result<()> {
        let module = self.module(file_name)?;

        self.shell.set_view_enabled(false);
        for entry in module.entries() {
            if Some(entry.number()) == except {
                continue;
            }
            self.shell
                .status_update(&format!("Scanning: {}...", entry.name()));
            entry.scan();
        }
        self.shell.set_view_enabled(true);
        self.shell.status_update("Done.");

        Ok(())
    }

    /// Make an entry the current one
    pub fn select(&mut self, file_name: &str, number: usize) -> Result<&ModuleEntry> {
        self.entry(file_name, number)?;
        self.selected = Some((file_name.to_string(), number));
        self.entry(file_name, number)
    }

    /// The current entry with its module
    pub fn selected(&self) -> Option<(&LoadedModule, &ModuleEntry)> {
        let (file_name, number) = self.selected.as_ref()?;
        let module = self.find_module(file_name)?;
        Some((module, module.entry(*number)?))
    }

    /// Counts over the loaded set
    pub fn stats(&self) -> ModuleStats {
        ModuleStats {
            modules: self.modules.len(),
            entries: self.modules.iter().map(|m| m.entries.len()).sum(),
            methods: self.methods.len(),
        }
    }
}

impl fmt::Debug for ModuleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleManager")
            .field("loader", &self.loader)
            .field("policy", &self.policy)
            .field("methods", &self.methods)
            .field("modules", &self.modules)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}
