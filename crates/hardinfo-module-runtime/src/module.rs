//! Loaded module and entry records

use hardinfo_module_api::{
    EntryFn, FieldFn, ModuleAbout, ModuleInterface, NoteFn, ScanFn,
};
use std::fmt;
use tokio::task::AbortHandle;

/// One entry of a loaded module
///
/// Pending background work registered with [`ModuleEntry::attach_task`] is
/// aborted when the entry is dropped.
pub struct ModuleEntry {
    pub(crate) name: String,
    pub(crate) number: usize,
    pub(crate) icon: Option<String>,
    pub(crate) callback: Option<EntryFn>,
    pub(crate) scan: Option<ScanFn>,
    pub(crate) more_info: Option<FieldFn>,
    pub(crate) field: Option<FieldFn>,
    pub(crate) note: Option<NoteFn>,
    pub(crate) tasks: Vec<AbortHandle>,
}

impl ModuleEntry {
    /// Entry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position within the module, starting at 0
    pub fn number(&self) -> usize {
        self.number
    }

    /// Icon file name
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Run the scan callback
    pub fn scan(&self) {
        if let Some(scan) = &self.scan {
            scan(false);
        }
    }

    /// Run the scan callback, forcing a refresh
    pub fn reload(&self) {
        if let Some(scan) = &self.scan {
            scan(true);
        }
    }

    /// Run the default action
    pub fn function(&self) -> Option<String> {
        self.callback.as_ref().and_then(|callback| callback())
    }

    /// Look up a field value
    pub fn field(&self, field: &str) -> Option<String> {
        self.field.as_ref().and_then(|lookup| lookup(field))
    }

    /// Look up extended information about a field
    pub fn more_info(&self, field: &str) -> Option<String> {
        self.more_info.as_ref().and_then(|lookup| lookup(field))
    }

    /// Note shown below the entry
    pub fn note(&self) -> Option<String> {
        self.note.as_ref().and_then(|note| note(self.number))
    }

    /// Tie a background task to this entry's lifetime
    pub fn attach_task(&mut self, task: AbortHandle) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(task);
    }

    /// Number of attached tasks that have not finished
    pub fn pending_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for ModuleEntry {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("number", &self.number)
            .field("icon", &self.icon)
            .field("scan", &self.scan.is_some())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// A module that was opened and initialised
pub struct LoadedModule {
    pub(crate) file_name: String,
    pub(crate) name: String,
    pub(crate) weight: i32,
    pub(crate) icon: Option<String>,
    pub(crate) about: Option<ModuleAbout>,
    pub(crate) dependencies: Vec<String>,
    pub(crate) methods: usize,
    // Entries must drop before the handle that backs their callbacks.
    pub(crate) entries: Vec<ModuleEntry>,
    pub(crate) handle: Box<dyn ModuleInterface>,
}

impl LoadedModule {
    /// File name inside the modules directory
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sort key, 0 when the module does not provide one
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Module icon; only resolved when a GUI is running
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Descriptive information
    pub fn about(&self) -> Option<&ModuleAbout> {
        self.about.as_ref()
    }

    /// Declared dependencies, by file name
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Number of methods this module registered
    pub fn method_count(&self) -> usize {
        self.methods
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    /// Entry by index
    pub fn entry(&self, number: usize) -> Option<&ModuleEntry> {
        self.entries.get(number)
    }

    /// Mutable entry by index
    pub fn entry_mut(&mut self, number: usize) -> Option<&mut ModuleEntry> {
        self.entries.get_mut(number)
    }

    /// Underlying capability handle
    pub fn handle(&self) -> &dyn ModuleInterface {
        self.handle.as_ref()
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("file_name", &self.file_name)
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("dependencies", &self.dependencies)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
