//! Loading a single module file

use crate::methods::MethodRegistry;
use crate::module::{LoadedModule, ModuleEntry};
use hardinfo_module_api::{ModuleError, ModuleOpener};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Opens module files from one directory
///
/// Loading is all-or-nothing: a file that cannot be opened or lacks a
/// mandatory capability produces no record, and none of its methods are
/// registered.
#[derive(Clone)]
pub struct ModuleLoader {
    opener: Rc<dyn ModuleOpener>,
    modules_dir: PathBuf,
    gui_running: bool,
}

impl ModuleLoader {
    /// Create a loader for `modules_dir`
    pub fn new(opener: Rc<dyn ModuleOpener>, modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            opener,
            modules_dir: modules_dir.into(),
            gui_running: false,
        }
    }

    /// Resolve module icons
    pub fn gui_running(mut self, gui_running: bool) -> Self {
        self.gui_running = gui_running;
        self
    }

    /// Directory modules are loaded from
    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Opener used to turn files into modules
    pub fn opener(&self) -> &dyn ModuleOpener {
        self.opener.as_ref()
    }

    /// Load `file_name` and register its methods into `methods`
    ///
    /// The module's init hook runs exactly once, before anything else is
    /// asked of it.
    pub fn load(
        &self,
        file_name: &str,
        methods: &mut MethodRegistry,
    ) -> Result<LoadedModule, ModuleError> {
        let path = self.modules_dir.join(file_name);

        let mut handle = self.opener.open(&path).map_err(|e| {
            debug!(module = %file_name, error = %e, "Loading module failed");
            e
        })?;

        handle.init();

        let name = handle.name();
        let weight = handle.weight().unwrap_or(0);
        let about = handle.about();
        let dependencies = handle.dependencies();

        let more_info = handle.more_info_fn();
        let field = handle.field_fn();
        let note = handle.note_fn();

        let entries = handle
            .entries()
            .into_iter()
            .enumerate()
            .map(|(number, descriptor)| ModuleEntry {
                name: descriptor.name,
                number,
                icon: descriptor.icon,
                callback: descriptor.callback,
                scan: descriptor.scan,
                more_info: more_info.clone(),
                field: field.clone(),
                note: note.clone(),
                tasks: Vec::new(),
            })
            .collect::<Vec<_>>();

        let icon = self.gui_running.then(|| self.icon_name(file_name));
        let registered = methods.register(file_name, handle.methods());

        info!(
            module = %file_name,
            name = %name,
            weight,
            entries = entries.len(),
            methods = registered,
            "Module loaded"
        );

        Ok(LoadedModule {
            file_name: file_name.to_string(),
            name,
            weight,
            icon,
            about,
            dependencies,
            methods: registered,
            entries,
            handle,
        })
    }

    /// `cpu.so` becomes `cpu.png`
    fn icon_name(&self, file_name: &str) -> String {
        let suffix = self.opener.suffix();
        let stem = match file_name.rfind(suffix) {
            Some(position) if !suffix.is_empty() => &file_name[..position],
            _ => file_name,
        };
        format!("{stem}.png")
    }
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("opener", &self.opener)
            .field("modules_dir", &self.modules_dir)
            .field("gui_running", &self.gui_running)
            .finish()
    }
}
