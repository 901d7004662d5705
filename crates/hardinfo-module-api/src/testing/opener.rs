//! Opener serving in-memory modules by file name

use super::mocks::MockModule;
use crate::abi::symbols;
use crate::error::{ModuleError, Result};
use crate::module::{ModuleInterface, ModuleOpener};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone)]
enum Slot {
    Module(MockModule),
    MissingSymbol(&'static str),
}

/// Opener that maps file names to [`MockModule`]s
///
/// Only the file name of the opened path is looked at. Unknown names fail
/// like a shared object that cannot be opened.
#[derive(Debug, Default)]
pub struct StaticOpener {
    slots: HashMap<String, Slot>,
    opened: RefCell<Vec<String>>,
}

impl StaticOpener {
    /// Create an empty opener
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `module` for `file_name`
    pub fn with_module(mut self, file_name: impl Into<String>, module: MockModule) -> Self {
        self.slots.insert(file_name.into(), Slot::Module(module));
        self
    }

    /// Serve an object for `file_name` that lacks the name accessor
    pub fn with_broken_module(mut self, file_name: impl Into<String>) -> Self {
        self.slots
            .insert(file_name.into(), Slot::MissingSymbol(symbols::GET_NAME));
        self
    }

    /// File names passed to [`ModuleOpener::open`], in call order
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    /// How often `file_name` was opened
    pub fn open_count(&self, file_name: &str) -> usize {
        self.opened
            .borrow()
            .iter()
            .filter(|name| name.as_str() == file_name)
            .count()
    }

    /// Create an empty placeholder file in `dir` for every served name
    pub fn materialize(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for file_name in self.slots.keys() {
            fs::write(dir.join(file_name), b"")?;
        }
        Ok(())
    }
}

impl ModuleOpener for StaticOpener {
    fn suffix(&self) -> &str {
        ".so"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ModuleInterface>> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        self.opened.borrow_mut().push(file_name.clone());

        match self.slots.get(&file_name) {
            Some(Slot::Module(module)) => Ok(Box::new(module.clone())),
            Some(Slot::MissingSymbol(symbol)) => {
                Err(ModuleError::missing_symbol(file_name, *symbol))
            }
            None => Err(ModuleError::open(path, "no such module")),
        }
    }
}
