//! Module capability trait and descriptors

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Scan callback; the flag is `true` when the user asked for a refresh
pub type ScanFn = Rc<dyn Fn(bool)>;
/// Entry default action
pub type EntryFn = Rc<dyn Fn() -> Option<String>>;
/// Field lookup and more-info callbacks
pub type FieldFn = Rc<dyn Fn(&str) -> Option<String>>;
/// Note callback, called with the entry index
pub type NoteFn = Rc<dyn Fn(usize) -> Option<String>>;
/// Exported method; receives `None` when called without a parameter
pub type MethodFn = Rc<dyn Fn(Option<&str>) -> Option<String>>;

/// Capabilities of a loaded module.
///
/// `name` and `entries` are mandatory. Everything else has a degraded
/// default: no weight (sorts as 0), no dependencies, no about information,
/// no exported methods and no per-entry callbacks.
pub trait ModuleInterface: fmt::Debug {
    /// Display name
    fn name(&self) -> String;

    /// Entries in declaration order
    fn entries(&self) -> Vec<EntryDescriptor>;

    /// One-time initialisation hook
    fn init(&mut self) {}

    /// Sort key
    fn weight(&self) -> Option<i32> {
        None
    }

    /// File names of the modules this one needs
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Descriptive information
    fn about(&self) -> Option<ModuleAbout> {
        None
    }

    /// Methods callable through the method registry
    fn methods(&self) -> Vec<MethodDescriptor> {
        Vec::new()
    }

    /// More-info lookup bound to every entry
    fn more_info_fn(&self) -> Option<FieldFn> {
        None
    }

    /// Field lookup bound to every entry
    fn field_fn(&self) -> Option<FieldFn> {
        None
    }

    /// Note lookup bound to every entry
    fn note_fn(&self) -> Option<NoteFn> {
        None
    }
}

/// Turns a file on disk into a module
pub trait ModuleOpener: fmt::Debug {
    /// File name suffix of loadable objects, including the dot
    fn suffix(&self) -> &str {
        std::env::consts::DLL_SUFFIX
    }

    /// Open the object at `path` and probe its capabilities
    fn open(&self, path: &Path) -> Result<Box<dyn ModuleInterface>>;
}

/// An entry as declared by a module
#[derive(Clone)]
pub struct EntryDescriptor {
    /// Entry name
    pub name: String,

    /// Icon file name
    pub icon: Option<String>,

    /// Default action
    pub callback: Option<EntryFn>,

    /// Scan callback
    pub scan: Option<ScanFn>,
}

impl EntryDescriptor {
    /// Create an entry without icon or callbacks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            callback: None,
            scan: None,
        }
    }

    /// Set the icon file name
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the default action
    pub fn with_callback(mut self, callback: impl Fn() -> Option<String> + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    /// Set the scan callback
    pub fn with_scan(mut self, scan: impl Fn(bool) + 'static) -> Self {
        self.scan = Some(Rc::new(scan));
        self
    }
}

impl fmt::Debug for EntryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryDescriptor")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("callback", &self.callback.is_some())
            .field("scan", &self.scan.is_some())
            .finish()
    }
}

/// A method exported by a module
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Method name, without the module prefix
    pub name: String,

    /// Implementation
    pub function: MethodFn,
}

impl MethodDescriptor {
    /// Create a method descriptor
    pub fn new(
        name: impl Into<String>,
        function: impl Fn(Option<&str>) -> Option<String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            function: Rc::new(function),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Descriptive information about a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAbout {
    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Author
    #[serde(default)]
    pub author: Option<String>,

    /// Version string
    #[serde(default)]
    pub version: Option<String>,

    /// License
    #[serde(default)]
    pub license: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Minimal;

    impl ModuleInterface for Minimal {
        fn name(&self) -> String {
            "Minimal".to_string()
        }

        fn entries(&self) -> Vec<EntryDescriptor> {
            vec![EntryDescriptor::new("Only")]
        }
    }

    #[test]
    fn test_optional_capabilities_degrade() {
        let module = Minimal;
        assert_eq!(module.weight(), None);
        assert!(module.dependencies().is_empty());
        assert!(module.about().is_none());
        assert!(module.methods().is_empty());
        assert!(module.more_info_fn().is_none());
        assert!(module.field_fn().is_none());
        assert!(module.note_fn().is_none());
    }

    #[test]
    fn test_entry_builder() {
        let scanned = Rc::new(Cell::new(false));
        let flag = scanned.clone();

        let entry = EntryDescriptor::new("Processor")
            .with_icon("processor.png")
            .with_callback(|| Some("2 cores".to_string()))
            .with_scan(move |_| flag.set(true));

        assert_eq!(entry.icon.as_deref(), Some("processor.png"));
        assert_eq!((entry.callback.as_ref().unwrap())(), Some("2 cores".to_string()));

        (entry.scan.as_ref().unwrap())(false);
        assert!(scanned.get());
    }

    #[test]
    fn test_method_descriptor() {
        let method = MethodDescriptor::new("getCPUDesc", |param| param.map(str::to_uppercase));
        assert_eq!((method.function)(Some("x86")), Some("X86".to_string()));
        assert_eq!((method.function)(None), None);
    }

    #[test]
    fn test_about_serialization() {
        let about = ModuleAbout {
            description: Some("Gathers processor information".to_string()),
            author: Some("HardInfo".to_string()),
            version: None,
            license: Some("GPL2".to_string()),
        };
        let json = serde_json::to_value(&about).unwrap();
        assert_eq!(json["license"], "GPL2");

        let back: ModuleAbout = serde_json::from_value(json).unwrap();
        assert_eq!(back, about);
    }
}
