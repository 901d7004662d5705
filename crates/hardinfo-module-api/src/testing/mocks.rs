//! Mock module implementation

use crate::module::{
    EntryDescriptor, FieldFn, MethodDescriptor, ModuleAbout, ModuleInterface, NoteFn,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Calls observed by a [`MockModule`] and all of its clones
#[derive(Debug, Default)]
pub struct MockCalls {
    init: Cell<usize>,
    scans: RefCell<Vec<(String, bool)>>,
    methods: RefCell<Vec<(String, Option<String>)>>,
}

impl MockCalls {
    /// Number of `init` calls
    pub fn init_count(&self) -> usize {
        self.init.get()
    }

    /// Scanned entries with their reload flag, in call order
    pub fn scans(&self) -> Vec<(String, bool)> {
        self.scans.borrow().clone()
    }

    /// Called methods with their parameter, in call order
    pub fn method_calls(&self) -> Vec<(String, Option<String>)> {
        self.methods.borrow().clone()
    }
}

/// Configurable in-memory module
///
/// Entries answer their default action with `"<entry> report"`, exported
/// methods answer with `"<method>:<param>"` (or just the method name), and the
/// optional field / more-info / note callbacks echo their input.
#[derive(Debug, Clone)]
pub struct MockModule {
    name: String,
    weight: Option<i32>,
    dependencies: Vec<String>,
    entries: Vec<(String, Option<String>)>,
    methods: Vec<String>,
    about: Option<ModuleAbout>,
    entry_callbacks: bool,
    calls: Rc<MockCalls>,
}

impl MockModule {
    /// Create a module without entries
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            dependencies: Vec::new(),
            entries: Vec::new(),
            methods: Vec::new(),
            about: None,
            entry_callbacks: false,
            calls: Rc::new(MockCalls::default()),
        }
    }

    /// Set the weight
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Add a dependency by file name
    pub fn depends_on(mut self, file_name: impl Into<String>) -> Self {
        self.dependencies.push(file_name.into());
        self
    }

    /// Add an entry
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), None));
        self
    }

    /// Add an entry with an icon
    pub fn entry_with_icon(mut self, name: impl Into<String>, icon: impl Into<String>) -> Self {
        self.entries.push((name.into(), Some(icon.into())));
        self
    }

    /// Export a method
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    /// Provide about information
    pub fn about(mut self, about: ModuleAbout) -> Self {
        self.about = Some(about);
        self
    }

    /// Provide field, more-info and note callbacks
    pub fn with_entry_callbacks(mut self) -> Self {
        self.entry_callbacks = true;
        self
    }

    /// Shared call log
    pub fn calls(&self) -> Rc<MockCalls> {
        Rc::clone(&self.calls)
    }
}

impl ModuleInterface for MockModule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn entries(&self) -> Vec<EntryDescriptor> {
        self.entries
            .iter()
            .map(|(name, icon)| {
                let calls = Rc::clone(&self.calls);
                let scanned = name.clone();
                let report = format!("{name} report");

                let mut entry = EntryDescriptor::new(name.clone())
                    .with_callback(move || Some(report.clone()))
                    .with_scan(move |reload| {
                        calls.scans.borrow_mut().push((scanned.clone(), reload));
                    });
                entry.icon = icon.clone();
                entry
            })
            .collect()
    }

    fn init(&mut self) {
        self.calls.init.set(self.calls.init.get() + 1);
    }

    fn weight(&self) -> Option<i32> {
        self.weight
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn about(&self) -> Option<ModuleAbout> {
        self.about.clone()
    }

    fn methods(&self) -> Vec<MethodDescriptor> {
        self.methods
            .iter()
            .map(|method| {
                let calls = Rc::clone(&self.calls);
                let name = method.clone();
                MethodDescriptor::new(method.clone(), move |param| {
                    calls
                        .methods
                        .borrow_mut()
                        .push((name.clone(), param.map(str::to_string)));
                    Some(match param {
                        Some(param) => format!("{name}:{param}"),
                        None => name.clone(),
                    })
                })
            })
            .collect()
    }

    fn more_info_fn(&self) -> Option<FieldFn> {
        self.entry_callbacks
            .then(|| Rc::new(|field: &str| Some(format!("more about {field}"))) as FieldFn)
    }

    fn field_fn(&self) -> Option<FieldFn> {
        self.entry_callbacks
            .then(|| Rc::new(|field: &str| Some(format!("value of {field}"))) as FieldFn)
    }

    fn note_fn(&self) -> Option<NoteFn> {
        self.entry_callbacks
            .then(|| Rc::new(|entry: usize| Some(format!("note for entry {entry}"))) as NoteFn)
    }
}
