//! Modules backed by shared objects
//!
//! Symbols are resolved once when the object is opened. Every callback handed
//! out keeps the library mapped, so entries and methods stay callable for as
//! long as they are referenced.

#![allow(unsafe_code)]

use hardinfo_module_api::abi::{
    symbols, AboutFn, CStrPtr, DependenciesFn, EntriesFn, EntryCallbackFn, FieldCallbackFn,
    InitFn, MethodCallbackFn, MethodsFn, NameFn, NoteCallbackFn, RawModuleEntry,
    RawModuleMethod, ScanCallbackFn, WeightFn,
};
use hardinfo_module_api::{
    EntryDescriptor, EntryFn, FieldFn, MethodDescriptor, ModuleAbout, ModuleError,
    ModuleInterface, ModuleOpener, NoteFn, Result, ScanFn,
};
use libloading::Library;
use std::ffi::{CStr, CString};
use std::fmt;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;
use std::rc::Rc;
use tracing::debug;

/// Opens modules with the platform dynamic loader
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicOpener;

impl ModuleOpener for DynamicOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ModuleInterface>> {
        Ok(Box::new(DynamicModule::open(path)?))
    }
}

/// A function pointer together with the library it points into
#[derive(Clone)]
struct Bound<F> {
    function: F,
    _library: Rc<Library>,
}

impl<F: Copy> Bound<F> {
    fn get(&self) -> F {
        self.function
    }
}

/// Capability record of one opened shared object
pub struct DynamicModule {
    file_name: String,
    get_entries: EntriesFn,
    get_name: NameFn,
    init: Option<InitFn>,
    get_weight: Option<WeightFn>,
    get_dependencies: Option<DependenciesFn>,
    get_about: Option<AboutFn>,
    exported_methods: Option<MethodsFn>,
    more_info: Option<FieldCallbackFn>,
    get_field: Option<FieldCallbackFn>,
    note: Option<NoteCallbackFn>,
    library: Rc<Library>,
}

impl DynamicModule {
    /// Open the object at `path` with lazy binding and resolve its symbols
    ///
    /// Fails when the object cannot be opened or does not export both
    /// mandatory symbols.
    pub fn open(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        // SAFETY: opening runs the object's initialisers. Module objects are
        // installed with the application and trusted to the same degree.
        let library = unsafe { open_library(path) }.map_err(|e| ModuleError::open(path, e))?;

        // SAFETY: every type below matches the prototype documented next to
        // the symbol name in `abi::symbols`.
        let module = unsafe {
            Self {
                get_entries: required(&library, &file_name, symbols::GET_ENTRIES)?,
                get_name: required(&library, &file_name, symbols::GET_NAME)?,
                init: optional(&library, symbols::INIT),
                get_weight: optional(&library, symbols::GET_WEIGHT),
                get_dependencies: optional(&library, symbols::GET_DEPENDENCIES),
                get_about: optional(&library, symbols::GET_ABOUT),
                exported_methods: optional(&library, symbols::EXPORTED_METHODS),
                more_info: optional(&library, symbols::MORE_INFO),
                get_field: optional(&library, symbols::GET_FIELD),
                note: optional(&library, symbols::NOTE),
                file_name,
                library: Rc::new(library),
            }
        };

        debug!(module = ?module, "Shared object opened");
        Ok(module)
    }

    fn bind<F: Copy>(&self, function: F) -> Bound<F> {
        Bound {
            function,
            _library: Rc::clone(&self.library),
        }
    }

    fn entry_callback(&self, callback: EntryCallbackFn) -> EntryFn {
        let bound = self.bind(callback);
        // SAFETY: the library stays mapped while `bound` lives.
        Rc::new(move || unsafe { copy_str(bound.get()()) })
    }

    fn scan_callback(&self, callback: ScanCallbackFn) -> ScanFn {
        let bound = self.bind(callback);
        // SAFETY: as above.
        Rc::new(move |reload: bool| unsafe { bound.get()(reload) })
    }

    fn field_callback(&self, callback: FieldCallbackFn) -> FieldFn {
        let bound = self.bind(callback);
        Rc::new(move |field: &str| {
            let field = CString::new(field).ok()?;
            // SAFETY: `field` outlives the call; the result is copied before
            // the module may reuse its buffer.
            unsafe { copy_str(bound.get()(field.as_ptr())) }
        })
    }

    fn method(&self, name: String, function: MethodCallbackFn) -> MethodDescriptor {
        let bound = self.bind(function);
        MethodDescriptor::new(name, move |param| {
            let param = param.map(CString::new).transpose().ok()?;
            let param_ptr = param.as_ref().map_or(ptr::null(), |p| p.as_ptr());
            // SAFETY: a null parameter selects the zero-argument form.
            unsafe { copy_str(bound.get()(param_ptr)) }
        })
    }
}

impl ModuleInterface for DynamicModule {
    fn name(&self) -> String {
        // SAFETY: mandatory symbol resolved at open.
        unsafe { copy_str((self.get_name)()) }.unwrap_or_else(|| self.file_name.clone())
    }

    fn entries(&self) -> Vec<EntryDescriptor> {
        // SAFETY: the entry table is terminated by an element with a null
        // name and lives in the module's static data.
        let raw = unsafe { read_table((self.get_entries)(), |e: &RawModuleEntry| e.name.is_null()) };

        raw.into_iter()
            .map(|raw| {
                // SAFETY: non-null strings of a terminated table.
                let (name, icon) = unsafe { (copy_str(raw.name), copy_str(raw.icon)) };

                let mut entry = EntryDescriptor::new(name.unwrap_or_default());
                entry.icon = icon;
                entry.callback = raw.callback.map(|f| self.entry_callback(f));
                entry.scan = raw.scan_callback.map(|f| self.scan_callback(f));
                entry
            })
            .collect()
    }

    fn init(&mut self) {
        if let Some(init) = self.init {
            // SAFETY: optional symbol resolved at open.
            unsafe { init() }
        }
    }

    fn weight(&self) -> Option<i32> {
        // SAFETY: optional symbol resolved at open.
        self.get_weight.map(|get_weight| unsafe { get_weight() })
    }

    fn dependencies(&self) -> Vec<String> {
        let Some(get_dependencies) = self.get_dependencies else {
            return Vec::new();
        };

        // SAFETY: the list is terminated by a null pointer.
        unsafe {
            read_table(get_dependencies(), CStrPtr::is_null)
                .into_iter()
                .filter_map(|dependency| copy_str(dependency.0))
                .collect()
        }
    }

    fn about(&self) -> Option<ModuleAbout> {
        let get_about = self.get_about?;

        // SAFETY: a non-null result points to a static about record whose
        // fields are null or NUL-terminated.
        unsafe {
            let raw = get_about();
            if raw.is_null() {
                return None;
            }
            let raw = *raw;
            Some(ModuleAbout {
                description: copy_str(raw.description),
                author: copy_str(raw.author),
                version: copy_str(raw.version),
                license: copy_str(raw.license),
            })
        }
    }

    fn methods(&self) -> Vec<MethodDescriptor> {
        let Some(exported_methods) = self.exported_methods else {
            return Vec::new();
        };

        // SAFETY: terminated by an element with a null name.
        let raw = unsafe { read_table(exported_methods(), |m: &RawModuleMethod| m.name.is_null()) };

        raw.into_iter()
            .filter_map(|raw| {
                // SAFETY: non-null string of a terminated table.
                let name = unsafe { copy_str(raw.name) }?;
                Some(self.method(name, raw.function?))
            })
            .collect()
    }

    fn more_info_fn(&self) -> Option<FieldFn> {
        self.more_info.map(|f| self.field_callback(f))
    }

    fn field_fn(&self) -> Option<FieldFn> {
        self.get_field.map(|f| self.field_callback(f))
    }

    fn note_fn(&self) -> Option<NoteFn> {
        let bound = self.bind(self.note?);
        Some(Rc::new(move |entry: usize| {
            let entry = c_int::try_from(entry).ok()?;
            // SAFETY: the library stays mapped while `bound` lives.
            unsafe { copy_str(bound.get()(entry)) }
        }))
    }
}

impl fmt::Debug for DynamicModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicModule")
            .field("file_name", &self.file_name)
            .field("init", &self.init.is_some())
            .field("weight", &self.get_weight.is_some())
            .field("dependencies", &self.get_dependencies.is_some())
            .field("about", &self.get_about.is_some())
            .field("methods", &self.exported_methods.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(unix)]
unsafe fn open_library(path: &Path) -> std::result::Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LAZY};

    UnixLibrary::open(Some(path), RTLD_LAZY).map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_library(path: &Path) -> std::result::Result<Library, libloading::Error> {
    Library::new(path)
}

/// # Safety
///
/// If present, `symbol` must have type `T`.
unsafe fn optional<T: Copy>(library: &Library, symbol: &str) -> Option<T> {
    library.get::<T>(symbol.as_bytes()).ok().map(|symbol| *symbol)
}

/// # Safety
///
/// See [`optional`].
unsafe fn required<T: Copy>(
    library: &Library,
    module: &str,
    symbol: &'static str,
) -> Result<T> {
    optional(library, symbol).ok_or_else(|| ModuleError::missing_symbol(module, symbol))
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn copy_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// # Safety
///
/// `first` must be null or point to an array containing an element for
/// which `is_end` holds.
unsafe fn read_table<T: Copy>(first: *const T, is_end: impl Fn(&T) -> bool) -> Vec<T> {
    let mut items = Vec::new();
    if first.is_null() {
        return items;
    }

    let mut current = first;
    while !is_end(&*current) {
        items.push(*current);
        current = current.add(1);
    }
    items
}
