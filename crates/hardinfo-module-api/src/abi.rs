//! C ABI exported by module shared objects
//!
//! A module is a shared object exporting some of the symbols below by their
//! unmangled names. Lists are terminated by an element whose `name` is null.
//! Strings handed to the host stay owned by the module and must remain valid
//! until the next call into the same function; the host copies them.

use std::os::raw::{c_char, c_int};
use std::ptr;

/// Names of the exported symbols
pub mod symbols {
    /// `const RawModuleEntry *hi_module_get_entries(void)` (mandatory)
    pub const GET_ENTRIES: &str = "hi_module_get_entries";
    /// `const char *hi_module_get_name(void)` (mandatory)
    pub const GET_NAME: &str = "hi_module_get_name";
    /// `void hi_module_init(void)`
    pub const INIT: &str = "hi_module_init";
    /// `int hi_module_get_weight(void)`
    pub const GET_WEIGHT: &str = "hi_module_get_weight";
    /// `const CStrPtr *hi_module_get_dependencies(void)`
    pub const GET_DEPENDENCIES: &str = "hi_module_get_dependencies";
    /// `const RawModuleAbout *hi_module_get_about(void)`
    pub const GET_ABOUT: &str = "hi_module_get_about";
    /// `const RawModuleMethod *hi_exported_methods(void)`
    pub const EXPORTED_METHODS: &str = "hi_exported_methods";
    /// `const char *hi_more_info(const char *field)`
    pub const MORE_INFO: &str = "hi_more_info";
    /// `const char *hi_get_field(const char *field)`
    pub const GET_FIELD: &str = "hi_get_field";
    /// `const char *hi_note_func(int entry)`
    pub const NOTE: &str = "hi_note_func";
}

/// Entry default action, returns the entry's text
pub type EntryCallbackFn = unsafe extern "C" fn() -> *const c_char;
/// Entry scan callback
pub type ScanCallbackFn = unsafe extern "C" fn(reload: bool);
/// Exported method; `param` is null for the zero-argument form
pub type MethodCallbackFn = unsafe extern "C" fn(param: *const c_char) -> *const c_char;
/// `hi_module_init`
pub type InitFn = unsafe extern "C" fn();
/// `hi_module_get_name`
pub type NameFn = unsafe extern "C" fn() -> *const c_char;
/// `hi_module_get_weight`
pub type WeightFn = unsafe extern "C" fn() -> c_int;
/// `hi_module_get_entries`
pub type EntriesFn = unsafe extern "C" fn() -> *const RawModuleEntry;
/// `hi_module_get_dependencies`
pub type DependenciesFn = unsafe extern "C" fn() -> *const CStrPtr;
/// `hi_module_get_about`
pub type AboutFn = unsafe extern "C" fn() -> *const RawModuleAbout;
/// `hi_exported_methods`
pub type MethodsFn = unsafe extern "C" fn() -> *const RawModuleMethod;
/// `hi_more_info` and `hi_get_field`
pub type FieldCallbackFn = unsafe extern "C" fn(field: *const c_char) -> *const c_char;
/// `hi_note_func`
pub type NoteCallbackFn = unsafe extern "C" fn(entry: c_int) -> *const c_char;

/// A nullable pointer to a NUL-terminated string
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct CStrPtr(pub *const c_char);

impl CStrPtr {
    /// List terminator
    pub const NULL: Self = Self(ptr::null());

    /// Whether this is the terminator
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// One entry as declared by a module
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawModuleEntry {
    /// Entry name; null terminates the list
    pub name: *const c_char,
    /// Icon file name, may be null
    pub icon: *const c_char,
    /// Default action
    pub callback: Option<EntryCallbackFn>,
    /// Scan callback
    pub scan_callback: Option<ScanCallbackFn>,
}

impl RawModuleEntry {
    /// List terminator
    pub const END: Self = Self {
        name: ptr::null(),
        icon: ptr::null(),
        callback: None,
        scan_callback: None,
    };
}

/// One exported method
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawModuleMethod {
    /// Method name; null terminates the list
    pub name: *const c_char,
    /// Implementation
    pub function: Option<MethodCallbackFn>,
}

impl RawModuleMethod {
    /// List terminator
    pub const END: Self = Self {
        name: ptr::null(),
        function: None,
    };
}

/// Descriptive information about a module; any field may be null
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawModuleAbout {
    /// Short description
    pub description: *const c_char,
    /// Author
    pub author: *const c_char,
    /// Version string
    pub version: *const c_char,
    /// License
    pub license: *const c_char,
}

// SAFETY: these descriptors only carry pointers to immutable static data
// and plain function pointers. Modules declare them as `static` tables that
// are never written after load, so sharing references between threads
// cannot race.
#[allow(unsafe_code)]
unsafe impl Sync for CStrPtr {}
#[allow(unsafe_code)]
unsafe impl Sync for RawModuleEntry {}
#[allow(unsafe_code)]
unsafe impl Sync for RawModuleMethod {}
#[allow(unsafe_code)]
unsafe impl Sync for RawModuleAbout {}
