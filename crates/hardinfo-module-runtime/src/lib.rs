//! # HardInfo Module Runtime
//!
//! Loading and lifecycle management for HardInfo modules.
//!
//! ## Components
//!
//! - **Method Registry**: `"<module>::<method>"` call table
//! - **Module Loader**: opens one file, probes its capabilities, builds the
//!   module record and registers its methods
//! - **Dependency Resolver**: makes sure every declared dependency is loaded
//! - **Module Directory**: scans the modules directory and produces the list
//!   ordered by weight
//! - **Module Manager**: owns all of the above with explicit load / unload
//!   lifecycle
//!
//! ## Example
//!
//! ```rust,no_run
//! use hardinfo_module_runtime::*;
//! use std::rc::Rc;
//!
//! # fn example() -> Result<()> {
//! let settings = ModuleSettings::new("/usr/lib/hardinfo/modules")
//!     .policy(DependencyPolicy::Autoload);
//! let mut manager = ModuleManager::new(Rc::new(DynamicOpener), settings);
//!
//! for module in manager.load_all()? {
//!     println!("{} ({})", module.name(), module.file_name());
//! }
//!
//! manager.unload_all();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod directory;
#[cfg(feature = "dynamic-loading")]
pub mod dynamic;
pub mod error;
pub mod loader;
pub mod manager;
pub mod methods;
pub mod module;
pub mod resolver;
pub mod shell;

pub use directory::ModuleDirectory;
#[cfg(feature = "dynamic-loading")]
pub use dynamic::{DynamicModule, DynamicOpener};
pub use error::{ModuleRuntimeError, Result};
pub use loader::ModuleLoader;
pub use manager::{ModuleManager, ModuleSettings, ModuleStats};
pub use methods::{method_key, MethodRegistry};
pub use module::{LoadedModule, ModuleEntry};
pub use resolver::{DependencyPolicy, DependencyPrompt, DependencyResolver};
pub use shell::{HeadlessShell, ShellCollaborator};

// Re-export module API types for convenience
pub use hardinfo_module_api::{
    abi, EntryDescriptor, MethodDescriptor, ModuleAbout, ModuleError, ModuleInterface,
    ModuleOpener,
};

/// Prelude module with commonly used types
pub mod prelude {
    pub use crate::error::{ModuleRuntimeError, Result};
    pub use crate::manager::{ModuleManager, ModuleSettings};
    pub use crate::module::{LoadedModule, ModuleEntry};
    pub use crate::resolver::{DependencyPolicy, DependencyPrompt};
    pub use crate::shell::ShellCollaborator;
    pub use hardinfo_module_api::prelude::*;
}
