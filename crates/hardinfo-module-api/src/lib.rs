//! # HardInfo Module API
//!
//! The contract between HardInfo and its loadable modules.
//!
//! ## Layers
//!
//! - **[`abi`]**: `#[repr(C)]` descriptor types and the fixed symbol names a
//!   shared object exports
//! - **[`module`]**: the safe [`ModuleInterface`] capability trait the
//!   runtime works with, plus the [`ModuleOpener`] seam that turns a file
//!   into a module
//! - **[`policy`]**: the [`DependencyPolicy`] shared by the runtime and its
//!   configuration
//!
//! Only `hi_module_get_entries` and `hi_module_get_name` are mandatory. Every
//! other capability is optional and degrades to a no-op when absent.
//!
//! ## Example
//!
//! ```rust
//! use hardinfo_module_api::*;
//!
//! #[derive(Debug)]
//! struct Memory;
//!
//! impl ModuleInterface for Memory {
//!     fn name(&self) -> String {
//!         "Memory".to_string()
//!     }
//!
//!     fn entries(&self) -> Vec<EntryDescriptor> {
//!         vec![EntryDescriptor::new("Usage")]
//!     }
//!
//!     fn weight(&self) -> Option<i32> {
//!         Some(5)
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod abi;
pub mod error;
pub mod module;
pub mod policy;

#[cfg(feature = "testing")]
pub mod testing;

pub use error::{ModuleError, Result};
pub use module::{
    EntryDescriptor, EntryFn, FieldFn, MethodDescriptor, MethodFn, ModuleAbout, ModuleInterface,
    ModuleOpener, NoteFn, ScanFn,
};
pub use policy::DependencyPolicy;

/// Prelude module with commonly used types
pub mod prelude {
    pub use crate::error::{ModuleError, Result};
    pub use crate::module::{
        EntryDescriptor, MethodDescriptor, ModuleAbout, ModuleInterface, ModuleOpener,
    };
}
