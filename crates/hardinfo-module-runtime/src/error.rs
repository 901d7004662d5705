//! Module runtime error types

use hardinfo_module_api::ModuleError;
use std::fmt;
use std::path::PathBuf;

/// Module runtime error type
///
/// `NoModules`, `NoModulesSelected` and the three dependency variants are
/// fatal for the application; see [`ModuleRuntimeError::is_fatal`].
#[derive(Debug, thiserror::Error)]
pub enum ModuleRuntimeError {
    /// Nothing could be loaded from the modules directory
    #[error("No module could be loaded. Check permissions on \"{}\" and try again.", path.display())]
    NoModules {
        /// Directory that was scanned
        path: PathBuf,
    },

    /// The user-supplied module list matched nothing usable
    #[error(
        "No module could be loaded. Please use hardinfo list to see all available modules and try again with a valid module list."
    )]
    NoModulesSelected,

    /// A dependency is missing and may not be loaded automatically
    #[error("Module \"{module}\" depends on module \"{dependency}\".")]
    DependencyMissing {
        /// Display name of the dependent module
        module: String,
        /// File name of the missing dependency
        dependency: String,
    },

    /// The user refused to load a required dependency
    #[error("HardInfo cannot run without loading the additional module \"{dependency}\" required by \"{module}\".")]
    DependencyDeclined {
        /// Display name of the dependent module
        module: String,
        /// File name of the declined dependency
        dependency: String,
    },

    /// A dependency was accepted but could not be loaded
    #[error("Module \"{module}\" depends on module \"{dependency}\", which could not be loaded: {source}")]
    DependencyUnavailable {
        /// Display name of the dependent module
        module: String,
        /// File name of the dependency
        dependency: String,
        /// Load failure
        #[source]
        source: ModuleError,
    },

    /// Module not loaded
    #[error("Module not loaded: {0}")]
    ModuleNotFound(String),

    /// Entry index out of range
    #[error("Module {module} has no entry #{entry}")]
    EntryNotFound {
        /// Module file name
        module: String,
        /// Requested entry index
        entry: usize,
    },
}

/// Result type for module runtime operations
pub type Result<T> = std::result::Result<T, ModuleRuntimeError>;

impl ModuleRuntimeError {
    /// Create a dependency missing error
    pub fn dependency_missing(module: impl fmt::Display, dependency: impl fmt::Display) -> Self {
        Self::DependencyMissing {
            module: module.to_string(),
            dependency: dependency.to_string(),
        }
    }

    /// Create a dependency declined error
    pub fn dependency_declined(module: impl fmt::Display, dependency: impl fmt::Display) -> Self {
        Self::DependencyDeclined {
            module: module.to_string(),
            dependency: dependency.to_string(),
        }
    }

    /// Create a module not found error
    pub fn not_found(file_name: impl fmt::Display) -> Self {
        Self::ModuleNotFound(file_name.to_string())
    }

    /// Whether the application cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoModules { .. }
                | Self::NoModulesSelected
                | Self::DependencyMissing { .. }
                | Self::DependencyDeclined { .. }
                | Self::DependencyUnavailable { .. }
        )
    }
}
