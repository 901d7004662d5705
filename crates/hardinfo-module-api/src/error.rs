//! Module error types

use std::fmt;
use std::path::PathBuf;

/// Errors raised while turning a file into a module
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The shared object could not be opened
    #[error("Unable to open module {path}: {reason}")]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// Loader diagnostic
        reason: String,
    },

    /// A mandatory symbol is not exported
    #[error("Module {module} does not export {symbol}")]
    MissingSymbol {
        /// Module file name
        module: String,
        /// Symbol name
        symbol: &'static str,
    },
}

/// Result type for module operations
pub type Result<T> = std::result::Result<T, ModuleError>;

impl ModuleError {
    /// Create an open error
    pub fn open(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a missing symbol error
    pub fn missing_symbol(module: impl Into<String>, symbol: &'static str) -> Self {
        Self::MissingSymbol {
            module: module.into(),
            symbol,
        }
    }
}
